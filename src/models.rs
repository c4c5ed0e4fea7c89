use crate::errors::ActivityError;
use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl From<[f64; 2]> for Location {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Running,
    Cycling,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Running => "running",
            Kind::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Running => "Running",
            Kind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Kind::Running => "🏃‍♂️",
            Kind::Cycling => "🚴‍♀️",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "running" => Some(Kind::Running),
            "cycling" => Some(Kind::Cycling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActivityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    Running { cadence_spm: f64, pace_min_per_km: f64 },
    Cycling { elevation_gain_m: f64, speed_km_per_h: f64 },
}

impl Details {
    pub fn kind(&self) -> Kind {
        match self {
            Details::Running { .. } => Kind::Running,
            Details::Cycling { .. } => Kind::Cycling,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: ActivityId,
    created_at: DateTime<Local>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    description: String,
    details: Details,
}

impl Activity {
    /// Reassembles an activity from persisted fields without recomputing anything.
    pub(crate) fn from_parts(
        id: ActivityId,
        created_at: DateTime<Local>,
        location: Location,
        distance_km: f64,
        duration_min: f64,
        description: String,
        details: Details,
    ) -> Self {
        Self {
            id,
            created_at,
            location,
            distance_km,
            duration_min,
            description,
            details,
        }
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn kind(&self) -> Kind {
        self.details.kind()
    }
}

pub fn create_running(
    location: Location,
    distance_km: f64,
    duration_min: f64,
    cadence_spm: f64,
) -> Result<Activity, ActivityError> {
    create_running_at(Local::now(), location, distance_km, duration_min, cadence_spm)
}

pub fn create_running_at(
    created_at: DateTime<Local>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    cadence_spm: f64,
) -> Result<Activity, ActivityError> {
    let location = checked_location(location)?;
    let distance_km = positive("distance", distance_km)?;
    let duration_min = positive("duration", duration_min)?;
    let cadence_spm = cadence(cadence_spm)?;

    let details = Details::Running {
        cadence_spm,
        pace_min_per_km: pace(distance_km, duration_min),
    };
    Ok(build(created_at, location, distance_km, duration_min, details))
}

pub fn create_cycling(
    location: Location,
    distance_km: f64,
    duration_min: f64,
    elevation_gain_m: f64,
) -> Result<Activity, ActivityError> {
    create_cycling_at(Local::now(), location, distance_km, duration_min, elevation_gain_m)
}

pub fn create_cycling_at(
    created_at: DateTime<Local>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    elevation_gain_m: f64,
) -> Result<Activity, ActivityError> {
    let location = checked_location(location)?;
    let distance_km = positive("distance", distance_km)?;
    let duration_min = positive("duration", duration_min)?;
    let elevation_gain_m = non_negative("elevation", elevation_gain_m)?;

    let details = Details::Cycling {
        elevation_gain_m,
        speed_km_per_h: speed(distance_km, duration_min),
    };
    Ok(build(created_at, location, distance_km, duration_min, details))
}

pub fn describe<D: Datelike>(kind: Kind, date: &D) -> String {
    format!("{} on {} {}", kind.label(), MONTHS[date.month0() as usize], date.day())
}

pub fn pace(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

fn build(
    created_at: DateTime<Local>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    details: Details,
) -> Activity {
    Activity {
        id: ActivityId::generate(),
        description: describe(details.kind(), &created_at),
        created_at,
        location,
        distance_km,
        duration_min,
        details,
    }
}

fn checked_location(location: Location) -> Result<Location, ActivityError> {
    if location.lat.is_finite() && location.lng.is_finite() {
        Ok(location)
    } else {
        Err(ActivityError::Validation(
            "location must have finite coordinates".to_string(),
        ))
    }
}

fn positive(field: &str, value: f64) -> Result<f64, ActivityError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ActivityError::Validation(format!(
            "{field} must be a positive number"
        )))
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64, ActivityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ActivityError::Validation(format!(
            "{field} must be a non-negative number"
        )))
    }
}

fn cadence(value: f64) -> Result<f64, ActivityError> {
    let value = positive("cadence", value)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ActivityError::Validation(
            "cadence must be a whole number of steps per minute".to_string(),
        ));
    }
    Ok(value)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormFields {
    pub kind: Kind,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub cadence: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl FormFields {
    pub fn into_activity(self, location: Location) -> Result<Activity, ActivityError> {
        let distance = present(self.distance, "distance")?;
        let duration = present(self.duration, "duration")?;
        match self.kind {
            Kind::Running => {
                let cadence = present(self.cadence, "cadence")?;
                create_running(location, distance, duration, cadence)
            }
            Kind::Cycling => {
                let elevation = present(self.elevation, "elevation")?;
                create_cycling(location, distance, duration, elevation)
            }
        }
    }
}

fn present(value: Option<f64>, field: &str) -> Result<f64, ActivityError> {
    value.ok_or_else(|| ActivityError::Validation(format!("{field} is required")))
}

#[derive(Debug, Deserialize)]
pub struct TypeChangeRequest {
    pub kind: Kind,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GeolocationRequest {
    Position { lat: f64, lng: f64 },
    Failure { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeolocationResponse {
    pub initialized: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MapClickResponse {
    pub staged: Location,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub removed: bool,
}
