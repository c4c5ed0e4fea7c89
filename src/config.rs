use crate::map::DEFAULT_ZOOM;
use crate::models::Location;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    /// Startup geolocation result; `None` leaves the request outstanding.
    pub start_position: Option<Result<Location, String>>,
    pub zoom: u8,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/workouts.json"));
        let start_position = lookup("APP_START_POSITION").map(|value| parse_position(&value));
        let zoom = lookup("APP_MAP_ZOOM")
            .and_then(|value| value.parse::<u8>().ok())
            .unwrap_or(DEFAULT_ZOOM);

        Self {
            port,
            data_path,
            start_position,
            zoom,
        }
    }
}

pub fn parse_position(value: &str) -> Result<Location, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {value:?}"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("bad latitude: {err}"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("bad longitude: {err}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("position {lat},{lng} is out of range"));
    }
    Ok(Location::new(lat, lng))
}
