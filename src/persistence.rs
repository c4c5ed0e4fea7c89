use crate::errors::ActivityError;
use crate::models::{Activity, ActivityId, Details, Kind, Location};
use crate::storage::BlobStore;
use crate::store::ActivityStore;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STORAGE_KEY: &str = "workouts";

/// Plain persisted form of an activity. Every field is optional on the way in so that a
/// damaged record is reported by [`reconstitute`] rather than failing the whole blob.
/// Field aliases accept blobs written by the earlier browser-only tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(alias = "date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    #[serde(alias = "clickedPosition", skip_serializing_if = "Option::is_none")]
    pub location: Option<[f64; 2]>,
    #[serde(alias = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "cadence", skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<f64>,
    #[serde(alias = "pace", skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(alias = "elevation", skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(alias = "speed", skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        let mut record = Self {
            id: Some(activity.id().to_string()),
            kind: Some(activity.kind().as_str().to_string()),
            created_at: Some(activity.created_at()),
            location: Some(activity.location().as_pair()),
            distance_km: Some(activity.distance_km()),
            duration_min: Some(activity.duration_min()),
            description: Some(activity.description().to_string()),
            ..Self::default()
        };
        match activity.details() {
            Details::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                record.cadence_spm = Some(*cadence_spm);
                record.pace_min_per_km = Some(*pace_min_per_km);
            }
            Details::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                record.elevation_gain_m = Some(*elevation_gain_m);
                record.speed_km_per_h = Some(*speed_km_per_h);
            }
        }
        record
    }
}

pub fn save<B: BlobStore>(store: &ActivityStore, blobs: &mut B) -> Result<(), ActivityError> {
    let records: Vec<ActivityRecord> = store.list().map(ActivityRecord::from).collect();
    let payload =
        serde_json::to_string(&records).map_err(|err| ActivityError::Storage(err.to_string()))?;
    blobs.set(STORAGE_KEY, payload)
}

pub fn load<B: BlobStore>(blobs: &B) -> Vec<ActivityRecord> {
    let Some(payload) = blobs.get(STORAGE_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<ActivityRecord>>>(&payload) {
        Ok(records) => records.unwrap_or_default(),
        Err(err) => {
            warn!("ignoring unreadable activity blob: {err}");
            Vec::new()
        }
    }
}

/// Re-attaches kind-specific behaviour to a raw record. Derived metrics are taken verbatim.
pub fn reconstitute(raw: ActivityRecord) -> Result<Activity, ActivityError> {
    let kind_name = raw.kind.as_deref().ok_or_else(|| corrupt(&raw, "missing kind"))?;
    let kind = Kind::parse(kind_name)
        .ok_or_else(|| corrupt(&raw, &format!("unrecognized kind {kind_name:?}")))?;

    let details = match kind {
        Kind::Running => Details::Running {
            cadence_spm: required(&raw, raw.cadence_spm, "cadence")?,
            pace_min_per_km: required(&raw, raw.pace_min_per_km, "pace")?,
        },
        Kind::Cycling => Details::Cycling {
            elevation_gain_m: required(&raw, raw.elevation_gain_m, "elevation")?,
            speed_km_per_h: required(&raw, raw.speed_km_per_h, "speed")?,
        },
    };

    Ok(Activity::from_parts(
        ActivityId::from(required(&raw, raw.id.clone(), "id")?),
        required(&raw, raw.created_at, "createdAt")?,
        Location::from(required(&raw, raw.location, "location")?),
        required(&raw, raw.distance_km, "distance")?,
        required(&raw, raw.duration_min, "duration")?,
        required(&raw, raw.description.clone(), "description")?,
        details,
    ))
}

pub fn load_activities<B: BlobStore>(blobs: &B) -> Result<Vec<Activity>, ActivityError> {
    load(blobs).into_iter().map(reconstitute).collect()
}

fn required<T>(raw: &ActivityRecord, value: Option<T>, field: &str) -> Result<T, ActivityError> {
    value.ok_or_else(|| corrupt(raw, &format!("missing {field}")))
}

fn corrupt(raw: &ActivityRecord, reason: &str) -> ActivityError {
    let id = raw.id.as_deref().unwrap_or("<no id>");
    ActivityError::CorruptRecord(format!("{id}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{create_cycling, create_running};
    use crate::storage::MemoryBlobStore;

    fn sample_store() -> ActivityStore {
        let mut store = ActivityStore::new();
        store
            .add(create_running(Location::new(51.5, -0.1), 5.0, 25.0, 180.0).unwrap())
            .unwrap();
        store
            .add(create_cycling(Location::new(48.85, 2.35), 20.0, 60.0, 300.0).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn reconstitute_restores_every_field() {
        let store = sample_store();
        for activity in store.list() {
            let restored = reconstitute(ActivityRecord::from(activity)).unwrap();
            assert_eq!(&restored, activity);
        }
    }

    #[test]
    fn save_then_load_through_blob_store() {
        let store = sample_store();
        let mut blobs = MemoryBlobStore::new();
        save(&store, &mut blobs).unwrap();

        let restored = load_activities(&blobs).unwrap();
        let original: Vec<_> = store.list().cloned().collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn derived_metrics_are_loaded_verbatim() {
        let mut blobs = MemoryBlobStore::new();
        let payload = serde_json::json!([{
            "id": "r1",
            "kind": "running",
            "createdAt": "2026-10-13T09:00:00+00:00",
            "location": [51.5, -0.1],
            "distanceKm": 5.0,
            "durationMin": 25.0,
            "description": "Running on October 13",
            "cadenceSpm": 180,
            "paceMinPerKm": 4.2
        }]);
        blobs.set(STORAGE_KEY, payload.to_string()).unwrap();

        let restored = load_activities(&blobs).unwrap();
        assert_eq!(
            restored[0].details(),
            &Details::Running {
                cadence_spm: 180.0,
                pace_min_per_km: 4.2
            }
        );
    }

    #[test]
    fn legacy_browser_records_reconstitute() {
        let raw: ActivityRecord = serde_json::from_value(serde_json::json!({
            "date": "2023-10-13T10:20:30.123Z",
            "id": "7196230123",
            "clickedPosition": [51.5, -0.1],
            "distance": 20,
            "duration": 60,
            "type": "cycling",
            "elevation": 300,
            "speed": 20,
            "description": "Cycling on October 13"
        }))
        .unwrap();

        let ride = reconstitute(raw).unwrap();
        assert_eq!(ride.id().as_str(), "7196230123");
        assert_eq!(ride.kind(), Kind::Cycling);
        assert_eq!(ride.location(), Location::new(51.5, -0.1));
        assert_eq!(
            ride.details(),
            &Details::Cycling {
                elevation_gain_m: 300.0,
                speed_km_per_h: 20.0
            }
        );
    }

    #[test]
    fn legacy_fractional_cadence_keeps_whole_session() {
        let mut blobs = MemoryBlobStore::new();
        let payload = serde_json::json!([
            {
                "date": "2023-10-13T10:20:30.123Z",
                "id": "7196230123",
                "clickedPosition": [51.5, -0.1],
                "distance": 20,
                "duration": 60,
                "type": "cycling",
                "elevation": 300,
                "speed": 20,
                "description": "Cycling on October 13"
            },
            {
                "date": "2023-10-14T07:00:00.000Z",
                "id": "7196230999",
                "clickedPosition": [51.6, -0.2],
                "distance": 5,
                "duration": 25,
                "type": "running",
                "cadence": 172.5,
                "pace": 5,
                "description": "Running on October 14"
            }
        ]);
        blobs.set(STORAGE_KEY, payload.to_string()).unwrap();

        let restored = load_activities(&blobs).unwrap();
        let ids: Vec<_> = restored.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, ["7196230123", "7196230999"]);
        assert_eq!(
            restored[1].details(),
            &Details::Running {
                cadence_spm: 172.5,
                pace_min_per_km: 5.0
            }
        );

        let mut store = ActivityStore::new();
        store.replace_all(restored).unwrap();
        save(&store, &mut blobs).unwrap();
        assert_eq!(load(&blobs).len(), 2);
        assert_eq!(load(&blobs)[1].cadence_spm, Some(172.5));
    }

    #[test]
    fn reconstitute_rejects_bad_kind_or_missing_fields() {
        let store = sample_store();
        let good = ActivityRecord::from(store.first().unwrap());

        let no_kind = ActivityRecord {
            kind: None,
            ..good.clone()
        };
        let odd_kind = ActivityRecord {
            kind: Some("swimming".to_string()),
            ..good.clone()
        };
        let no_pace = ActivityRecord {
            pace_min_per_km: None,
            ..good.clone()
        };
        let no_location = ActivityRecord {
            location: None,
            ..good
        };
        for raw in [no_kind, odd_kind, no_pace, no_location] {
            assert!(matches!(
                reconstitute(raw),
                Err(ActivityError::CorruptRecord(_))
            ));
        }
    }

    #[test]
    fn absent_or_unreadable_blob_loads_empty() {
        let mut blobs = MemoryBlobStore::new();
        assert!(load(&blobs).is_empty());
        blobs.set(STORAGE_KEY, "{not json".to_string()).unwrap();
        assert!(load(&blobs).is_empty());
        blobs.set(STORAGE_KEY, "null".to_string()).unwrap();
        assert!(load(&blobs).is_empty());
    }

    #[test]
    fn save_overwrites_with_empty_list() {
        let store = sample_store();
        let mut blobs = MemoryBlobStore::new();
        save(&store, &mut blobs).unwrap();
        save(&ActivityStore::new(), &mut blobs).unwrap();
        assert_eq!(blobs.get(STORAGE_KEY).as_deref(), Some("[]"));
    }
}
