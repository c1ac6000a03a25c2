//! JSON fixture that seeds an [`InMemoryProvider`] for the desktop shell.
//!
//! ```json
//! {
//!   "granted": ["READ_BLOOD_PRESSURE"],
//!   "grant_on_request": true,
//!   "apps": [{ "package_name": "com.app.x", "app_label": "X", "icon": null }],
//!   "records": [{
//!     "id": "r1", "package_name": "com.app.x",
//!     "time": "2025-06-03T07:15:00Z", "zone_offset_seconds": 7200,
//!     "systolic_mmhg": 120.0, "diastolic_mmhg": 80.0
//!   }]
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::InMemoryProvider;
use crate::models::{
    AppInfo, BloodPressureRecord, DataOrigin, PermissionSet, Pressure, RecordMetadata,
};

/// Bounds the provider itself enforces on stored blood pressure values.
const SYSTOLIC_RANGE_MMHG: (f64, f64) = (20.0, 200.0);
const DIASTOLIC_RANGE_MMHG: (f64, f64) = (10.0, 180.0);

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub granted: PermissionSet,
    #[serde(default = "default_grant_on_request")]
    pub grant_on_request: bool,
    #[serde(default)]
    pub apps: Vec<AppInfo>,
    #[serde(default)]
    pub records: Vec<FixtureRecord>,
}

fn default_grant_on_request() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub id: String,
    pub package_name: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub zone_offset_seconds: Option<i32>,
    pub systolic_mmhg: f64,
    pub diastolic_mmhg: f64,
    #[serde(default)]
    pub last_modified_time: Option<DateTime<Utc>>,
}

impl FixtureRecord {
    fn into_record(self) -> Result<BloodPressureRecord, FixtureError> {
        check_range(&self.id, "systolic", self.systolic_mmhg, SYSTOLIC_RANGE_MMHG)?;
        check_range(&self.id, "diastolic", self.diastolic_mmhg, DIASTOLIC_RANGE_MMHG)?;

        Ok(BloodPressureRecord {
            time: self.time,
            zone_offset_seconds: self.zone_offset_seconds,
            systolic: Pressure::millimeters_of_mercury(self.systolic_mmhg),
            diastolic: Pressure::millimeters_of_mercury(self.diastolic_mmhg),
            metadata: RecordMetadata {
                id: self.id,
                data_origin: DataOrigin {
                    package_name: self.package_name,
                },
                last_modified_time: self.last_modified_time.unwrap_or(self.time),
            },
        })
    }
}

fn check_range(
    id: &str,
    field: &str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), FixtureError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FixtureError::InvalidRecord {
            id: id.to_string(),
            reason: format!("{field} {value} outside {min}..={max} mmHg"),
        })
    }
}

impl FixtureFile {
    pub fn parse(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_provider(self) -> Result<InMemoryProvider, FixtureError> {
        let records = self
            .records
            .into_iter()
            .map(FixtureRecord::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        let provider = self.apps.into_iter().fold(
            InMemoryProvider::new()
                .with_records(records)
                .with_granted(self.granted)
                .grant_on_request(self.grant_on_request),
            InMemoryProvider::with_app,
        );
        Ok(provider)
    }
}

/// Build a provider from the fixture at `path`.
///
/// A missing file yields an empty provider with nothing granted.
pub fn load_fixture(path: &Path) -> Result<InMemoryProvider, FixtureError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No health fixture found, starting empty");
        return Ok(InMemoryProvider::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let fixture = FixtureFile::parse(&contents)?;
    tracing::info!(
        path = %path.display(),
        records = fixture.records.len(),
        apps = fixture.apps.len(),
        "Loaded health fixture"
    );
    fixture.into_provider()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthPermission, RecordType};
    use crate::provider::{HealthDataProvider, TimeRange};
    use chrono::{Duration, TimeZone};

    const SAMPLE: &str = r#"{
        "granted": ["READ_BLOOD_PRESSURE"],
        "apps": [{ "package_name": "com.app.x", "app_label": "X", "icon": "iVBORw==" }],
        "records": [
            { "id": "r1", "package_name": "com.app.x", "time": "2025-06-03T07:15:00Z",
              "zone_offset_seconds": 7200, "systolic_mmhg": 120.0, "diastolic_mmhg": 80.0 },
            { "id": "r2", "package_name": "com.other", "time": "2025-06-04T19:00:00Z",
              "systolic_mmhg": 131.6, "diastolic_mmhg": 84.4 }
        ]
    }"#;

    fn june() -> TimeRange {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        TimeRange::between(start, start + Duration::days(30))
    }

    #[tokio::test]
    async fn sample_fixture_builds_provider() {
        let provider = FixtureFile::parse(SAMPLE).unwrap().into_provider().unwrap();
        let read_bp: PermissionSet = [HealthPermission::read(RecordType::BloodPressure)]
            .into_iter()
            .collect();

        assert!(provider.has_all_permissions(&read_bp).await.unwrap());
        let records = provider.read_blood_pressure_records(june()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].zone_offset_seconds, Some(7200));
        assert_eq!(records[1].metadata.last_modified_time, records[1].time);
        assert!(provider.compatible_apps()["com.app.x"].icon.is_some());
    }

    #[test]
    fn defaults_apply_to_empty_object() {
        let fixture = FixtureFile::parse("{}").unwrap();
        assert!(fixture.granted.is_empty());
        assert!(fixture.grant_on_request);
        assert!(fixture.records.is_empty());
    }

    #[test]
    fn out_of_range_pressure_rejected() {
        let json = r#"{ "records": [{ "id": "bad", "package_name": "p",
            "time": "2025-06-03T07:15:00Z", "systolic_mmhg": 250.0, "diastolic_mmhg": 80.0 }] }"#;
        let err = FixtureFile::parse(json).unwrap().into_provider().err().unwrap();
        assert!(matches!(err, FixtureError::InvalidRecord { ref id, .. } if id == "bad"));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(FixtureFile::parse("{ nope"), Err(FixtureError::Json(_))));
    }

    #[tokio::test]
    async fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let provider = load_fixture(&path).unwrap();
        let records = provider.read_blood_pressure_records(june()).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_gives_empty_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = load_fixture(&dir.path().join("absent.json")).unwrap();
        assert!(provider.compatible_apps().is_empty());
    }
}
