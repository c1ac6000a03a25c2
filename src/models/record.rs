use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::Pressure;

/// Identifies the app that wrote a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOrigin {
    pub package_name: String,
}

/// Provider-side bookkeeping attached to every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Unique per source record.
    pub id: String,
    pub data_origin: DataOrigin,
    pub last_modified_time: DateTime<Utc>,
}

/// A blood pressure measurement as returned by the health-data provider,
/// before it is mapped into a [`BloodPressureReading`](super::BloodPressureReading).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureRecord {
    pub time: DateTime<Utc>,
    /// Offset captured on the recording device, if the writer supplied one.
    pub zone_offset_seconds: Option<i32>,
    pub systolic: Pressure,
    pub diastolic: Pressure,
    pub metadata: RecordMetadata,
}

impl BloodPressureRecord {
    /// Captured zone offset. Out-of-range values are treated as absent.
    pub fn zone_offset(&self) -> Option<FixedOffset> {
        self.zone_offset_seconds.and_then(FixedOffset::east_opt)
    }

    pub fn package_name(&self) -> &str {
        &self.metadata.data_origin.package_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(offset: Option<i32>) -> BloodPressureRecord {
        let time = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        BloodPressureRecord {
            time,
            zone_offset_seconds: offset,
            systolic: Pressure::millimeters_of_mercury(118.0),
            diastolic: Pressure::millimeters_of_mercury(76.0),
            metadata: RecordMetadata {
                id: "rec-1".into(),
                data_origin: DataOrigin {
                    package_name: "com.example.cuff".into(),
                },
                last_modified_time: time,
            },
        }
    }

    #[test]
    fn zone_offset_from_seconds() {
        let r = record(Some(3600));
        assert_eq!(r.zone_offset(), FixedOffset::east_opt(3600));
    }

    #[test]
    fn missing_or_invalid_offset_is_none() {
        assert!(record(None).zone_offset().is_none());
        assert!(record(Some(90_000)).zone_offset().is_none());
    }

    #[test]
    fn package_name_reads_data_origin() {
        assert_eq!(record(None).package_name(), "com.example.cuff");
    }
}
