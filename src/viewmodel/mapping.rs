use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};

use super::Clock;
use crate::models::{AppInfo, BloodPressureReading, BloodPressureRecord};

/// Show `time` in `offset` when the record captured one, else in the
/// clock's local offset at that instant.
pub fn date_time_with_offset_or_default(
    time: DateTime<Utc>,
    offset: Option<FixedOffset>,
    clock: &dyn Clock,
) -> DateTime<FixedOffset> {
    let offset = offset.unwrap_or_else(|| clock.offset_at(time));
    time.with_timezone(&offset)
}

pub fn to_reading(
    record: BloodPressureRecord,
    apps: &HashMap<String, AppInfo>,
    clock: &dyn Clock,
) -> BloodPressureReading {
    let time = date_time_with_offset_or_default(record.time, record.zone_offset(), clock);
    let source_app_info = apps.get(record.package_name()).cloned();

    BloodPressureReading {
        id: record.metadata.id,
        systolic: record.systolic,
        diastolic: record.diastolic,
        time,
        source_app_info,
    }
}

/// Map in provider order.
pub fn to_readings(
    records: Vec<BloodPressureRecord>,
    apps: &HashMap<String, AppInfo>,
    clock: &dyn Clock,
) -> Vec<BloodPressureReading> {
    records
        .into_iter()
        .map(|record| to_reading(record, apps, clock))
        .collect()
}
