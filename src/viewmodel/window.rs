use chrono::{Days, Utc};

use super::Clock;
use crate::provider::{ProviderError, TimeRange};

/// Window from local midnight `days` days before today up to now.
///
/// Midnight is resolved with the zone rules of the start date, so a DST
/// change inside the window does not shift the start off a day boundary.
pub fn trailing_days(clock: &dyn Clock, days: u32) -> Result<TimeRange, ProviderError> {
    let now = clock.now();
    let start_date = now
        .date_naive()
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| ProviderError::IllegalState(format!("cannot step back {days} days")))?;

    let start = clock.start_of_day(start_date).ok_or_else(|| {
        ProviderError::IllegalState(format!("no local start of day for {start_date}"))
    })?;

    Ok(TimeRange::between(start, now.with_timezone(&Utc)))
}
