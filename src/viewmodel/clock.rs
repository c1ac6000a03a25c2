use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

/// Source of "now" and of the local zone rules.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local offset in effect at `instant`.
    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset;

    /// First instant of `date` in this clock's zone, resolved with the
    /// offset in effect on that date.
    fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>>;
}

/// Midnight of `date` in `zone`, or the end of the gap when a transition
/// skips midnight.
fn start_of_day_in<Tz: TimeZone>(zone: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    zone.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
}

/// Wall clock in the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }

    fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        start_of_day_in(&Local, date)
    }
}

/// Frozen clock with a single fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        *self.now.offset()
    }

    fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        start_of_day_in(self.now.offset(), date)
    }
}
