//! Time primitives (spec.md §4.6, Design Notes §9 "no coroutine-shaped
//! control flow" / "reads from the injected Clock").

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Monotonic and wall-clock time provider.
///
/// Every time-dependent computation in this workspace goes through a
/// `Clock` handle rather than reading `Utc::now()` directly, so tests can
/// pin "now" and exercise deadline pressure, idempotent regeneration, and
/// report immutability deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: reads the real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests: always returns a fixed instant, or one
/// advanced manually via [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(std::sync::Mutex::new(at))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.0.lock().unwrap() = at;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.0.lock().unwrap();
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// A `[start, end)` wall-clock interval on a single date, expressed in UTC.
///
/// Minute resolution, per spec.md §4.6 ("stored as UTC instants with minute
/// resolution for scheduling").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(end >= start);
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn intersects_date(&self, date: NaiveDate, zone_offset_minutes: i32) -> bool {
        let day_start = local_midnight(date, zone_offset_minutes);
        let day_end = day_start + chrono::Duration::days(1);
        self.start < day_end && day_start < self.end
    }
}

/// Combine a local calendar date and a local time-of-day into a UTC instant,
/// given the deployment's fixed offset (spec.md §4.6 / Open Questions:
/// "a single fixed local offset... per deployment").
pub fn local_datetime(date: NaiveDate, time: NaiveTime, zone_offset_minutes: i32) -> DateTime<Utc> {
    let naive = date.and_time(time);
    let local = naive - chrono::Duration::minutes(zone_offset_minutes as i64);
    DateTime::<Utc>::from_naive_utc_and_offset(local, Utc)
}

fn local_midnight(date: NaiveDate, zone_offset_minutes: i32) -> DateTime<Utc> {
    local_datetime(date, NaiveTime::MIN, zone_offset_minutes)
}

/// Convert a UTC instant to the local calendar date for the deployment's
/// fixed offset.
pub fn to_local_date(instant: DateTime<Utc>, zone_offset_minutes: i32) -> NaiveDate {
    (instant.naive_utc() + chrono::Duration::minutes(zone_offset_minutes as i64)).date()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let start = DateTime::parse_from_rfc3339("2026-01-06T09:00:00Z").unwrap().with_timezone(&Utc);
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(chrono::Duration::minutes(30));
        assert_eq!(clock.now(), start + chrono::Duration::minutes(30));
    }

    #[test]
    fn interval_overlap() {
        let a = Interval::new(
            DateTime::parse_from_rfc3339("2026-01-06T09:00:00Z").unwrap().with_timezone(&Utc),
            DateTime::parse_from_rfc3339("2026-01-06T10:00:00Z").unwrap().with_timezone(&Utc),
        );
        let b = Interval::new(
            DateTime::parse_from_rfc3339("2026-01-06T09:30:00Z").unwrap().with_timezone(&Utc),
            DateTime::parse_from_rfc3339("2026-01-06T11:00:00Z").unwrap().with_timezone(&Utc),
        );
        let c = Interval::new(
            DateTime::parse_from_rfc3339("2026-01-06T10:00:00Z").unwrap().with_timezone(&Utc),
            DateTime::parse_from_rfc3339("2026-01-06T11:00:00Z").unwrap().with_timezone(&Utc),
        );
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "touching intervals are not overlapping");
    }

    #[test]
    fn local_datetime_roundtrips_through_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        // UTC-5
        let instant = local_datetime(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), -300);
        assert_eq!(instant, DateTime::parse_from_rfc3339("2026-01-06T14:00:00Z").unwrap().with_timezone(&Utc));
        assert_eq!(to_local_date(instant, -300), date);
    }
}
