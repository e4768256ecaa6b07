//! Deterministic clock.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use mockable::Clock;

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Freeze at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Freeze at noon UTC on `day`, so the local date matches in any zone
    /// within twelve hours of UTC.
    #[must_use]
    pub fn on(day: NaiveDate) -> Self {
        Self(day.and_time(NaiveTime::MIN).and_utc() + chrono::TimeDelta::hours(12))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
