use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Source of the current time for aggregate construction.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock. Values are truncated to microseconds, the precision SQLite keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(6)
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
