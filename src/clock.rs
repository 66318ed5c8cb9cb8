//! Injected time source.
//! Deletion timestamps and retention ages both come through here so tests can
//! pin "now" without touching the system clock.

use chrono::{Local, NaiveDateTime};

pub trait Clock {
    /// Current local time, second precision is all the record format keeps.
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system's local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
