//! Source of "now" for the pipelines
//!
//! Pipelines never read the system clock themselves; the dashboard asks a
//! [`Clock`] once per request and passes the instant down.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Provides the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in a fixed IANA timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Clock for an IANA timezone name such as `Europe/Madrid`
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::new)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
