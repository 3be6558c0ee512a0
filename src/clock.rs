//! The source of the current time.
//!
//! Everything that depends on "now" (date-range presets, analytics periods,
//! defaulted transaction dates) reads it from a [Clock] so that it can be
//! fixed in tests.

use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    Error,
    timezone::{find_timezone, offset_at},
};

/// Provides the current date and time in the user's local offset.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Reads the system clock and converts it to a named timezone.
#[derive(Clone, Copy)]
pub struct SystemClock {
    timezone: &'static Tz,
}

impl SystemClock {
    /// Create a clock for the canonical IANA timezone `canonical_timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is unknown.
    pub fn new(canonical_timezone: &str) -> Result<Self, Error> {
        Ok(Self {
            timezone: find_timezone(canonical_timezone)?,
        })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();

        now.to_offset(offset_at(self.timezone, now))
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
