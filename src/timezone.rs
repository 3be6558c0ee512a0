use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// Look up a timezone by its canonical IANA name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not in the timezone database.
pub fn find_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
}

/// The UTC offset of `timezone` at the instant `at`.
pub fn offset_at(timezone: &Tz, at: OffsetDateTime) -> UtcOffset {
    timezone.get_offset_utc(&at).to_utc()
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};

    use crate::Error;

    use super::{find_timezone, offset_at};

    #[test]
    fn unknown_timezone_is_an_error() {
        assert!(matches!(
            find_timezone("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError(name)) if name == "Mars/Olympus_Mons"
        ));
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let auckland = find_timezone("Pacific/Auckland").unwrap();

        assert_eq!(offset_at(auckland, datetime!(2025-01-15 00:00 UTC)), offset!(+13));
        assert_eq!(offset_at(auckland, datetime!(2025-07-15 00:00 UTC)), offset!(+12));
    }

    #[test]
    fn utc_has_zero_offset() {
        let utc = find_timezone("Etc/UTC").unwrap();

        assert_eq!(offset_at(utc, datetime!(2025-07-15 00:00 UTC)), offset!(UTC));
    }
}
