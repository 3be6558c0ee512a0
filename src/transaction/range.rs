//! Date-range selection and resolution for the transaction list.

use std::fmt::Display;

use serde::Serialize;
use time::{
    Date, Duration, Month, OffsetDateTime, Time, UtcOffset,
    format_description::BorrowedFormatItem,
    macros::{format_description, time},
};

/// The last representable instant of a day at millisecond precision.
const END_OF_DAY: Time = time!(23:59:59.999);

/// A named, relative date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreset {
    Last7Days,
    #[default]
    Last30Days,
    Last90Days,
    ThisYear,
}

impl DatePreset {
    /// Every preset in display order.
    pub const ALL: [DatePreset; 4] = [
        DatePreset::Last7Days,
        DatePreset::Last30Days,
        DatePreset::Last90Days,
        DatePreset::ThisYear,
    ];

    /// The label shown to the user, e.g. "Last 7 Days".
    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Last7Days => "Last 7 Days",
            DatePreset::Last30Days => "Last 30 Days",
            DatePreset::Last90Days => "Last 90 Days",
            DatePreset::ThisYear => "This Year",
        }
    }

    /// Parse a preset from its label, ignoring case and treating '-' as a space.
    ///
    /// Anything unrecognized falls back to [DatePreset::Last30Days].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().replace('-', " ");

        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(&label))
            .unwrap_or_default()
    }

    fn days_back(self) -> Option<i64> {
        match self {
            DatePreset::Last7Days => Some(7),
            DatePreset::Last30Days => Some(30),
            DatePreset::Last90Days => Some(90),
            DatePreset::ThisYear => None,
        }
    }
}

impl Display for DatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The date window selected for the transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// A window relative to now.
    Preset(DatePreset),
    /// An explicit pair of instants. The order does not matter.
    Custom {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::Preset(DatePreset::default())
    }
}

impl From<DatePreset> for DateRange {
    fn from(preset: DatePreset) -> Self {
        DateRange::Preset(preset)
    }
}

/// A concrete, inclusive interval of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    /// Midnight at the start of the first day.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// 23:59:59.999 on the last day.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    /// The number of calendar days in the interval, at least one.
    pub days: i64,
}

impl ResolvedRange {
    /// Create the interval covering every day from `start` to `end` in `offset`.
    ///
    /// The dates are swapped if `start` comes after `end`.
    pub fn from_dates(start: Date, end: Date, offset: UtcOffset) -> Self {
        let (start, end) = if start > end {
            (end, start)
        } else {
            (start, end)
        };

        Self {
            start: start.midnight().assume_offset(offset),
            end: end.with_time(END_OF_DAY).assume_offset(offset),
            days: ((end - start).whole_days() + 1).max(1),
        }
    }

    /// Whether `instant` falls within the interval, inclusive at both ends.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The first calendar day of the interval.
    pub fn start_date(&self) -> Date {
        self.start.date()
    }

    /// The last calendar day of the interval.
    pub fn end_date(&self) -> Date {
        self.end.date()
    }
}

/// Turn a date-range selection into a concrete interval relative to `now`.
///
/// The interval is expressed in the offset of `now`. Custom instants are
/// converted to that offset before their calendar days are taken.
pub fn resolve_date_range(range: &DateRange, now: OffsetDateTime) -> ResolvedRange {
    let offset = now.offset();
    let today = now.date();

    match range {
        DateRange::Preset(preset) => {
            let start = match preset.days_back() {
                Some(days) => today - Duration::days(days),
                None => year_start(today),
            };

            ResolvedRange::from_dates(start, today, offset)
        }
        DateRange::Custom { start, end } => ResolvedRange::from_dates(
            start.to_offset(offset).date(),
            end.to_offset(offset).date(),
            offset,
        ),
    }
}

/// e.g. "27 Apr 2025"
const RANGE_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none] [month repr:short] [year]");

/// Format an interval for display, e.g. "1 Apr 2025 - 27 Apr 2025".
///
/// # Errors
/// Returns the formatting error from [time] if either date cannot be formatted.
pub fn range_label(range: &ResolvedRange) -> Result<String, time::error::Format> {
    let start = range.start_date().format(RANGE_DATE_FORMAT)?;
    let end = range.end_date().format(RANGE_DATE_FORMAT)?;

    Ok(format!("{start} - {end}"))
}

pub(crate) fn year_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.ordinal()) - 1)
}

pub(crate) fn month_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The first day of the month after the one `date` is in.
pub(crate) fn next_month_start(date: Date) -> Date {
    let start = month_start(date);

    start + Duration::days(i64::from(last_day_of_month(start.year(), start.month())))
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
