//! The time windows shown on the analytics screen.

use std::fmt::Display;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::transaction::{ResolvedRange, month_start, year_start};

/// The granularity of the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnalyticsPeriod {
    /// Today, bucketed into quarters of the day.
    Day,
    /// The last seven days including today, one bucket per day.
    #[default]
    Week,
    /// The current month so far.
    Month,
    /// The current month and the two before it, one bucket per month.
    Quarter,
    /// The current year so far, one bucket per month.
    Year,
}

impl AnalyticsPeriod {
    /// Every period in display order.
    pub const ALL: [AnalyticsPeriod; 5] = [
        AnalyticsPeriod::Day,
        AnalyticsPeriod::Week,
        AnalyticsPeriod::Month,
        AnalyticsPeriod::Quarter,
        AnalyticsPeriod::Year,
    ];

    /// The short name used to select the period, e.g. "Week".
    pub fn name(self) -> &'static str {
        match self {
            AnalyticsPeriod::Day => "Day",
            AnalyticsPeriod::Week => "Week",
            AnalyticsPeriod::Month => "Month",
            AnalyticsPeriod::Quarter => "Quarter",
            AnalyticsPeriod::Year => "Year",
        }
    }

    /// The description of the window shown above the charts.
    pub fn label(self) -> &'static str {
        match self {
            AnalyticsPeriod::Day => "Today",
            AnalyticsPeriod::Week => "Last 7 Days",
            AnalyticsPeriod::Month => "This Month",
            AnalyticsPeriod::Quarter => "Last 3 Months",
            AnalyticsPeriod::Year => "This Year",
        }
    }

    /// Parse a period from its name, ignoring case. "3M" also selects
    /// [AnalyticsPeriod::Quarter].
    ///
    /// Anything unrecognized falls back to [AnalyticsPeriod::Week].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();

        if label.eq_ignore_ascii_case("3M") {
            return AnalyticsPeriod::Quarter;
        }

        Self::ALL
            .into_iter()
            .find(|period| period.name().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

impl Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The interval covered by `period`, ending today.
pub fn resolve_period(period: AnalyticsPeriod, now: OffsetDateTime) -> ResolvedRange {
    let today = now.date();

    let start = match period {
        AnalyticsPeriod::Day => today,
        AnalyticsPeriod::Week => today - Duration::days(6),
        AnalyticsPeriod::Month => month_start(today),
        AnalyticsPeriod::Quarter => {
            let last_month = month_start(month_start(today) - Duration::days(1));
            month_start(last_month - Duration::days(1))
        }
        AnalyticsPeriod::Year => year_start(today),
    };

    ResolvedRange::from_dates(start, today, now.offset())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{AnalyticsPeriod, resolve_period};

    #[test]
    fn from_label_accepts_names_and_3m() {
        assert_eq!(AnalyticsPeriod::from_label("day"), AnalyticsPeriod::Day);
        assert_eq!(AnalyticsPeriod::from_label("3M"), AnalyticsPeriod::Quarter);
        assert_eq!(AnalyticsPeriod::from_label("quarter"), AnalyticsPeriod::Quarter);
        assert_eq!(AnalyticsPeriod::from_label("YEAR"), AnalyticsPeriod::Year);
        assert_eq!(AnalyticsPeriod::from_label("decade"), AnalyticsPeriod::Week);
    }

    #[test]
    fn day_covers_today() {
        let now = datetime!(2025-04-27 15:42 UTC);

        let got = resolve_period(AnalyticsPeriod::Day, now);

        assert_eq!(got.start, datetime!(2025-04-27 00:00 UTC));
        assert_eq!(got.end, datetime!(2025-04-27 23:59:59.999 UTC));
        assert_eq!(got.days, 1);
    }

    #[test]
    fn week_covers_seven_days() {
        let now = datetime!(2025-04-27 15:42 UTC);

        let got = resolve_period(AnalyticsPeriod::Week, now);

        assert_eq!(got.start, datetime!(2025-04-21 00:00 UTC));
        assert_eq!(got.days, 7);
    }

    #[test]
    fn month_starts_on_the_first() {
        let now = datetime!(2025-04-27 15:42 UTC);

        let got = resolve_period(AnalyticsPeriod::Month, now);

        assert_eq!(got.start, datetime!(2025-04-01 00:00 UTC));
        assert_eq!(got.days, 27);
    }

    #[test]
    fn quarter_starts_two_months_back() {
        let got = resolve_period(AnalyticsPeriod::Quarter, datetime!(2025-04-27 15:42 UTC));
        assert_eq!(got.start, datetime!(2025-02-01 00:00 UTC));

        let got = resolve_period(AnalyticsPeriod::Quarter, datetime!(2025-02-14 08:00 UTC));
        assert_eq!(got.start, datetime!(2024-12-01 00:00 UTC));
    }

    #[test]
    fn year_starts_on_first_of_january() {
        let now = datetime!(2025-04-27 15:42 +12);

        let got = resolve_period(AnalyticsPeriod::Year, now);

        assert_eq!(got.start, datetime!(2025-01-01 00:00 +12));
        assert_eq!(AnalyticsPeriod::Year.label(), "This Year");
    }
}
