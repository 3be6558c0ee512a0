//! Formatting of amounts and dates for display.

use numfmt::{Formatter, Precision};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

/// Format `amount` as money with two decimal places, e.g. "$1,234.50".
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        return format!("-{}", format_currency(amount.abs(), symbol));
    }

    if amount == 0.0 {
        // Zero is hardcoded as "0" by numfmt
        return format!("{symbol}0.00");
    }

    let Ok(formatter) = Formatter::currency(symbol) else {
        return format!("{symbol}{amount:.2}");
    };
    let mut formatted_string = formatter.precision(Precision::Decimals(2)).fmt_string(amount);

    // numfmt omits trailing zeros, so we must add them ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    match formatted_string.rfind('.') {
        Some(dot) => {
            let decimals = formatted_string.len() - dot - 1;
            formatted_string.extend(std::iter::repeat_n('0', 2usize.saturating_sub(decimals)));
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}

/// Format `amount` as money rounded to whole units, e.g. "$1,235".
pub fn format_currency_rounded(amount: f64, symbol: &str) -> String {
    let amount = amount.round();

    if amount < 0.0 {
        return format!("-{}", format_currency_rounded(amount.abs(), symbol));
    }

    if amount == 0.0 {
        return format!("{symbol}0");
    }

    match Formatter::currency(symbol) {
        Ok(formatter) => formatter.precision(Precision::Decimals(0)).fmt_string(amount),
        Err(_) => format!("{symbol}{amount:.0}"),
    }
}

/// e.g. "Apr 27, 2025"
const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// e.g. "10:30 AM"
const TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// Format the calendar date of `date_time`, e.g. "Apr 27, 2025".
///
/// # Errors
/// Returns the formatting error from [time] if the date cannot be formatted.
pub fn format_date(date_time: OffsetDateTime) -> Result<String, time::error::Format> {
    date_time.format(DATE_FORMAT)
}

/// Format the time of day of `date_time` on a 12-hour clock, e.g. "10:30 AM".
///
/// # Errors
/// Returns the formatting error from [time] if the time cannot be formatted.
pub fn format_time(date_time: OffsetDateTime) -> Result<String, time::error::Format> {
    date_time.format(TIME_FORMAT)
}

/// Describe when `date_time` happened relative to `now`.
///
/// Returns "Today, 10:30 AM" or "Yesterday, 10:30 AM" for recent times and
/// "Apr 27, 2025, 10:30 AM" otherwise. `date_time` is shown in the offset of
/// `now`.
///
/// # Errors
/// Returns the formatting error from [time] if the date or time cannot be
/// formatted.
pub fn relative_time_label(
    date_time: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<String, time::error::Format> {
    let date_time = date_time.to_offset(now.offset());
    let time = format_time(date_time)?;
    let today = now.date();

    let label = if date_time.date() == today {
        format!("Today, {time}")
    } else if Some(date_time.date()) == today.previous_day() {
        format!("Yesterday, {time}")
    } else {
        format!("{}, {time}", format_date(date_time)?)
    };

    Ok(label)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{
        format_currency, format_currency_rounded, format_date, format_time, relative_time_label,
    };

    #[test]
    fn formats_currency_with_cents() {
        assert_eq!(format_currency(12.34, "$"), "$12.34");
        assert_eq!(format_currency(12.3, "$"), "$12.30");
        assert_eq!(format_currency(12.0, "$"), "$12.00");
        assert_eq!(format_currency(1234.56, "$"), "$1,234.56");
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(-12.34, "$"), "-$12.34");
    }

    #[test]
    fn formats_currency_with_other_symbol() {
        assert_eq!(format_currency(5.25, "€"), "€5.25");
        assert_eq!(format_currency(0.0, "£"), "£0.00");
    }

    #[test]
    fn formats_rounded_currency() {
        assert_eq!(format_currency_rounded(12.6, "$"), "$13");
        assert_eq!(format_currency_rounded(0.4, "$"), "$0");
    }

    #[test]
    fn formats_date_and_time() {
        let date_time = datetime!(2025-04-27 10:30 +12);

        assert_eq!(format_date(date_time).unwrap(), "Apr 27, 2025");
        assert_eq!(format_date(datetime!(2025-04-05 10:30 UTC)).unwrap(), "Apr 5, 2025");
        assert_eq!(format_time(date_time).unwrap(), "10:30 AM");
        assert_eq!(format_time(datetime!(2025-04-27 00:05 UTC)).unwrap(), "12:05 AM");
        assert_eq!(format_time(datetime!(2025-04-27 12:00 UTC)).unwrap(), "12:00 PM");
        assert_eq!(format_time(datetime!(2025-04-27 21:45 UTC)).unwrap(), "9:45 PM");
    }

    #[test]
    fn relative_labels() {
        let now = datetime!(2025-04-27 15:00 +12);

        let today = relative_time_label(datetime!(2025-04-27 10:30 +12), now).unwrap();
        let yesterday = relative_time_label(datetime!(2025-04-26 21:15 +12), now).unwrap();
        let last_week = relative_time_label(datetime!(2025-04-20 08:00 +12), now).unwrap();

        assert_eq!(today, "Today, 10:30 AM");
        assert_eq!(yesterday, "Yesterday, 9:15 PM");
        assert_eq!(last_week, "Apr 20, 2025, 8:00 AM");
    }

    #[test]
    fn relative_label_uses_offset_of_now() {
        let now = datetime!(2025-04-27 15:00 +12);

        // 2025-04-27 09:00 in +12.
        let got = relative_time_label(datetime!(2025-04-26 21:00 UTC), now).unwrap();

        assert_eq!(got, "Today, 9:00 AM");
    }
}
