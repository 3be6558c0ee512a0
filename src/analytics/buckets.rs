//! Splits spending over a period into labelled buckets for the trend chart.

use serde::Serialize;
use time::{
    Date, Duration, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::transaction::{ResolvedRange, Transaction, month_start, next_month_start, year_start};

use super::period::AnalyticsPeriod;

const DAY_PART_LABELS: [&str; 4] = ["12AM", "6AM", "12PM", "6PM"];
const HOURS_PER_DAY_PART: u8 = 6;
const MONTH_BUCKET_COUNT: i64 = 5;
const MONTHS_PER_YEAR: usize = 12;

const WEEKDAY_LABEL_FORMAT: &[BorrowedFormatItem] = format_description!("[weekday repr:short]");
const MONTH_LABEL_FORMAT: &[BorrowedFormatItem] = format_description!("[month repr:short]");

/// Chart-ready sums, one per label.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    /// The raw sum of each bucket.
    pub series: Vec<f64>,
}

impl TimeSeries {
    fn with_labels(labels: Vec<String>) -> Self {
        let series = vec![0.0; labels.len()];

        Self { labels, series }
    }

    /// The series rounded to whole currency units, for display.
    pub fn rounded_series(&self) -> Vec<f64> {
        self.series.iter().map(|value| value.round()).collect()
    }

    fn add(&mut self, index: usize, amount: f64) {
        if let Some(total) = self.series.get_mut(index) {
            *total += amount;
        }
    }
}

/// Maps a local date-time to the index of the bucket it falls in.
type BucketFn = Box<dyn Fn(OffsetDateTime) -> Option<usize>>;

/// Sum `transactions` into the buckets for `period` over `range`.
///
/// Transactions outside `range` are ignored. Every bucket is present even when
/// nothing was spent in it.
pub fn bucket_transactions(
    transactions: &[Transaction],
    period: AnalyticsPeriod,
    range: &ResolvedRange,
) -> TimeSeries {
    let offset = range.start.offset();
    let start_date = range.start_date();
    let end_date = range.end_date();

    let (mut time_series, bucket_of): (TimeSeries, BucketFn) = match period {
        AnalyticsPeriod::Day => (
            TimeSeries::with_labels(DAY_PART_LABELS.map(str::to_owned).to_vec()),
            Box::new(|local: OffsetDateTime| Some(usize::from(local.hour() / HOURS_PER_DAY_PART))),
        ),
        AnalyticsPeriod::Week => (
            TimeSeries::with_labels(
                dates_between(start_date, end_date, 1)
                    .map(weekday_label)
                    .collect(),
            ),
            Box::new(move |local: OffsetDateTime| {
                days_since(start_date, local.date()).try_into().ok()
            }),
        ),
        AnalyticsPeriod::Month => {
            let interval = (range.days + MONTH_BUCKET_COUNT - 1) / MONTH_BUCKET_COUNT;

            (
                TimeSeries::with_labels(
                    dates_between(start_date, end_date, interval)
                        .map(|date| date.day().to_string())
                        .collect(),
                ),
                Box::new(move |local: OffsetDateTime| {
                    (days_since(start_date, local.date()) / interval).try_into().ok()
                }),
            )
        }
        AnalyticsPeriod::Quarter => (
            TimeSeries::with_labels(
                months_between(start_date, end_date)
                    .map(month_label)
                    .collect(),
            ),
            Box::new(move |local: OffsetDateTime| {
                (month_index(local.date()) - month_index(start_date)).try_into().ok()
            }),
        ),
        AnalyticsPeriod::Year => {
            let year = start_date.year();

            (
                TimeSeries::with_labels(
                    std::iter::successors(Some(year_start(start_date)), |date| {
                        Some(next_month_start(*date))
                    })
                    .take(MONTHS_PER_YEAR)
                    .map(month_label)
                    .collect(),
                ),
                Box::new(move |local: OffsetDateTime| {
                    (local.year() == year).then(|| usize::from(u8::from(local.month()) - 1))
                }),
            )
        }
    };

    for transaction in transactions {
        if !range.contains(transaction.occurred_at) {
            continue;
        }

        if let Some(index) = bucket_of(transaction.occurred_at.to_offset(offset)) {
            time_series.add(index, transaction.amount);
        }
    }

    time_series
}

/// Every `step`th date from `start` up to and including `end`.
fn dates_between(start: Date, end: Date, step: i64) -> impl Iterator<Item = Date> {
    let step = Duration::days(step.max(1));

    std::iter::successors(Some(start), move |date| Some(*date + step))
        .take_while(move |date| *date <= end)
}

/// The first day of each month that overlaps `start` to `end`.
fn months_between(start: Date, end: Date) -> impl Iterator<Item = Date> {
    std::iter::successors(Some(month_start(start)), |date| Some(next_month_start(*date)))
        .take_while(move |date| *date <= end)
}

fn days_since(start: Date, date: Date) -> i64 {
    (date - start).whole_days()
}

fn month_index(date: Date) -> i64 {
    i64::from(date.year()) * 12 + i64::from(u8::from(date.month()))
}

fn weekday_label(date: Date) -> String {
    date.format(WEEKDAY_LABEL_FORMAT)
        .unwrap_or_else(|_| date.weekday().to_string())
}

fn month_label(date: Date) -> String {
    date.format(MONTH_LABEL_FORMAT)
        .unwrap_or_else(|_| date.month().to_string())
}
