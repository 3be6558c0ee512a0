//! Spending summaries and trend data for the analytics view.

mod aggregation;
mod buckets;
mod period;

pub use aggregation::{Aggregates, CategoryShare, CategoryTotal, aggregate};
pub use buckets::{TimeSeries, bucket_transactions};
pub use period::{AnalyticsPeriod, resolve_period};

pub(crate) use aggregation::{category_shares, top_categories};
