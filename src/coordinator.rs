//! Owns the transactions and the view state, and keeps the derived views in sync.
//!
//! Every change to the transactions or the view state is followed by a full
//! recomputation of the affected view. Mutations are applied in memory before
//! they are written to the store, and a failed write is not rolled back.

use serde::Serialize;

use crate::{
    Error,
    analytics::{
        AnalyticsPeriod, CategoryShare, CategoryTotal, TimeSeries, aggregate, bucket_transactions,
        category_shares, resolve_period, top_categories,
    },
    category::CategoryFilter,
    clock::Clock,
    stores::TransactionStore,
    transaction::{
        DateRange, ResolvedRange, SortKey, Transaction, TransactionBuilder, TransactionFilter,
        TransactionId, TransactionPatch, filter_transactions, resolve_date_range,
        sort_transactions,
    },
};

/// The user's choices for the transaction list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub category_filter: CategoryFilter,
    pub search_text: String,
    pub date_range: DateRange,
    pub sort_key: SortKey,
}

/// The figures and chart data for one analytics period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub period: AnalyticsPeriod,
    /// The description of the period, e.g. "Last 7 Days".
    pub label: &'static str,
    pub range: ResolvedRange,
    pub total_amount: f64,
    pub category_totals: Vec<CategoryTotal>,
    pub most_spent_category: Option<CategoryTotal>,
    pub avg_daily_spending: f64,
    pub series: TimeSeries,
}

impl AnalyticsView {
    fn compute(
        transactions: &[Transaction],
        period: AnalyticsPeriod,
        range: ResolvedRange,
    ) -> Self {
        let in_period = filter_transactions(
            transactions,
            &TransactionFilter {
                date_range: range,
                category: CategoryFilter::All,
                search: "",
            },
        );
        let aggregates = aggregate(&in_period, range.days);
        let series = bucket_transactions(&in_period, period, &range);

        Self {
            period,
            label: period.label(),
            range,
            total_amount: aggregates.total_amount,
            category_totals: aggregates.category_totals,
            most_spent_category: aggregates.most_spent_category,
            avg_daily_spending: aggregates.avg_daily_spending,
            series,
        }
    }

    /// Each category's share of the period's total.
    pub fn category_shares(&self) -> Vec<CategoryShare> {
        category_shares(&self.category_totals, self.total_amount)
    }

    /// The `count` categories with the largest totals, largest first.
    pub fn top_categories(&self, count: usize) -> Vec<CategoryTotal> {
        top_categories(&self.category_totals, count)
    }
}

/// Coordinates the transaction list, its views and the backing store.
pub struct Coordinator<S, C> {
    store: S,
    clock: C,
    transactions: Vec<Transaction>,
    view_state: ViewState,
    analytics_period: AnalyticsPeriod,
    filtered_sorted: Vec<Transaction>,
    analytics: AnalyticsView,
    load_failed: bool,
    unsaved_changes: bool,
}

impl<S, C> Coordinator<S, C>
where
    S: TransactionStore,
    C: Clock,
{
    /// Load the transactions from `store` and compute the views with the
    /// default view state.
    ///
    /// This never fails. If the store cannot be read, the coordinator starts
    /// with no transactions and [Coordinator::load_failed] returns `true`.
    pub async fn load(store: S, clock: C) -> Self {
        Self::load_with(store, clock, ViewState::default(), AnalyticsPeriod::default()).await
    }

    /// Like [Coordinator::load], but starting from the given view state and
    /// analytics period.
    pub async fn load_with(
        store: S,
        clock: C,
        view_state: ViewState,
        analytics_period: AnalyticsPeriod,
    ) -> Self {
        let (transactions, load_failed) = match store.load_all().await {
            Ok(transactions) => {
                tracing::info!("Loaded {} transactions", transactions.len());
                (transactions, false)
            }
            Err(error) => {
                tracing::error!("Could not load transactions, starting empty: {error}");
                (Vec::new(), true)
            }
        };

        let now = clock.now();
        let analytics = AnalyticsView::compute(
            &transactions,
            analytics_period,
            resolve_period(analytics_period, now),
        );

        let mut coordinator = Self {
            store,
            clock,
            transactions,
            view_state,
            analytics_period,
            filtered_sorted: Vec::new(),
            analytics,
            load_failed,
            unsaved_changes: false,
        };
        coordinator.recompute_list();

        coordinator
    }

    /// Every transaction, in the order they were added.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The transactions that pass the current filters, in the current sort order.
    pub fn filtered_sorted_view(&self) -> &[Transaction] {
        &self.filtered_sorted
    }

    /// The summary and chart data for the current analytics period.
    pub fn analytics_view(&self) -> &AnalyticsView {
        &self.analytics
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn analytics_period(&self) -> AnalyticsPeriod {
        self.analytics_period
    }

    /// Whether the last attempt to read the store failed.
    ///
    /// This distinguishes an unreadable store from one that is empty.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Whether the transactions in memory differ from the last successful save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_category_filter(&mut self, category_filter: CategoryFilter) {
        tracing::debug!("Category filter set to {}", category_filter.label());
        self.view_state.category_filter = category_filter;
        self.recompute_list();
    }

    pub fn set_search_text(&mut self, search_text: &str) {
        tracing::debug!("Search text set to {search_text:?}");
        self.view_state.search_text = search_text.to_owned();
        self.recompute_list();
    }

    pub fn set_date_range(&mut self, date_range: DateRange) {
        tracing::debug!("Date range set to {date_range:?}");
        self.view_state.date_range = date_range;
        self.recompute_list();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        tracing::debug!("Sort key set to {sort_key}");
        self.view_state.sort_key = sort_key;
        self.recompute_list();
    }

    pub fn set_analytics_period(&mut self, analytics_period: AnalyticsPeriod) {
        tracing::debug!("Analytics period set to {analytics_period}");
        self.analytics_period = analytics_period;
        self.recompute_analytics();
    }

    /// Recompute both views from the current state and time.
    ///
    /// Call this when "now" may have moved on enough to change a date range,
    /// e.g. after midnight.
    pub fn recompute(&mut self) {
        self.recompute_list();
        self.recompute_analytics();
    }

    /// Validate `builder` and add the new transaction.
    ///
    /// The transaction is added and the views are updated before it is saved.
    /// If saving fails, the transaction stays in memory, the error is
    /// returned and [Coordinator::has_unsaved_changes] returns `true`. The
    /// unsaved transaction, with its generated ID, is then the last element of
    /// [Coordinator::transactions].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount], [Error::NegativeAmount] or
    ///   [Error::InvalidDateFormat] if validation fails, without changing anything,
    /// - or a persistence error if the transactions could not be saved.
    pub async fn add(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = builder.finalise(self.clock.now())?;

        self.transactions.push(transaction.clone());
        tracing::info!("Added transaction {}", transaction.id);
        self.recompute();
        self.persist().await?;

        Ok(transaction)
    }

    /// Apply `patch` to the transaction with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no transaction has the ID `id`,
    /// - a validation error if the patch is invalid, without changing anything,
    /// - or a persistence error if the transactions could not be saved.
    pub async fn update(
        &mut self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let index = self.position_of(id)?;
        let updated = patch.apply_to(&self.transactions[index], self.clock.now())?;

        self.transactions[index] = updated.clone();
        tracing::info!("Updated transaction {id}");
        self.recompute();
        self.persist().await?;

        Ok(updated)
    }

    /// Remove the transaction with `id`, returning it.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no transaction has the ID `id`,
    /// - or a persistence error if the transactions could not be saved.
    pub async fn remove(&mut self, id: &TransactionId) -> Result<Transaction, Error> {
        let index = self.position_of(id)?;
        let removed = self.transactions.remove(index);

        tracing::info!("Removed transaction {id}");
        self.recompute();
        self.persist().await?;

        Ok(removed)
    }

    /// Replace the transactions in memory with what is in the store.
    ///
    /// # Errors
    /// Returns the store's error if it cannot be read. The transactions in
    /// memory are kept and [Coordinator::load_failed] returns `true`.
    pub async fn reload(&mut self) -> Result<(), Error> {
        match self.store.load_all().await {
            Ok(transactions) => {
                tracing::info!("Reloaded {} transactions", transactions.len());
                self.transactions = transactions;
                self.load_failed = false;
                self.unsaved_changes = false;
                self.recompute();
                Ok(())
            }
            Err(error) => {
                tracing::error!("Could not reload transactions: {error}");
                self.load_failed = true;
                Err(error)
            }
        }
    }

    /// Try again to save transactions after a failed write.
    ///
    /// Does nothing if there are no unsaved changes.
    ///
    /// # Errors
    /// Returns the store's error if the transactions still cannot be saved.
    pub async fn retry_save(&mut self) -> Result<(), Error> {
        if !self.unsaved_changes {
            return Ok(());
        }

        self.persist().await
    }

    /// Save every transaction, retrying once before giving up.
    async fn persist(&mut self) -> Result<(), Error> {
        if let Err(error) = self.store.save_all(&self.transactions).await {
            tracing::warn!("Could not save transactions, retrying: {error}");

            if let Err(error) = self.store.save_all(&self.transactions).await {
                tracing::error!("Could not save transactions: {error}");
                self.unsaved_changes = true;
                return Err(error);
            }
        }

        self.unsaved_changes = false;
        Ok(())
    }

    fn position_of(&self, id: &TransactionId) -> Result<usize, Error> {
        self.transactions
            .iter()
            .position(|transaction| &transaction.id == id)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    fn recompute_list(&mut self) {
        let now = self.clock.now();
        let filter = TransactionFilter {
            date_range: resolve_date_range(&self.view_state.date_range, now),
            category: self.view_state.category_filter,
            search: &self.view_state.search_text,
        };

        let mut filtered_sorted = filter_transactions(&self.transactions, &filter);
        sort_transactions(&mut filtered_sorted, self.view_state.sort_key);

        tracing::debug!(
            "Transaction list recomputed: {} of {} shown",
            filtered_sorted.len(),
            self.transactions.len()
        );
        self.filtered_sorted = filtered_sorted;
    }

    fn recompute_analytics(&mut self) {
        let range = resolve_period(self.analytics_period, self.clock.now());

        self.analytics = AnalyticsView::compute(&self.transactions, self.analytics_period, range);
        tracing::debug!(
            "Analytics recomputed for {}: total {}",
            self.analytics_period,
            self.analytics.total_amount
        );
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        analytics::AnalyticsPeriod,
        category::{Category, CategoryFilter},
        clock::FixedClock,
        stores::{MemoryStore, TransactionStore, encode_transactions},
        transaction::{
            DatePreset, DateRange, SortKey, Transaction, TransactionId, TransactionPatch,
        },
    };

    use super::Coordinator;

    const NOW: OffsetDateTime = datetime!(2025-04-27 15:00 +12);

    fn transaction(
        id: &str,
        amount: f64,
        category: Category,
        occurred_at: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new_unchecked(id),
            amount,
            category,
            description: None,
            occurred_at,
        }
    }

    async fn coordinator_with(
        transactions: &[Transaction],
    ) -> Coordinator<MemoryStore, FixedClock> {
        let store = MemoryStore::with_json(&encode_transactions(transactions).unwrap());

        Coordinator::load(store, FixedClock(NOW)).await
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_ref()).collect()
    }

    #[tokio::test]
    async fn starts_with_default_view_state() {
        let coordinator = coordinator_with(&[]).await;

        let view_state = coordinator.view_state();
        assert_eq!(view_state.category_filter, CategoryFilter::All);
        assert_eq!(view_state.search_text, "");
        assert_eq!(view_state.date_range, DateRange::Preset(DatePreset::Last30Days));
        assert_eq!(view_state.sort_key, SortKey::Date);
        assert_eq!(coordinator.analytics_period(), AnalyticsPeriod::Week);
        assert!(!coordinator.load_failed());
    }

    #[tokio::test]
    async fn view_is_newest_first_by_default() {
        let coordinator = coordinator_with(&[
            transaction("old", 5.0, Category::Food, NOW - Duration::days(3)),
            transaction("new", 5.0, Category::Food, NOW),
            transaction("too-old", 5.0, Category::Food, NOW - Duration::days(45)),
        ])
        .await;

        assert_eq!(ids(coordinator.filtered_sorted_view()), ["new", "old"]);
    }

    #[tokio::test]
    async fn last_seven_days_excludes_older_transactions() {
        let mut coordinator = coordinator_with(&[
            transaction("today", 20.0, Category::Food, NOW),
            transaction("eight-days-ago", 30.0, Category::Transport, NOW - Duration::days(8)),
        ])
        .await;

        coordinator.set_date_range(DateRange::Preset(DatePreset::Last7Days));

        let view = coordinator.filtered_sorted_view();
        assert_eq!(ids(view), ["today"]);
        assert_eq!(view.iter().map(|t| t.amount).sum::<f64>(), 20.0);
    }

    #[tokio::test]
    async fn setters_recompute_the_list() {
        let mut coordinator = coordinator_with(&[
            transaction("food", 20.0, Category::Food, NOW),
            transaction("bus", 3.0, Category::Transport, NOW - Duration::hours(1)),
            transaction("bills", 90.0, Category::Bills, NOW - Duration::hours(2)),
        ])
        .await;

        coordinator.set_sort_key(SortKey::Amount);
        assert_eq!(ids(coordinator.filtered_sorted_view()), ["bills", "food", "bus"]);

        coordinator.set_category_filter(CategoryFilter::Only(Category::Transport));
        assert_eq!(ids(coordinator.filtered_sorted_view()), ["bus"]);

        coordinator.set_category_filter(CategoryFilter::All);
        coordinator.set_search_text("BIL");
        assert_eq!(ids(coordinator.filtered_sorted_view()), ["bills"]);
    }

    #[tokio::test]
    async fn view_is_deterministic() {
        let transactions: Vec<Transaction> = (0..30)
            .map(|i| {
                transaction(
                    &format!("t{i}"),
                    f64::from(i % 4),
                    Category::ALL[i as usize % Category::ALL.len()],
                    NOW - Duration::hours(i64::from(i % 5)),
                )
            })
            .collect();

        for sort_key in SortKey::ALL {
            let mut first = coordinator_with(&transactions).await;
            let mut second = coordinator_with(&transactions).await;
            first.set_sort_key(sort_key);
            second.set_sort_key(sort_key);

            assert_eq!(first.filtered_sorted_view(), second.filtered_sorted_view());
        }
    }

    #[tokio::test]
    async fn add_then_remove_leaves_set_unchanged() {
        let mut coordinator =
            coordinator_with(&[transaction("existing", 5.0, Category::Bills, NOW)]).await;
        let before = coordinator.transactions().to_vec();

        let added = coordinator
            .add(Transaction::build("15.5", "Food"))
            .await
            .unwrap();
        assert_eq!(added.amount, 15.5);
        assert_eq!(added.category, Category::Food);
        assert_eq!(added.occurred_at, NOW);
        assert_eq!(coordinator.transactions().len(), 2);

        coordinator.remove(&added.id).await.unwrap();

        assert_eq!(coordinator.transactions(), before);
        let stored = coordinator.store().load_all().await.unwrap();
        assert_eq!(stored, before);
    }

    #[tokio::test]
    async fn added_transaction_shows_in_both_views() {
        let mut coordinator = coordinator_with(&[]).await;

        coordinator
            .add(Transaction::build("12", "Health").description("Pharmacy"))
            .await
            .unwrap();

        assert_eq!(coordinator.filtered_sorted_view().len(), 1);
        assert_eq!(coordinator.analytics_view().total_amount, 12.0);
    }

    #[tokio::test]
    async fn invalid_add_changes_nothing() {
        let mut coordinator = coordinator_with(&[]).await;

        let got = coordinator.add(Transaction::build("-4", "Food")).await;

        assert_eq!(got, Err(Error::NegativeAmount(-4.0)));
        assert!(coordinator.transactions().is_empty());
        assert_eq!(coordinator.store().save_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let mut coordinator =
            coordinator_with(&[transaction("a", 5.0, Category::Food, NOW)]).await;
        let before = coordinator.transactions().to_vec();
        let missing = TransactionId::new_unchecked("missing");

        let got = coordinator
            .update(&missing, TransactionPatch::default().amount("10"))
            .await;

        assert_eq!(got, Err(Error::NotFound(missing)));
        assert_eq!(coordinator.transactions(), before);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let mut coordinator = coordinator_with(&[]).await;
        let missing = TransactionId::new_unchecked("missing");

        let got = coordinator.remove(&missing).await;

        assert_eq!(got, Err(Error::NotFound(missing)));
    }

    #[tokio::test]
    async fn update_merges_patch_and_keeps_id() {
        let mut coordinator =
            coordinator_with(&[transaction("a", 5.0, Category::Food, NOW)]).await;
        let id = TransactionId::new_unchecked("a");

        let got = coordinator
            .update(&id, TransactionPatch::default().category("Shopping"))
            .await
            .unwrap();

        assert_eq!(got.id, id);
        assert_eq!(got.amount, 5.0);
        assert_eq!(got.category, Category::Shopping);
        assert_eq!(coordinator.transactions()[0], got);
    }

    #[tokio::test]
    async fn invalid_update_changes_nothing() {
        let mut coordinator =
            coordinator_with(&[transaction("a", 5.0, Category::Food, NOW)]).await;
        let before = coordinator.transactions().to_vec();

        let got = coordinator
            .update(
                &TransactionId::new_unchecked("a"),
                TransactionPatch::default().occurred_at("not a date"),
            )
            .await;

        assert!(matches!(got, Err(Error::InvalidDateFormat(_, _))));
        assert_eq!(coordinator.transactions(), before);
    }

    #[tokio::test]
    async fn failed_load_starts_empty() {
        let store = MemoryStore::with_json("[]");
        store.fail_loads(true).unwrap();

        let coordinator = Coordinator::load(store, FixedClock(NOW)).await;

        assert!(coordinator.load_failed());
        assert!(coordinator.transactions().is_empty());
        assert_eq!(coordinator.analytics_view().total_amount, 0.0);
    }

    #[tokio::test]
    async fn reload_recovers_after_failed_load() {
        let json = encode_transactions(&[transaction("a", 5.0, Category::Food, NOW)]).unwrap();
        let store = MemoryStore::with_json(&json);
        store.fail_loads(true).unwrap();
        let mut coordinator = Coordinator::load(store, FixedClock(NOW)).await;

        coordinator.store().fail_loads(false).unwrap();
        coordinator.reload().await.unwrap();

        assert!(!coordinator.load_failed());
        assert_eq!(ids(coordinator.filtered_sorted_view()), ["a"]);
    }

    #[tokio::test]
    async fn save_is_retried_once() {
        let mut coordinator = coordinator_with(&[]).await;
        coordinator.store().fail_next_saves(1).unwrap();

        let got = coordinator.add(Transaction::build("3", "Transport")).await;

        assert!(got.is_ok());
        assert!(!coordinator.has_unsaved_changes());
        assert_eq!(coordinator.store().save_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_save_keeps_memory_and_can_be_retried() {
        let mut coordinator = coordinator_with(&[]).await;
        coordinator.store().fail_next_saves(2).unwrap();

        let got = coordinator.add(Transaction::build("3", "Transport")).await;

        assert!(matches!(got, Err(Error::StorageUnavailable(_))));
        assert_eq!(coordinator.transactions().len(), 1);
        assert_eq!(coordinator.filtered_sorted_view().len(), 1);
        assert!(coordinator.has_unsaved_changes());

        coordinator.retry_save().await.unwrap();

        assert!(!coordinator.has_unsaved_changes());
        let stored = coordinator.store().load_all().await.unwrap();
        assert_eq!(stored, coordinator.transactions());
    }

    #[tokio::test]
    async fn unsaved_transaction_can_be_found_after_failed_add() {
        let mut coordinator =
            coordinator_with(&[transaction("existing", 5.0, Category::Bills, NOW)]).await;
        coordinator.store().fail_next_saves(2).unwrap();

        let got = coordinator.add(Transaction::build("3", "Transport")).await;
        assert!(got.is_err());

        let unsaved = coordinator.transactions().last().unwrap().clone();
        assert_eq!(unsaved.amount, 3.0);
        assert_eq!(unsaved.category, Category::Transport);
        let json = coordinator.store().json().unwrap().unwrap();
        assert!(!json.contains(&unsaved.id.to_string()));

        coordinator.retry_save().await.unwrap();

        let json = coordinator.store().json().unwrap().unwrap();
        assert!(json.contains(&unsaved.id.to_string()));
        coordinator.remove(&unsaved.id).await.unwrap();
        assert_eq!(coordinator.transactions().len(), 1);
    }

    #[tokio::test]
    async fn week_analytics_buckets_by_day() {
        let range_start = datetime!(2025-04-21 00:00 +12);
        let mut coordinator = coordinator_with(&[transaction(
            "day-three",
            10.0,
            Category::Food,
            range_start + Duration::days(2) + Duration::hours(9),
        )])
        .await;

        coordinator.set_analytics_period(AnalyticsPeriod::Week);
        let view = coordinator.analytics_view();

        assert_eq!(view.label, "Last 7 Days");
        assert_eq!(view.series.series.len(), 7);
        assert_eq!(view.series.series[2], 10.0);
        assert_eq!(view.total_amount, 10.0);
        assert_eq!(view.avg_daily_spending, 10.0 / 7.0);
        assert_eq!(
            view.most_spent_category.map(|entry| entry.category),
            Some(Category::Food)
        );
    }

    #[tokio::test]
    async fn analytics_ignores_list_filters() {
        let mut coordinator = coordinator_with(&[
            transaction("food", 20.0, Category::Food, NOW),
            transaction("bus", 5.0, Category::Transport, NOW),
        ])
        .await;

        coordinator.set_category_filter(CategoryFilter::Only(Category::Food));
        coordinator.set_analytics_period(AnalyticsPeriod::Day);
        let view = coordinator.analytics_view();

        assert_eq!(view.total_amount, 25.0);
        assert_eq!(view.category_shares()[0].percent, 80);
        assert_eq!(view.top_categories(1)[0].category, Category::Food);
    }
}
