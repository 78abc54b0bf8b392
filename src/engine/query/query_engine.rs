use chrono::NaiveDate;
use std::time::Instant;
use tracing::{debug, info};

use crate::engine::errors::{QueryError, QueryResult, StoreError, StoreResult};
use crate::engine::query::aggregate::Aggregator;
use crate::engine::query::filter::QueryFilter;
use crate::engine::store::{RecordStore, ViewSource};
use crate::engine::types::{
    CategoryFilter, CategoryRevenue, DailyRevenue, Dashboard, ProductRevenue, QueryPredicate,
    RevenueRow, SummaryStats,
};

/// Filter-and-aggregate entry point over one record store.
///
/// The engine holds no per-query state; every call binds its predicate,
/// opens one view on the store and aggregates from that snapshot.
pub struct SalesQueryEngine<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> SalesQueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `(min, max)` order date, `None` for an empty fact table.
    pub fn get_date_range(&self) -> QueryResult<Option<(NaiveDate, NaiveDate)>> {
        self.store.date_range().map_err(|e| self.unavailable(e))
    }

    pub fn get_categories(&self) -> QueryResult<Vec<String>> {
        self.store
            .distinct_categories()
            .map_err(|e| self.unavailable(e))
    }

    /// Full data range with every category, `None` when there is no data.
    pub fn default_predicate(&self) -> QueryResult<Option<QueryPredicate>> {
        Ok(self
            .get_date_range()?
            .map(|(start, end)| QueryPredicate::all_categories(start, end)))
    }

    pub fn query(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        category: impl Into<CategoryFilter>,
    ) -> QueryResult<Dashboard> {
        self.dashboard(&QueryPredicate::new(start_date, end_date, category.into()))
    }

    /// All five views from one snapshot; fails as a whole or not at all.
    pub fn dashboard(&self, predicate: &QueryPredicate) -> QueryResult<Dashboard> {
        self.run("dashboard", predicate, Aggregator::dashboard)
    }

    pub fn summary(&self, predicate: &QueryPredicate) -> QueryResult<SummaryStats> {
        self.run("summary", predicate, Aggregator::summary)
    }

    pub fn time_series(&self, predicate: &QueryPredicate) -> QueryResult<Vec<DailyRevenue>> {
        self.run("time_series", predicate, Aggregator::time_series)
    }

    pub fn category_breakdown(
        &self,
        predicate: &QueryPredicate,
    ) -> QueryResult<Vec<CategoryRevenue>> {
        self.run("category_breakdown", predicate, Aggregator::category_breakdown)
    }

    pub fn top_products(&self, predicate: &QueryPredicate) -> QueryResult<Vec<ProductRevenue>> {
        self.run("top_products", predicate, Aggregator::top_products)
    }

    pub fn raw_rows(&self, predicate: &QueryPredicate) -> QueryResult<Vec<RevenueRow>> {
        self.run("raw_rows", predicate, Aggregator::raw_rows)
    }

    pub fn reload(&self) -> QueryResult<()> {
        self.store.reload().map_err(|e| self.unavailable(e))?;
        info!(target: "sales::query", store = self.store.name(), "Store reloaded");
        Ok(())
    }

    fn run<R, F>(&self, view: &'static str, predicate: &QueryPredicate, f: F) -> QueryResult<R>
    where
        F: FnOnce(&dyn ViewSource) -> StoreResult<R>,
    {
        let started = Instant::now();
        let filter = QueryFilter::bind(predicate);
        if filter.selects_nothing() {
            debug!(target: "sales::query", %predicate, "Reversed date range, empty result");
        }
        let result = self
            .store
            .with_view(&filter, f)
            .map_err(|e| self.unavailable(e))?;
        debug!(
            target: "sales::query",
            view,
            %predicate,
            store = self.store.name(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Query finished"
        );
        Ok(result)
    }

    fn unavailable(&self, source: StoreError) -> QueryError {
        let err = QueryError::data_unavailable(self.store.name(), source);
        err.log_error();
        err
    }
}
