//! Record stores: the leaf of the query pipeline.
//!
//! A store owns the fact table and exposes two things:
//! - whole-table lookups (`load`, `date_range`, `distinct_categories`)
//! - a scoped [`ViewSource`] over the rows selected by a bound
//!   [`QueryFilter`], from which the shared aggregator derives every view.
//!
//! The memory store reduces its columnar table in process; the SQLite
//! store answers each reduction with a parameterized grouped query.

pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;

use crate::engine::errors::StoreResult;
use crate::engine::query::filter::QueryFilter;
use crate::engine::types::SalesRecord;
use crate::shared::money::Money;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Scalar totals of a filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub revenue: Money,
    /// Distinct `order_id` values.
    pub orders: u64,
}

/// Grouped reductions over the rows a filter selected.
///
/// Group results may come back in any order; ranking, truncation and
/// sentinels are the aggregator's job.
pub trait ViewSource {
    fn totals(&self) -> StoreResult<Totals>;

    fn revenue_by_date(&self) -> StoreResult<Vec<(NaiveDate, Money)>>;

    fn revenue_by_category(&self) -> StoreResult<Vec<(String, Money)>>;

    fn revenue_by_product(&self) -> StoreResult<Vec<(String, Money)>>;

    fn records(&self) -> StoreResult<Vec<SalesRecord>>;
}

pub trait RecordStore: Send + Sync {
    /// Identity used in logs and errors.
    fn name(&self) -> &str;

    fn load(&self) -> StoreResult<Vec<SalesRecord>>;

    /// `None` when the fact table is empty.
    fn date_range(&self) -> StoreResult<Option<(NaiveDate, NaiveDate)>>;

    /// Canonical category labels, sorted ascending.
    fn distinct_categories(&self) -> StoreResult<Vec<String>>;

    /// Re-read the backing source.
    fn reload(&self) -> StoreResult<()>;

    /// Runs `f` against one consistent snapshot of the rows `filter` selects.
    fn with_view<R, F>(&self, filter: &QueryFilter, f: F) -> StoreResult<R>
    where
        F: FnOnce(&dyn ViewSource) -> StoreResult<R>;
}

/// Store chosen at runtime from configuration.
pub enum Backend {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl RecordStore for Backend {
    fn name(&self) -> &str {
        match self {
            Backend::Memory(s) => s.name(),
            Backend::Sqlite(s) => s.name(),
        }
    }

    fn load(&self) -> StoreResult<Vec<SalesRecord>> {
        match self {
            Backend::Memory(s) => s.load(),
            Backend::Sqlite(s) => s.load(),
        }
    }

    fn date_range(&self) -> StoreResult<Option<(NaiveDate, NaiveDate)>> {
        match self {
            Backend::Memory(s) => s.date_range(),
            Backend::Sqlite(s) => s.date_range(),
        }
    }

    fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        match self {
            Backend::Memory(s) => s.distinct_categories(),
            Backend::Sqlite(s) => s.distinct_categories(),
        }
    }

    fn reload(&self) -> StoreResult<()> {
        match self {
            Backend::Memory(s) => s.reload(),
            Backend::Sqlite(s) => s.reload(),
        }
    }

    fn with_view<R, F>(&self, filter: &QueryFilter, f: F) -> StoreResult<R>
    where
        F: FnOnce(&dyn ViewSource) -> StoreResult<R>,
    {
        match self {
            Backend::Memory(s) => s.with_view(filter, f),
            Backend::Sqlite(s) => s.with_view(filter, f),
        }
    }
}
