use chrono::NaiveDate;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::engine::cache::{CacheOutcome, DatasetCache};
use crate::engine::errors::StoreResult;
use crate::engine::query::filter::QueryFilter;
use crate::engine::store::memory::columnar::ColumnarTable;
use crate::engine::store::memory::csv_loader::CsvLoader;
use crate::engine::store::{RecordStore, ViewSource};
use crate::engine::types::SalesRecord;

struct CsvSource {
    path: PathBuf,
    cache: Arc<DatasetCache>,
}

/// Record store backed by an in-memory columnar table.
///
/// Queries grab the current snapshot `Arc` once, so a concurrent
/// [`reload`](RecordStore::reload) never changes rows under a running query.
pub struct MemoryStore {
    name: String,
    source: Option<CsvSource>,
    snapshot: RwLock<Arc<ColumnarTable>>,
}

impl MemoryStore {
    /// Loads `path` through `cache`.
    pub fn open(path: impl AsRef<Path>, cache: Arc<DatasetCache>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (table, outcome) = cache.get_or_load(&path, CsvLoader::load)?;
        info!(
            target: "sales::store",
            path = %path.display(),
            rows = table.len(),
            cached = matches!(outcome, CacheOutcome::Hit),
            "Memory store opened"
        );
        Ok(Self {
            name: format!("memory:{}", path.display()),
            source: Some(CsvSource { path, cache }),
            snapshot: RwLock::new(table),
        })
    }

    /// Builds a store over records already in memory; `reload` keeps them.
    pub fn from_records<I>(name: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        Self {
            name: name.into(),
            source: None,
            snapshot: RwLock::new(Arc::new(ColumnarTable::from_records(records))),
        }
    }

    pub fn snapshot(&self) -> Arc<ColumnarTable> {
        Arc::clone(&self.snapshot.read())
    }
}

impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> StoreResult<Vec<SalesRecord>> {
        Ok(self.snapshot().records())
    }

    fn date_range(&self) -> StoreResult<Option<(NaiveDate, NaiveDate)>> {
        Ok(self.snapshot().date_range())
    }

    fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        Ok(self.snapshot().categories_sorted())
    }

    fn reload(&self) -> StoreResult<()> {
        let Some(source) = &self.source else {
            debug!(target: "sales::store", store = %self.name, "Nothing to reload");
            return Ok(());
        };
        source.cache.invalidate(&source.path);
        let (table, _) = source.cache.get_or_load(&source.path, CsvLoader::load)?;
        info!(
            target: "sales::store",
            store = %self.name,
            rows = table.len(),
            "Memory store reloaded"
        );
        *self.snapshot.write() = table;
        Ok(())
    }

    fn with_view<R, F>(&self, filter: &QueryFilter, f: F) -> StoreResult<R>
    where
        F: FnOnce(&dyn ViewSource) -> StoreResult<R>,
    {
        let table = self.snapshot();
        let view = filter.apply(&table);
        debug!(
            target: "sales::store",
            store = %self.name,
            scanned = table.len(),
            matched = view.len(),
            "Filtered columnar table"
        );
        f(&view)
    }
}
