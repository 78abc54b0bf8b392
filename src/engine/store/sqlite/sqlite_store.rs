use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::engine::errors::{StoreError, StoreResult};
use crate::engine::query::filter::QueryFilter;
use crate::engine::store::sqlite::pool::ConnectionPool;
use crate::engine::store::sqlite::schema::FactTable;
use crate::engine::store::sqlite::sqlite_view::{SqliteView, read_record};
use crate::engine::store::{RecordStore, ViewSource};
use crate::engine::types::SalesRecord;
use crate::shared::config::PoolConfig;

/// Record store over a SQLite fact table.
///
/// Filters and grouping are pushed down into SQL; each `with_view` call
/// runs inside one read transaction so all views see the same snapshot.
/// Every read first checks that each stored row normalizes, so a bad date
/// or price fails the query with [`StoreError::MalformedRecord`] exactly as
/// the CSV loader would, instead of silently dropping out of the views.
pub struct SqliteStore {
    name: String,
    path: PathBuf,
    table: FactTable,
    pool: ConnectionPool,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>, table: &str, config: &PoolConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let table = FactTable::new(table)?;
        let pool = ConnectionPool::open(&path, config)?;
        let store = Self {
            name: format!("sqlite:{}", path.display()),
            path,
            table,
            pool,
        };
        let rows = store.row_count()?;
        store.ensure_well_formed(&*store.pool.acquire()?)?;
        info!(
            target: "sales::store",
            path = %store.path.display(),
            table = store.table.name(),
            rows,
            connections = store.pool.size(),
            "SQLite store opened"
        );
        Ok(store)
    }

    pub fn table(&self) -> &FactTable {
        &self.table
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn row_count(&self) -> StoreResult<u64> {
        let conn = self.pool.acquire()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn ensure_well_formed(&self, conn: &rusqlite::Connection) -> StoreResult<()> {
        let mut stmt = conn.prepare_cached(&self.table.malformed_row_sql())?;
        let found: Option<(i64, String)> = stmt
            .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;
        match found {
            Some((line, reason)) => Err(StoreError::MalformedRecord {
                row: line.max(0) as usize,
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> StoreResult<Vec<SalesRecord>> {
        let conn = self.pool.acquire()?;
        let sql = format!(
            "{} SELECT order_id, order_date, customer_id, customer_name, product_id, \
             product_name, category, quantity, price_cents FROM facts",
            self.table.facts_cte()
        );
        self.ensure_well_formed(&conn)?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], read_record)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(target: "sales::store", store = %self.name, rows = records.len(), "Loaded fact table");
        Ok(records)
    }

    fn date_range(&self) -> StoreResult<Option<(NaiveDate, NaiveDate)>> {
        let conn = self.pool.acquire()?;
        let sql = format!(
            "{} SELECT MIN(order_date), MAX(order_date) FROM facts",
            self.table.facts_cte()
        );
        self.ensure_well_formed(&conn)?;
        let (min, max): (Option<NaiveDate>, Option<NaiveDate>) =
            conn.query_row(&sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(min.zip(max))
    }

    fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        let conn = self.pool.acquire()?;
        let sql = format!(
            "{} SELECT DISTINCT category FROM facts ORDER BY category",
            self.table.facts_cte()
        );
        self.ensure_well_formed(&conn)?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Rows are read live, so reloading only checks the table is still readable.
    fn reload(&self) -> StoreResult<()> {
        let rows = self.row_count()?;
        self.ensure_well_formed(&*self.pool.acquire()?)?;
        info!(target: "sales::store", store = %self.name, rows, "SQLite store reloaded");
        Ok(())
    }

    fn with_view<R, F>(&self, filter: &QueryFilter, f: F) -> StoreResult<R>
    where
        F: FnOnce(&dyn ViewSource) -> StoreResult<R>,
    {
        let conn = self.pool.acquire()?;
        let tx = conn.unchecked_transaction()?;
        self.ensure_well_formed(&tx)?;
        let view = SqliteView::new(&tx, &self.table, filter);
        let result = f(&view)?;
        tx.commit()?;
        Ok(result)
    }
}
