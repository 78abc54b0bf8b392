use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::engine::errors::{StoreError, StoreResult};
use crate::engine::query::filter::QueryFilter;
use crate::engine::store::sqlite::schema::{FactTable, REVENUE_OVERFLOW};
use crate::engine::store::{Totals, ViewSource};
use crate::engine::types::SalesRecord;
use crate::shared::money::Money;

/// Overflow raised inside a registered function surfaces as its message text.
fn classify(err: rusqlite::Error) -> StoreError {
    if err.to_string().contains(REVENUE_OVERFLOW) {
        StoreError::RevenueOverflow
    } else {
        StoreError::Database(err)
    }
}

/// Filtered view answered by grouped SQL over one open transaction.
pub struct SqliteView<'a> {
    conn: &'a Connection,
    table: &'a FactTable,
    where_clause: String,
    params: Vec<Value>,
}

impl<'a> SqliteView<'a> {
    pub fn new(conn: &'a Connection, table: &'a FactTable, filter: &QueryFilter) -> Self {
        let (where_clause, params) = where_clause(filter);
        Self {
            conn,
            table,
            where_clause,
            params,
        }
    }

    fn sql(&self, select: &str) -> String {
        format!("{} {} {}", self.table.facts_cte(), select, self.where_clause)
    }

    fn grouped<K, F>(&self, column: &str, read_key: F) -> StoreResult<Vec<(K, Money)>>
    where
        F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<K>,
    {
        let sql = format!(
            "{} GROUP BY {column}",
            self.sql(&format!(
                "SELECT {column}, {} FROM facts",
                FactTable::revenue_total_sql()
            ))
        );
        debug!(target: "sales::store", sql = %sql, "Grouped revenue query");
        let run = || -> rusqlite::Result<Vec<(K, Money)>> {
            let mut stmt = self.conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(self.params.iter()), |row| {
                Ok((read_key(row)?, Money::from_cents(row.get(1)?)))
            })?;
            rows.collect()
        };
        run().map_err(classify)
    }
}

/// `WHERE` clause and positional parameters for `filter`.
pub fn where_clause(filter: &QueryFilter) -> (String, Vec<Value>) {
    let Some((start, end)) = filter.date_range() else {
        return ("WHERE 0".to_string(), Vec::new());
    };
    let mut sql = String::from("WHERE order_date BETWEEN ?1 AND ?2");
    let mut params = vec![
        Value::Text(start.format("%Y-%m-%d").to_string()),
        Value::Text(end.format("%Y-%m-%d").to_string()),
    ];
    if let Some(category) = filter.category() {
        sql.push_str(" AND category = ?3");
        params.push(Value::Text(category.to_string()));
    }
    (sql, params)
}

impl ViewSource for SqliteView<'_> {
    fn totals(&self) -> StoreResult<Totals> {
        let sql = self.sql(&format!(
            "SELECT {}, COUNT(DISTINCT order_id) FROM facts",
            FactTable::revenue_total_sql()
        ));
        let (revenue, orders) = self
            .conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| {
                stmt.query_row(params_from_iter(self.params.iter()), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
                })
            })
            .map_err(classify)?;
        Ok(Totals {
            revenue: Money::from_cents(revenue),
            orders: orders.max(0) as u64,
        })
    }

    fn revenue_by_date(&self) -> StoreResult<Vec<(NaiveDate, Money)>> {
        self.grouped("order_date", |row| row.get::<_, NaiveDate>(0))
    }

    fn revenue_by_category(&self) -> StoreResult<Vec<(String, Money)>> {
        self.grouped("category", |row| row.get::<_, String>(0))
    }

    fn revenue_by_product(&self) -> StoreResult<Vec<(String, Money)>> {
        self.grouped("product_name", |row| row.get::<_, String>(0))
    }

    fn records(&self) -> StoreResult<Vec<SalesRecord>> {
        let sql = self.sql(
            "SELECT order_id, order_date, customer_id, customer_name, product_id, \
             product_name, category, quantity, price_cents FROM facts",
        );
        let run = || -> rusqlite::Result<Vec<SalesRecord>> {
            let mut stmt = self.conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(self.params.iter()), read_record)?;
            rows.collect()
        };
        run().map_err(classify)
    }
}

/// Maps a row of the `facts` projection used by `records` and `load`.
pub fn read_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<SalesRecord> {
    Ok(SalesRecord {
        order_id: row.get(0)?,
        order_date: row.get(1)?,
        customer_id: row.get(2)?,
        customer_name: row.get(3)?,
        product_id: row.get(4)?,
        product_name: row.get(5)?,
        category: row.get(6)?,
        quantity: row.get(7)?,
        price: Money::from_cents(row.get(8)?),
    })
}
