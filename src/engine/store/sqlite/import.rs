use rusqlite::{Connection, params};
use std::path::Path;
use tracing::info;

use crate::engine::errors::StoreResult;
use crate::engine::store::memory::CsvLoader;
use crate::engine::store::sqlite::schema::FactTable;
use crate::engine::types::SalesRecord;

/// Creates `table` in the database at `path` if needed and appends
/// `records` in a single transaction. Returns the number of rows written.
pub fn import_records(path: &Path, table: &str, records: &[SalesRecord]) -> StoreResult<usize> {
    let table = FactTable::new(table)?;
    let mut conn = Connection::open(path)?;
    conn.execute(&table.create_sql(), [])?;
    conn.execute(&table.index_sql(), [])?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&table.insert_sql())?;
        for record in records {
            stmt.execute(params![
                record.order_id,
                record.order_date.format("%Y-%m-%d").to_string(),
                record.customer_id,
                record.customer_name,
                record.product_id,
                record.product_name,
                record.category,
                record.quantity,
                record.price.as_units(),
            ])?;
        }
    }
    tx.commit()?;

    info!(
        target: "sales::store",
        path = %path.display(),
        table = table.name(),
        rows = records.len(),
        "Imported records into SQLite"
    );
    Ok(records.len())
}

/// Loads a CSV fact table and imports it with [`import_records`].
pub fn import_csv(csv_path: &Path, db_path: &Path, table: &str) -> StoreResult<usize> {
    let records = CsvLoader::load(csv_path)?.records();
    import_records(db_path, table, &records)
}
