use crate::engine::store::MemoryStore;
use crate::engine::store::sqlite::{FactTable, SqliteStore, import_records};
use crate::engine::types::SalesRecord;
use crate::shared::config::PoolConfig;
use crate::test_helpers::factory::Factory;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

pub const CSV_HEADER: &str =
    "order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price";

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Five line items over 2023-01-01..=2023-01-03: two categories, three products.
///
/// Totals: revenue 2175.00 over 5 orders; Electronics 1275.00, Furniture 900.00;
/// Laptop 1200.00, Desk 900.00, Mouse 75.00.
pub fn sample_records() -> Vec<SalesRecord> {
    vec![
        Factory::sales_record()
            .order(1)
            .date("2023-01-01")
            .customer(101, "Alice")
            .product(201, "Laptop")
            .category("Electronics")
            .quantity(1)
            .price_cents(120_000)
            .create(),
        Factory::sales_record()
            .order(2)
            .date("2023-01-01")
            .customer(102, "Bob")
            .product(202, "Mouse")
            .category("Electronics")
            .quantity(2)
            .price_cents(2_500)
            .create(),
        Factory::sales_record()
            .order(3)
            .date("2023-01-02")
            .customer(103, "Carol")
            .product(203, "Desk")
            .category("Furniture")
            .quantity(1)
            .price_cents(30_000)
            .create(),
        Factory::sales_record()
            .order(4)
            .date("2023-01-03")
            .customer(101, "Alice")
            .product(202, "Mouse")
            .category("Electronics")
            .quantity(1)
            .price_cents(2_500)
            .create(),
        Factory::sales_record()
            .order(5)
            .date("2023-01-03")
            .customer(104, "Dan")
            .product(203, "Desk")
            .category("Furniture")
            .quantity(2)
            .price_cents(30_000)
            .create(),
    ]
}

/// One order split into three line items, quantities 2, 3 and 4 at 10.00.
pub fn split_order_records() -> Vec<SalesRecord> {
    [2, 3, 4]
        .into_iter()
        .enumerate()
        .map(|(i, quantity)| {
            Factory::sales_record()
                .order(42)
                .date("2023-02-01")
                .product(300 + i as i64, &format!("Part {}", i + 1))
                .category("Hardware")
                .quantity(quantity)
                .price_cents(1_000)
                .create()
        })
        .collect()
}

/// Twelve products with distinct revenues, `Product 01` earning the least.
pub fn many_product_records() -> Vec<SalesRecord> {
    (1..=12)
        .map(|i| {
            Factory::sales_record()
                .order(i)
                .date("2023-03-01")
                .product(500 + i, &format!("Product {i:02}"))
                .category(if i % 2 == 0 { "Even" } else { "Odd" })
                .quantity(1)
                .price_cents(i * 1_000)
                .create()
        })
        .collect()
}

pub fn memory_store(records: Vec<SalesRecord>) -> MemoryStore {
    MemoryStore::from_records("memory:fixture", records)
}

/// SQLite store over a fresh temp database seeded with `records`.
/// Keep the `TempDir` alive for as long as the store is used.
pub fn sqlite_store(records: &[SalesRecord]) -> (TempDir, SqliteStore) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.db");
    import_records(&path, "sales", records).unwrap();
    let store = SqliteStore::open(&path, "sales", &PoolConfig::default()).unwrap();
    (dir, store)
}

/// Writes `(order_id, order_date, category, quantity, price)` rows straight
/// into the `sales` table, bypassing the importer.
pub fn write_sqlite_rows(path: &Path, rows: &[(i64, &str, &str, i64, f64)]) {
    let table = FactTable::new("sales").unwrap();
    let conn = Connection::open(path).unwrap();
    conn.execute(&table.create_sql(), []).unwrap();
    for (order_id, date, category, quantity, price) in rows {
        conn.execute(
            &table.insert_sql(),
            params![order_id, date, 1, "Ann", 10, "Lamp", category, quantity, price],
        )
        .unwrap();
    }
}

pub fn csv_line(record: &SalesRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}",
        record.order_id,
        record.order_date,
        record.customer_id,
        record.customer_name,
        record.product_id,
        record.product_name,
        record.category,
        record.quantity,
        record.price,
    )
}

pub fn write_csv(dir: &Path, name: &str, records: &[SalesRecord]) -> PathBuf {
    let mut body = String::from(CSV_HEADER);
    body.push('\n');
    for record in records {
        body.push_str(&csv_line(record));
        body.push('\n');
    }
    write_csv_text(dir, name, &body)
}

pub fn write_csv_text(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
