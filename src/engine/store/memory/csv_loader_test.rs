use std::io::Cursor;

use indoc::indoc;
use tempfile::tempdir;

use crate::engine::errors::StoreError;
use crate::engine::store::memory::csv_loader::CsvLoader;
use crate::shared::money::Money;
use crate::test_helpers::fixtures::{sample_records, write_csv, ymd};

fn read(csv: &str) -> Result<crate::engine::store::memory::ColumnarTable, StoreError> {
    CsvLoader::default().read(Cursor::new(csv.as_bytes().to_vec()))
}

#[test]
fn loads_written_fixture() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "sales.csv", &sample_records());
    let table = CsvLoader::load(&path).unwrap();
    assert_eq!(table.records(), sample_records());
}

#[test]
fn ignores_extra_columns_and_column_order() {
    let table = read(indoc! {"
        total,price,quantity,categories,product_names,product_id,customer_name,customer_id,order_date,order_id
        40.0,20.00,2,electronics,Mouse,202,Bob,102,2023-01-05,9
    "})
    .unwrap();
    let record = table.record(0);
    assert_eq!(record.order_id, 9);
    assert_eq!(record.order_date, ymd(2023, 1, 5));
    assert_eq!(record.category, "Electronics");
    assert_eq!(record.price, Money::from_cents(2_000));
    assert_eq!(record.revenue(), Some(Money::from_cents(4_000)));
}

#[test]
fn drops_time_of_day() {
    let table = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02 09:15:00,1,Ann,5,Lamp,Home,1,9.99
    "})
    .unwrap();
    assert_eq!(table.record(0).order_date, ymd(2023, 1, 2));
    assert_eq!(table.record(0).price, Money::from_cents(999));
}

#[test]
fn empty_text_fields_become_empty_strings() {
    let table = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02,1,,5,Lamp,,1,9.99
    "})
    .unwrap();
    let record = table.record(0);
    assert_eq!(record.customer_name, "");
    assert_eq!(record.category, "");
}

#[test]
fn missing_column_is_reported() {
    let err = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,quantity,price
        1,2023-01-02,1,Ann,5,Lamp,1,9.99
    "})
    .unwrap_err();
    assert!(matches!(err, StoreError::MissingColumn(c) if c == "categories"));
}

#[test]
fn bad_date_reports_data_row() {
    let err = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02,1,Ann,5,Lamp,Home,1,9.99
        2,02/01/2023,1,Ann,5,Lamp,Home,1,9.99
    "})
    .unwrap_err();
    assert!(matches!(err, StoreError::MalformedRecord { row: 2, .. }));
}

#[test]
fn missing_price_is_malformed() {
    let err = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02,1,Ann,5,Lamp,Home,1,
    "})
    .unwrap_err();
    assert!(matches!(err, StoreError::MalformedRecord { row: 1, reason } if reason.contains("price")));
}

#[test]
fn row_numbers_continue_across_batches() {
    let mut csv = String::from(
        "order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price\n",
    );
    for i in 1..=4 {
        csv.push_str(&format!("{i},2023-01-0{i},1,Ann,5,Lamp,Home,1,1.00\n"));
    }
    csv.push_str("5,not-a-date,1,Ann,5,Lamp,Home,1,1.00\n");

    let err = CsvLoader::with_batch_size(2)
        .read(Cursor::new(csv.into_bytes()))
        .unwrap_err();
    assert!(matches!(err, StoreError::MalformedRecord { row: 5, .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = CsvLoader::load(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn sub_cent_and_negative_prices_are_rejected() {
    let err = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02,1,Ann,5,Lamp,Home,1,9.99
        2,2023-01-02,1,Ann,5,Lamp,Home,8,0.125
    "})
    .unwrap_err();
    assert!(
        matches!(&err, StoreError::MalformedRecord { row: 2, reason } if reason.contains("whole cents"))
    );

    let err = read(indoc! {"
        order_id,order_date,customer_id,customer_name,product_id,product_names,categories,quantity,price
        1,2023-01-02,1,Ann,5,Lamp,Home,1,-4.00
    "})
    .unwrap_err();
    assert!(matches!(err, StoreError::MalformedRecord { row: 1, .. }));
}
