use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::engine::errors::{StoreError, StoreResult};
use crate::engine::store::memory::columnar::ColumnarTable;
use crate::engine::types::SalesRecord;
use crate::shared::money::Money;
use crate::shared::time::DateParser;

const DEFAULT_BATCH_SIZE: usize = 8192;

/// Fact table columns as they appear in the CSV header.
pub const ORDER_ID: &str = "order_id";
pub const ORDER_DATE: &str = "order_date";
pub const CUSTOMER_ID: &str = "customer_id";
pub const CUSTOMER_NAME: &str = "customer_name";
pub const PRODUCT_ID: &str = "product_id";
pub const PRODUCT_NAMES: &str = "product_names";
pub const CATEGORIES: &str = "categories";
pub const QUANTITY: &str = "quantity";
pub const PRICE: &str = "price";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    ORDER_ID,
    ORDER_DATE,
    CUSTOMER_ID,
    CUSTOMER_NAME,
    PRODUCT_ID,
    PRODUCT_NAMES,
    CATEGORIES,
    QUANTITY,
    PRICE,
];

fn column_type(name: &str) -> DataType {
    match name {
        ORDER_ID | CUSTOMER_ID | PRODUCT_ID | QUANTITY => DataType::Int64,
        PRICE => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Reads a CSV fact table into a [`ColumnarTable`] through arrow's CSV decoder.
///
/// Only the header is inferred; column types are fixed by name and any
/// column outside [`REQUIRED_COLUMNS`] (such as `total`) is projected away.
pub struct CsvLoader {
    batch_size: usize,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl CsvLoader {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn load(path: &Path) -> StoreResult<ColumnarTable> {
        let file = File::open(path)?;
        let table = Self::default().read(file)?;
        info!(
            target: "sales::store",
            rows = table.len(),
            path = %path.display(),
            "Loaded CSV fact table"
        );
        Ok(table)
    }

    pub fn read<R: Read + Seek>(&self, mut reader: R) -> StoreResult<ColumnarTable> {
        let format = Format::default().with_header(true);
        let (header, _) = format.clone().infer_schema(&mut reader, Some(1))?;
        reader.rewind()?;

        let fields: Vec<Field> = header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), column_type(f.name()), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let mut projection = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| StoreError::MissingColumn(name.to_string()))?;
            projection.push(idx);
        }

        let csv = ReaderBuilder::new(schema)
            .with_format(format)
            .with_batch_size(self.batch_size)
            .with_projection(projection)
            .build(reader)?;

        let mut table = ColumnarTable::default();
        let mut rows_seen = 0usize;
        for batch in csv {
            let batch = batch?;
            debug!(target: "sales::store", rows = batch.num_rows(), "Decoded CSV batch");
            append_batch(&mut table, &batch, rows_seen)?;
            rows_seen += batch.num_rows();
        }
        Ok(table)
    }
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> StoreResult<&'a Int64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> StoreResult<&'a Float64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
}

fn str_column<'a>(batch: &'a RecordBatch, name: &str) -> StoreResult<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
}

fn required_int(col: &Int64Array, i: usize, row: usize, name: &str) -> StoreResult<i64> {
    if col.is_null(i) {
        return Err(StoreError::MalformedRecord {
            row,
            reason: format!("missing {name}"),
        });
    }
    Ok(col.value(i))
}

// Empty text fields decode as null; labels treat them as empty strings.
fn text(col: &StringArray, i: usize) -> String {
    if col.is_null(i) {
        String::new()
    } else {
        col.value(i).to_string()
    }
}

fn append_batch(table: &mut ColumnarTable, batch: &RecordBatch, offset: usize) -> StoreResult<()> {
    let order_id = int_column(batch, ORDER_ID)?;
    let order_date = str_column(batch, ORDER_DATE)?;
    let customer_id = int_column(batch, CUSTOMER_ID)?;
    let customer_name = str_column(batch, CUSTOMER_NAME)?;
    let product_id = int_column(batch, PRODUCT_ID)?;
    let product_name = str_column(batch, PRODUCT_NAMES)?;
    let category = str_column(batch, CATEGORIES)?;
    let quantity = int_column(batch, QUANTITY)?;
    let price = float_column(batch, PRICE)?;

    for i in 0..batch.num_rows() {
        let row = offset + i + 1;
        let raw_date = if order_date.is_null(i) {
            ""
        } else {
            order_date.value(i)
        };
        let date =
            DateParser::parse_order_date(raw_date).ok_or_else(|| StoreError::MalformedRecord {
                row,
                reason: format!("invalid order_date '{raw_date}'"),
            })?;
        if price.is_null(i) {
            return Err(StoreError::MalformedRecord {
                row,
                reason: format!("missing {PRICE}"),
            });
        }
        let unit_price = price.value(i);
        let price_cents =
            Money::from_price(unit_price).ok_or_else(|| StoreError::MalformedRecord {
                row,
                reason: format!("{PRICE} {unit_price} is not a non-negative amount in whole cents"),
            })?;

        table.push(SalesRecord {
            order_id: required_int(order_id, i, row, ORDER_ID)?,
            order_date: date,
            customer_id: required_int(customer_id, i, row, CUSTOMER_ID)?,
            customer_name: text(customer_name, i),
            product_id: required_int(product_id, i, row, PRODUCT_ID)?,
            product_name: text(product_name, i),
            category: text(category, i),
            quantity: required_int(quantity, i, row, QUANTITY)?,
            price: price_cents,
        });
    }
    Ok(())
}
