use ahash::RandomState as AHashRandomState;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::engine::types::SalesRecord;
use crate::shared::category::canonicalize;
use crate::shared::money::Money;

/// Interned string column values addressed by a dense `u32` code.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    values: Vec<String>,
    codes: HashMap<String, u32, AHashRandomState>,
}

impl Dictionary {
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&code) = self.codes.get(value) {
            return code;
        }
        let code = self.values.len() as u32;
        self.values.push(value.to_string());
        self.codes.insert(value.to_string(), code);
        code
    }

    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    pub fn value(&self, code: u32) -> &str {
        &self.values[code as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Immutable in-memory fact table, one vector per column.
///
/// Category and product labels are dictionary encoded so grouping and
/// category matching compare integer codes. Categories are canonicalized
/// on the way in.
#[derive(Debug, Default, Clone)]
pub struct ColumnarTable {
    order_id: Vec<i64>,
    order_date: Vec<NaiveDate>,
    customer_id: Vec<i64>,
    customer_name: Vec<String>,
    product_id: Vec<i64>,
    product_name: Vec<u32>,
    category: Vec<u32>,
    quantity: Vec<i64>,
    price: Vec<Money>,
    products: Dictionary,
    categories: Dictionary,
}

impl ColumnarTable {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            order_id: Vec::with_capacity(rows),
            order_date: Vec::with_capacity(rows),
            customer_id: Vec::with_capacity(rows),
            customer_name: Vec::with_capacity(rows),
            product_id: Vec::with_capacity(rows),
            product_name: Vec::with_capacity(rows),
            category: Vec::with_capacity(rows),
            quantity: Vec::with_capacity(rows),
            price: Vec::with_capacity(rows),
            ..Self::default()
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        let records = records.into_iter();
        let mut table = Self::with_capacity(records.size_hint().0);
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: SalesRecord) {
        let product = self.products.intern(&record.product_name);
        let category = self.categories.intern(&canonicalize(&record.category));
        self.order_id.push(record.order_id);
        self.order_date.push(record.order_date);
        self.customer_id.push(record.customer_id);
        self.customer_name.push(record.customer_name);
        self.product_id.push(record.product_id);
        self.product_name.push(product);
        self.category.push(category);
        self.quantity.push(record.quantity);
        self.price.push(record.price);
    }

    pub fn len(&self) -> usize {
        self.order_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_id.is_empty()
    }

    pub fn record(&self, row: usize) -> SalesRecord {
        SalesRecord {
            order_id: self.order_id[row],
            order_date: self.order_date[row],
            customer_id: self.customer_id[row],
            customer_name: self.customer_name[row].clone(),
            product_id: self.product_id[row],
            product_name: self.products.value(self.product_name[row]).to_string(),
            category: self.categories.value(self.category[row]).to_string(),
            quantity: self.quantity[row],
            price: self.price[row],
        }
    }

    pub fn records(&self) -> Vec<SalesRecord> {
        (0..self.len()).map(|row| self.record(row)).collect()
    }

    /// Line revenue of `row`, `None` when it overflows `i64` cents.
    pub fn revenue(&self, row: usize) -> Option<Money> {
        self.price[row].checked_times(self.quantity[row])
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.order_date.iter().min()?;
        let max = self.order_date.iter().max()?;
        Some((*min, *max))
    }

    pub fn categories_sorted(&self) -> Vec<String> {
        let mut labels = self.categories.values().to_vec();
        labels.sort();
        labels
    }

    pub fn category_code(&self, label: &str) -> Option<u32> {
        self.categories.code_of(label)
    }

    pub fn order_ids(&self) -> &[i64] {
        &self.order_id
    }

    pub fn order_dates(&self) -> &[NaiveDate] {
        &self.order_date
    }

    pub fn category_codes(&self) -> &[u32] {
        &self.category
    }

    pub fn product_codes(&self) -> &[u32] {
        &self.product_name
    }

    pub fn categories(&self) -> &Dictionary {
        &self.categories
    }

    pub fn products(&self) -> &Dictionary {
        &self.products
    }
}
