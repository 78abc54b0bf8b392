use rusqlite::Connection;
use rusqlite::functions::{Aggregate, Context, FunctionFlags};
use rusqlite::types::ValueRef;

use crate::engine::errors::{StoreError, StoreResult};
use crate::shared::category::canonicalize;
use crate::shared::money::Money;

/// Scalar SQL function applying the category canonicalization rule.
pub const CANONICAL_CATEGORY_FN: &str = "canonical_category";
/// Scalar SQL function converting a stored price to cents, NULL when invalid.
pub const PRICE_CENTS_FN: &str = "price_cents";
/// Scalar SQL function computing `price_cents * quantity`, failing on overflow.
pub const LINE_REVENUE_FN: &str = "line_revenue";
/// Aggregate summing line revenues in 128 bits, failing when the total leaves `i64`.
pub const REVENUE_TOTAL_FN: &str = "revenue_total";
/// Error text raised by [`LINE_REVENUE_FN`] and [`REVENUE_TOTAL_FN`] on overflow.
pub const REVENUE_OVERFLOW: &str = "revenue overflows 64-bit cents";

/// A validated fact table name and the SQL built around it.
///
/// Every read goes through the `facts` CTE, which normalizes the stored
/// columns the same way the CSV loader does: integer cents, ISO date text
/// and canonical category labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactTable {
    name: String,
}

impl FactTable {
    pub fn new(name: &str) -> StoreResult<Self> {
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(StoreError::InvalidTableName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facts_cte(&self) -> String {
        format!(
            "WITH facts AS (\
             SELECT CAST(order_id AS INTEGER) AS order_id, \
             date(order_date) AS order_date, \
             CAST(customer_id AS INTEGER) AS customer_id, \
             COALESCE(customer_name, '') AS customer_name, \
             CAST(product_id AS INTEGER) AS product_id, \
             COALESCE(product_names, '') AS product_name, \
             {CANONICAL_CATEGORY_FN}(COALESCE(categories, '')) AS category, \
             CAST(quantity AS INTEGER) AS quantity, \
             {PRICE_CENTS_FN}(price) AS price_cents \
             FROM \"{}\")",
            self.name
        )
    }

    /// First row (1-based, storage order) the `facts` CTE cannot normalize,
    /// with the reason.
    /// Summed line revenue of the `facts` rows in scope.
    pub fn revenue_total_sql() -> String {
        format!("{REVENUE_TOTAL_FN}({LINE_REVENUE_FN}(price_cents, quantity))")
    }

    pub fn malformed_row_sql(&self) -> String {
        format!(
            "{} SELECT line, CASE \
             WHEN order_id IS NULL THEN 'missing order_id' \
             WHEN order_date IS NULL THEN 'invalid order_date' \
             WHEN customer_id IS NULL THEN 'missing customer_id' \
             WHEN product_id IS NULL THEN 'missing product_id' \
             WHEN quantity IS NULL THEN 'missing quantity' \
             ELSE 'price is not a non-negative amount in whole cents' END \
             FROM (SELECT ROW_NUMBER() OVER () AS line, order_id, order_date, customer_id, \
             product_id, quantity, price_cents FROM facts) \
             WHERE order_id IS NULL OR order_date IS NULL OR customer_id IS NULL \
             OR product_id IS NULL OR quantity IS NULL OR price_cents IS NULL \
             LIMIT 1",
            self.facts_cte()
        )
    }

    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
             order_id INTEGER NOT NULL, \
             order_date TEXT NOT NULL, \
             customer_id INTEGER NOT NULL, \
             customer_name TEXT NOT NULL, \
             product_id INTEGER NOT NULL, \
             product_names TEXT NOT NULL, \
             categories TEXT NOT NULL, \
             quantity INTEGER NOT NULL, \
             price REAL NOT NULL)",
            self.name
        )
    }

    pub fn index_sql(&self) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS \"{0}_order_date\" ON \"{0}\" (order_date)",
            self.name
        )
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO \"{}\" (order_id, order_date, customer_id, customer_name, \
             product_id, product_names, categories, quantity, price) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            self.name
        )
    }
}

/// Stored price to cents with the same rule the CSV loader applies.
pub fn stored_price_cents(value: ValueRef<'_>) -> Option<i64> {
    let price = match value {
        ValueRef::Integer(units) => return units.checked_mul(100).filter(|c| *c >= 0),
        ValueRef::Real(units) => units,
        ValueRef::Text(text) => std::str::from_utf8(text).ok()?.trim().parse().ok()?,
        ValueRef::Null | ValueRef::Blob(_) => return None,
    };
    Money::from_price(price).map(Money::cents)
}

fn overflow() -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(REVENUE_OVERFLOW.into())
}

/// `revenue_total(revenue)`: NULL inputs are skipped and an empty group sums to 0.
struct RevenueTotal;

impl Aggregate<i128, i64> for RevenueTotal {
    fn init(&self, _: &mut Context<'_>) -> rusqlite::Result<i128> {
        Ok(0)
    }

    fn step(&self, ctx: &mut Context<'_>, total: &mut i128) -> rusqlite::Result<()> {
        if let Some(revenue) = ctx.get::<Option<i64>>(0)? {
            *total += i128::from(revenue);
        }
        Ok(())
    }

    fn finalize(&self, _: &mut Context<'_>, total: Option<i128>) -> rusqlite::Result<i64> {
        i64::try_from(total.unwrap_or(0)).map_err(|_| overflow())
    }
}

/// Registers the SQL functions the `facts` CTE and the views rely on.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    conn.create_scalar_function(CANONICAL_CATEGORY_FN, 1, flags, |ctx| {
        let raw: Option<String> = ctx.get(0)?;
        Ok(canonicalize(raw.as_deref().unwrap_or("")))
    })?;
    conn.create_scalar_function(PRICE_CENTS_FN, 1, flags, |ctx| {
        Ok(stored_price_cents(ctx.get_raw(0)))
    })?;
    conn.create_scalar_function(LINE_REVENUE_FN, 2, flags, |ctx| {
        let price: Option<i64> = ctx.get(0)?;
        let quantity: Option<i64> = ctx.get(1)?;
        match (price, quantity) {
            (Some(price), Some(quantity)) => {
                price.checked_mul(quantity).map(Some).ok_or_else(overflow)
            }
            _ => Ok(None),
        }
    })?;
    conn.create_aggregate_function(REVENUE_TOTAL_FN, 1, flags, RevenueTotal)
}
