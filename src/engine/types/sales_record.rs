use chrono::NaiveDate;
use serde::Serialize;

use crate::shared::money::Money;

/// One line item of the fact table.
///
/// Several records may share an `order_id`; `category` is always held in
/// canonical form (see [`crate::shared::category::canonicalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRecord {
    pub order_id: i64,
    pub order_date: NaiveDate,
    pub customer_id: i64,
    pub customer_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub price: Money,
}

impl SalesRecord {
    /// `price * quantity`; never stored. `None` when it overflows `i64` cents.
    pub fn revenue(&self) -> Option<Money> {
        self.price.checked_times(self.quantity)
    }
}
