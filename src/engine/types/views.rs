use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::errors::StoreError;
use crate::engine::types::SalesRecord;
use crate::shared::money::Money;

/// `top_category` when no record matched.
pub const NO_TOP_CATEGORY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_revenue: Money,
    /// Distinct `order_id` count, not line items.
    pub total_orders: u64,
    /// Currency units; `0.0` when there are no orders.
    pub avg_order_value: f64,
    pub top_category: String,
}

impl SummaryStats {
    pub fn empty() -> Self {
        Self {
            total_revenue: Money::ZERO,
            total_orders: 0,
            avg_order_value: 0.0,
            top_category: NO_TOP_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: Money,
}

/// A matched record with its computed revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueRow {
    #[serde(flatten)]
    pub record: SalesRecord,
    pub revenue: Money,
}

impl TryFrom<SalesRecord> for RevenueRow {
    type Error = StoreError;

    fn try_from(record: SalesRecord) -> Result<Self, StoreError> {
        let revenue = record.revenue().ok_or(StoreError::RevenueOverflow)?;
        Ok(Self { record, revenue })
    }
}

/// All five views computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: SummaryStats,
    pub time_series: Vec<DailyRevenue>,
    pub category_breakdown: Vec<CategoryRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub raw_rows: Vec<RevenueRow>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.raw_rows.is_empty()
    }
}
