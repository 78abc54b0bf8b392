use tracing::debug;

use crate::engine::errors::StoreResult;
use crate::engine::query::aggregate::ranking::{rank_by_revenue, sort_records};
use crate::engine::store::ViewSource;
use crate::engine::types::{
    CategoryRevenue, DailyRevenue, Dashboard, NO_TOP_CATEGORY, ProductRevenue, RevenueRow,
    SummaryStats,
};

/// Most products a TopProducts view returns.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Turns the raw reductions of a [`ViewSource`] into the five views.
///
/// Both backends go through here, so ordering, truncation and sentinel
/// values are defined once.
pub struct Aggregator;

impl Aggregator {
    pub fn summary(view: &dyn ViewSource) -> StoreResult<SummaryStats> {
        let totals = view.totals()?;
        if totals.orders == 0 {
            return Ok(SummaryStats::empty());
        }
        let top_category = Self::category_breakdown(view)?
            .into_iter()
            .next()
            .map(|c| c.category)
            .unwrap_or_else(|| NO_TOP_CATEGORY.to_string());
        Ok(SummaryStats {
            total_revenue: totals.revenue,
            total_orders: totals.orders,
            avg_order_value: totals.revenue.per_order(totals.orders),
            top_category,
        })
    }

    pub fn time_series(view: &dyn ViewSource) -> StoreResult<Vec<DailyRevenue>> {
        let mut days = view.revenue_by_date()?;
        days.sort_by_key(|(date, _)| *date);
        Ok(days
            .into_iter()
            .map(|(date, revenue)| DailyRevenue { date, revenue })
            .collect())
    }

    pub fn category_breakdown(view: &dyn ViewSource) -> StoreResult<Vec<CategoryRevenue>> {
        let mut groups = view.revenue_by_category()?;
        rank_by_revenue(&mut groups);
        Ok(groups
            .into_iter()
            .map(|(category, revenue)| CategoryRevenue { category, revenue })
            .collect())
    }

    pub fn top_products(view: &dyn ViewSource) -> StoreResult<Vec<ProductRevenue>> {
        let mut groups = view.revenue_by_product()?;
        rank_by_revenue(&mut groups);
        groups.truncate(TOP_PRODUCTS_LIMIT);
        Ok(groups
            .into_iter()
            .map(|(product_name, revenue)| ProductRevenue {
                product_name,
                revenue,
            })
            .collect())
    }

    pub fn raw_rows(view: &dyn ViewSource) -> StoreResult<Vec<RevenueRow>> {
        let mut records = view.records()?;
        sort_records(&mut records);
        records.into_iter().map(RevenueRow::try_from).collect()
    }

    pub fn dashboard(view: &dyn ViewSource) -> StoreResult<Dashboard> {
        let dashboard = Dashboard {
            summary: Self::summary(view)?,
            time_series: Self::time_series(view)?,
            category_breakdown: Self::category_breakdown(view)?,
            top_products: Self::top_products(view)?,
            raw_rows: Self::raw_rows(view)?,
        };
        debug!(
            target: "sales::query",
            rows = dashboard.raw_rows.len(),
            days = dashboard.time_series.len(),
            categories = dashboard.category_breakdown.len(),
            "Dashboard aggregated"
        );
        Ok(dashboard)
    }
}
