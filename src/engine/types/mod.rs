pub mod predicate;
pub mod sales_record;
pub mod views;

pub use predicate::{CategoryFilter, QueryPredicate};
pub use sales_record::SalesRecord;
pub use views::{
    CategoryRevenue, DailyRevenue, Dashboard, NO_TOP_CATEGORY, ProductRevenue, RevenueRow,
    SummaryStats,
};
