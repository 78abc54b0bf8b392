pub mod aggregator;
pub mod ops;
pub mod ranking;

pub use aggregator::{Aggregator, TOP_PRODUCTS_LIMIT};
pub use ops::{DistinctOrders, GroupedRevenue, RevenueSum};
pub use ranking::{RecordComparator, rank_by_revenue, sort_records};

#[cfg(test)]
mod ops_test;
