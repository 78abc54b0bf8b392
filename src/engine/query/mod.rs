pub mod aggregate;
pub mod filter;
pub mod query_engine;

pub use filter::QueryFilter;
pub use query_engine::SalesQueryEngine;
