pub mod import;
pub mod pool;
pub mod schema;
pub mod sqlite_store;
pub mod sqlite_view;

pub use import::{import_csv, import_records};
pub use pool::{ConnectionPool, PooledConnection};
pub use schema::{FactTable, register_functions};
pub use sqlite_store::SqliteStore;
pub use sqlite_view::SqliteView;

#[cfg(test)]
mod pool_test;
