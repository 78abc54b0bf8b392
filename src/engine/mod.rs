pub mod cache;
pub mod errors;
pub mod query;
pub mod store;
pub mod types;

pub use errors::*;
