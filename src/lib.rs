//! Filter-and-aggregate engine for sales line items.
//!
//! A [`SalesQueryEngine`](engine::query::SalesQueryEngine) runs a date range
//! plus category predicate against a record store and returns five views:
//! summary statistics, daily revenue, revenue by category, top products and
//! the matching rows. The in-memory columnar store and the SQLite store
//! return identical results for the same data.

pub mod engine;
pub mod logging;
pub mod shared;

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
