pub mod category;
pub mod config;
pub mod money;
pub mod time;

#[cfg(test)]
mod time_tests;
