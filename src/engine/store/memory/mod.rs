pub mod columnar;
pub mod csv_loader;
pub mod filtered_view;
pub mod memory_store;

pub use columnar::{ColumnarTable, Dictionary};
pub use csv_loader::CsvLoader;
pub use filtered_view::FilteredView;
pub use memory_store::MemoryStore;

#[cfg(test)]
mod csv_loader_test;
