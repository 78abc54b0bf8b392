pub mod dataset_cache;

pub use dataset_cache::{CacheOutcome, DatasetCache, DatasetCacheStats, DatasetKey};

#[cfg(test)]
mod dataset_cache_test;
