use std::sync::Arc;

use tempfile::tempdir;

use crate::engine::cache::{CacheOutcome, DatasetCache};
use crate::engine::errors::StoreError;
use crate::engine::store::memory::{ColumnarTable, CsvLoader};
use crate::test_helpers::fixtures::{sample_records, write_csv};

#[test]
fn second_load_is_a_hit() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "a.csv", &sample_records());
    let cache = DatasetCache::new(2);

    let (first, outcome) = cache.get_or_load(&path, CsvLoader::load).unwrap();
    assert_eq!(outcome, CacheOutcome::Miss);
    let (second, outcome) = cache
        .get_or_load(&path, |_| panic!("loader must not run on a hit"))
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Hit);
    assert!(Arc::ptr_eq(&first, &second));

    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[test]
fn rewritten_file_misses_and_replaces_stale_entry() {
    let dir = tempdir().unwrap();
    let records = sample_records();
    let path = write_csv(dir.path(), "a.csv", &records[..1]);
    let cache = DatasetCache::new(4);
    cache.get_or_load(&path, CsvLoader::load).unwrap();

    write_csv(dir.path(), "a.csv", &records);
    let (table, outcome) = cache.get_or_load(&path, CsvLoader::load).unwrap();
    assert_eq!(outcome, CacheOutcome::Miss);
    assert_eq!(table.len(), 5);
    assert_eq!(cache.len(), 1);
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let dir = tempdir().unwrap();
    let a = write_csv(dir.path(), "a.csv", &sample_records());
    let b = write_csv(dir.path(), "b.csv", &sample_records());
    let c = write_csv(dir.path(), "c.csv", &sample_records());
    let cache = DatasetCache::new(2);

    for path in [&a, &b, &a, &c] {
        cache.get_or_load(path, CsvLoader::load).unwrap();
    }
    let stats = cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.entries, 2);

    let (_, outcome) = cache.get_or_load(&a, CsvLoader::load).unwrap();
    assert_eq!(outcome, CacheOutcome::Hit);
    let (_, outcome) = cache.get_or_load(&b, CsvLoader::load).unwrap();
    assert_eq!(outcome, CacheOutcome::Miss);
}

#[test]
fn invalidate_and_clear_drop_entries() {
    let dir = tempdir().unwrap();
    let a = write_csv(dir.path(), "a.csv", &sample_records());
    let b = write_csv(dir.path(), "b.csv", &sample_records());
    let cache = DatasetCache::new(4);
    cache.get_or_load(&a, CsvLoader::load).unwrap();
    cache.get_or_load(&b, CsvLoader::load).unwrap();

    assert_eq!(cache.invalidate(&a), 1);
    assert_eq!(cache.invalidate(&a), 0);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().invalidations, 2);
}

#[test]
fn loader_errors_are_not_cached() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "a.csv", &sample_records());
    let cache = DatasetCache::new(2);

    let err = cache
        .get_or_load(&path, |_| {
            Err(StoreError::MissingColumn("order_id".into()))
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingColumn(_)));
    assert!(cache.is_empty());

    let (_, outcome) = cache
        .get_or_load(&path, |_| Ok(ColumnarTable::default()))
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Miss);
}

#[test]
fn zero_capacity_still_holds_one_entry() {
    assert_eq!(DatasetCache::new(0).stats().capacity, 1);
}
