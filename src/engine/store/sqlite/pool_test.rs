use std::thread;
use std::time::{Duration, Instant};

use crate::engine::errors::StoreError;
use crate::engine::store::sqlite::import_records;
use crate::engine::store::sqlite::pool::ConnectionPool;
use crate::shared::config::PoolConfig;
use crate::test_helpers::fixtures::sample_records;
use tempfile::tempdir;

fn config(max_connections: usize, acquire_timeout_ms: u64) -> PoolConfig {
    PoolConfig {
        max_connections,
        acquire_timeout_ms,
        ..PoolConfig::default()
    }
}

#[test]
fn opens_every_connection_up_front() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.db");
    import_records(&path, "sales", &sample_records()).unwrap();

    let pool = ConnectionPool::open(&path, &config(3, 100)).unwrap();
    assert_eq!(pool.size(), 3);
    assert_eq!(pool.idle_count(), 3);
}

#[test]
fn missing_database_fails_to_open() {
    let dir = tempdir().unwrap();
    let result = ConnectionPool::open(&dir.path().join("absent.db"), &config(1, 100));
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[test]
fn connections_return_on_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.db");
    import_records(&path, "sales", &sample_records()).unwrap();
    let pool = ConnectionPool::open(&path, &config(2, 100)).unwrap();

    {
        let _a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert_eq!(pool.idle_count(), 0);
    }
    assert_eq!(pool.idle_count(), 2);
}

#[test]
fn exhausted_pool_times_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.db");
    import_records(&path, "sales", &sample_records()).unwrap();
    let pool = ConnectionPool::open(&path, &config(1, 50)).unwrap();

    let _held = pool.acquire().unwrap();
    let started = Instant::now();
    let err = pool.acquire().err().unwrap();
    assert!(matches!(err, StoreError::PoolExhausted(d) if d == Duration::from_millis(50)));
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn waiter_gets_released_connection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.db");
    import_records(&path, "sales", &sample_records()).unwrap();
    let pool = ConnectionPool::open(&path, &config(1, 2_000)).unwrap();

    thread::scope(|scope| {
        let held = pool.acquire().unwrap();
        let waiter = scope.spawn(|| {
            let conn = pool.acquire().unwrap();
            conn.query_row("SELECT COUNT(*) FROM sales", [], |row| row.get::<_, i64>(0))
                .unwrap()
        });
        thread::sleep(Duration::from_millis(20));
        drop(held);
        assert_eq!(waiter.join().unwrap(), 5);
    });
}
