use lru::LruCache;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::engine::errors::StoreResult;
use crate::engine::store::memory::columnar::ColumnarTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

/// Identity of a data source: canonical path plus the file's size and
/// modification time, so a rewritten file never hits a stale entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl DatasetKey {
    pub fn for_path(path: &Path) -> io::Result<Self> {
        let path = fs::canonicalize(path)?;
        let meta = fs::metadata(&path)?;
        Ok(Self {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// Memo of loaded fact tables, shared by every memory store of a process.
/// Query results are never cached.
#[derive(Debug)]
pub struct DatasetCache {
    inner: Mutex<LruCache<DatasetKey, Arc<ColumnarTable>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl DatasetCache {
    pub fn new(capacity: usize) -> Self {
        let cap_nz = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap_nz)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Returns the cached table for `path`, loading it with `loader` on a miss.
    ///
    /// The loader runs without the lock held. Older entries for the same
    /// path (different size or mtime) are dropped when the new one lands.
    pub fn get_or_load<F>(
        &self,
        path: &Path,
        loader: F,
    ) -> StoreResult<(Arc<ColumnarTable>, CacheOutcome)>
    where
        F: FnOnce(&Path) -> StoreResult<ColumnarTable>,
    {
        let key = DatasetKey::for_path(path)?;
        if let Some(table) = self.inner.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(target: "sales::cache", path = %key.path.display(), "Dataset cache hit");
            return Ok((Arc::clone(table), CacheOutcome::Hit));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let table = Arc::new(loader(&key.path)?);

        let mut inner = self.inner.lock();
        let stale: Vec<DatasetKey> = inner
            .iter()
            .filter(|(k, _)| k.path == key.path && **k != key)
            .map(|(k, _)| k.clone())
            .collect();
        for k in stale {
            inner.pop(&k);
        }
        if let Some((evicted, _)) = inner.push(key.clone(), Arc::clone(&table)) {
            if evicted != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(target: "sales::cache", path = %evicted.path.display(), "Dataset evicted");
            }
        }
        info!(
            target: "sales::cache",
            path = %key.path.display(),
            rows = table.len(),
            "Dataset cached"
        );
        Ok((table, CacheOutcome::Miss))
    }

    /// Drops every entry loaded from `path`. Returns how many were removed.
    pub fn invalidate(&self, path: &Path) -> usize {
        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut inner = self.inner.lock();
        let keys: Vec<DatasetKey> = inner
            .iter()
            .filter(|(k, _)| k.path == target)
            .map(|(k, _)| k.clone())
            .collect();
        for k in &keys {
            inner.pop(k);
        }
        if !keys.is_empty() {
            self.invalidations
                .fetch_add(keys.len() as u64, Ordering::Relaxed);
        }
        keys.len()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.len() as u64;
        inner.clear();
        self.invalidations.fetch_add(dropped, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> DatasetCacheStats {
        let inner = self.inner.lock();
        DatasetCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: inner.len(),
            capacity: inner.cap().get(),
        }
    }
}
