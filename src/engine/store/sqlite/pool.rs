use parking_lot::{Condvar, Mutex};
use rusqlite::{Connection, OpenFlags};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::engine::errors::{StoreError, StoreResult};
use crate::engine::store::sqlite::schema::register_functions;
use crate::shared::config::PoolConfig;

/// Fixed-size pool of read-only SQLite connections.
///
/// All connections are opened up front, so a missing or unreadable
/// database fails at open time. `acquire` blocks until a connection is
/// returned or the configured timeout elapses.
pub struct ConnectionPool {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
    returned: Condvar,
    size: usize,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    pub fn open(path: &Path, config: &PoolConfig) -> StoreResult<Self> {
        let size = config.max_connections.max(1);
        let mut idle = Vec::with_capacity(size);
        for _ in 0..size {
            idle.push(open_connection(path, config.busy_timeout())?);
        }
        debug!(
            target: "sales::store",
            path = %path.display(),
            size,
            "SQLite connection pool opened"
        );
        Ok(Self {
            path: path.to_path_buf(),
            idle: Mutex::new(idle),
            returned: Condvar::new(),
            size,
            acquire_timeout: config.acquire_timeout(),
        })
    }

    pub fn acquire(&self) -> StoreResult<PooledConnection<'_>> {
        let deadline = Instant::now() + self.acquire_timeout;
        let mut idle = self.idle.lock();
        loop {
            if let Some(conn) = idle.pop() {
                return Ok(PooledConnection {
                    pool: self,
                    conn: Some(conn),
                });
            }
            if self.returned.wait_until(&mut idle, deadline).timed_out() && idle.is_empty() {
                warn!(
                    target: "sales::store",
                    path = %self.path.display(),
                    waited = ?self.acquire_timeout,
                    "SQLite connection pool exhausted"
                );
                return Err(StoreError::PoolExhausted(self.acquire_timeout));
            }
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, conn: Connection) {
        self.idle.lock().push(conn);
        self.returned.notify_one();
    }
}

fn open_connection(path: &Path, busy_timeout: Duration) -> StoreResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(path, flags)?;
    conn.busy_timeout(busy_timeout)?;
    register_functions(&conn)?;
    Ok(conn)
}

/// A connection on loan from a [`ConnectionPool`]; goes back on drop.
pub struct PooledConnection<'a> {
    pool: &'a ConnectionPool,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only taken in Drop.
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
