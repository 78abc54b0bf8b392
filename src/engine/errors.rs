use std::io;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Failures raised by a record store while loading or scanning data.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV decode error: {0}")]
    Csv(#[from] arrow::error::ArrowError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Revenue overflows 64-bit cents")]
    RevenueOverflow,

    #[error("Connection pool exhausted after waiting {0:?}")]
    PoolExhausted(Duration),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to callers of the query engine.
///
/// Empty or reversed ranges and zero-order summaries are not errors; they
/// resolve to empty views and sentinel values.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Data unavailable from {store}: {source}")]
    DataUnavailable {
        store: String,
        #[source]
        source: StoreError,
    },
}

pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    pub fn data_unavailable(store: impl Into<String>, source: StoreError) -> Self {
        QueryError::DataUnavailable {
            store: store.into(),
            source,
        }
    }

    pub fn store_error(&self) -> &StoreError {
        match self {
            QueryError::DataUnavailable { source, .. } => source,
        }
    }

    pub fn log_error(&self) {
        match self {
            QueryError::DataUnavailable { store, source } => {
                error!("Data unavailable from {}: {}", store, source);
                debug!("Data unavailable error details: {:?}", source);
            }
        }
    }
}
