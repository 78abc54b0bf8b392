use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// CSV fact table read by the memory backend
    pub csv_path: PathBuf,
    /// SQLite database read by the relational backend
    pub sqlite_path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "sales".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// How long `acquire` blocks before reporting the pool as exhausted
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    /// SQLite busy timeout applied to every pooled connection
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl PoolConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_max_connections() -> usize {
    4
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_busy_timeout_ms() -> u64 {
    2_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of loaded datasets kept by the dataset cache
    #[serde(default = "default_dataset_entries")]
    pub dataset_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dataset_entries: default_dataset_entries(),
        }
    }
}

fn default_dataset_entries() -> usize {
    4
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("SALES_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
