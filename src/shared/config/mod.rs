pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{
    BackendKind, CacheConfig, LoggingConfig, PoolConfig, Settings, StoreConfig, load_settings,
    load_settings_from,
};
