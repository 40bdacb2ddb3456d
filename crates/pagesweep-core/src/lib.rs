//! pagesweep-core — configuration shared by every pagesweep crate.

pub mod config;
pub mod duration;
pub mod error;

pub use config::{
    AccountConfig, ApiConfig, LogConfig, LogFormat, ReconcilePolicy, RetentionConfig,
    StorageConfig, SweepConfig,
};
pub use duration::parse_duration;
pub use error::{ConfigError, ConfigResult};
