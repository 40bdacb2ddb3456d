//! pagesweep.toml configuration parser.
//!
//! Every run-wide value the sweeper consumes (credentials, pagination,
//! throttle delay, dry-run, storage location, logging) lives in
//! [`SweepConfig`]. The struct is passed into the orchestrator at
//! construction; nothing reads process globals after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding `[account].api_token`.
pub const ENV_API_TOKEN: &str = "PAGESWEEP_API_TOKEN";

/// Environment variable overriding `[account].id`.
pub const ENV_ACCOUNT_ID: &str = "PAGESWEEP_ACCOUNT_ID";

/// Largest page size the remote API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the REST API, without a trailing slash.
    pub base_url: String,
    /// Account-scoped resource that owns the projects (e.g. `pages`).
    pub resource: String,
    pub page_size: u32,
    /// Pause after every remote call (e.g. "2s").
    pub delay: String,
    /// Per-request transport timeout (e.g. "30s").
    pub timeout: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudflare.com/client/v4".to_string(),
            resource: "pages".to_string(),
            page_size: 5,
            delay: "2s".to_string(),
            timeout: "30s".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetentionConfig {
    /// Report deletions without touching the remote or the snapshot.
    pub dry_run: bool,
    pub reconcile: ReconcilePolicy,
}

/// When the local snapshot row is removed after a remote delete attempt.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Remove the local row only once the remote confirmed the delete.
    #[default]
    Confirmed,
    /// Remove the local row after every attempt, whatever the remote said.
    Unconditional,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/pagesweep"),
        }
    }
}

impl StorageConfig {
    /// Path of the redb snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("snapshot.redb")
    }

    /// Path of the advisory lock guarding a run.
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join("pagesweep.lock")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Append log lines here instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl SweepConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply credential overrides from an environment lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// erase a token set in the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
            self.account.api_token = token;
        }
        if let Some(id) = lookup(ENV_ACCOUNT_ID).filter(|v| !v.is_empty()) {
            self.account.id = id;
        }
    }

    /// Check every value the sweeper depends on before any I/O happens.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.account.api_token.trim().is_empty() {
            return Err(ConfigError::Missing("account.api_token"));
        }
        if self.account.id.trim().is_empty() {
            return Err(ConfigError::Missing("account.id"));
        }
        if self.api.resource.trim().is_empty() {
            return Err(ConfigError::Missing("api.resource"));
        }
        if !(self.api.base_url.starts_with("https://") || self.api.base_url.starts_with("http://"))
        {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("expected an http(s) URL, got {:?}", self.api.base_url),
            });
        }
        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid {
                field: "api.page_size",
                reason: format!("must be within 1..={MAX_PAGE_SIZE}, got {}", self.api.page_size),
            });
        }
        self.api_delay()?;
        self.api_timeout()?;
        Ok(())
    }

    pub fn api_delay(&self) -> ConfigResult<Duration> {
        parse_duration(&self.api.delay).ok_or_else(|| ConfigError::Invalid {
            field: "api.delay",
            reason: format!("unparsable duration {:?}", self.api.delay),
        })
    }

    pub fn api_timeout(&self) -> ConfigResult<Duration> {
        parse_duration(&self.api.timeout).ok_or_else(|| ConfigError::Invalid {
            field: "api.timeout",
            reason: format!("unparsable duration {:?}", self.api.timeout),
        })
    }

    /// Example config written by `pagesweep init`.
    pub fn scaffold(account_id: &str) -> Self {
        SweepConfig {
            account: AccountConfig {
                id: account_id.to_string(),
                api_token: String::new(),
            },
            retention: RetentionConfig {
                dry_run: true,
                reconcile: ReconcilePolicy::Confirmed,
            },
            ..Default::default()
        }
    }
}
