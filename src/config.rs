// Runtime configuration: data directory, bind address, import timeout, soft gate

use crate::error::{DirectoryError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "VENDOR_DIR_DATA_DIR";
pub const ENV_BIND_ADDR: &str = "VENDOR_DIR_BIND_ADDR";
pub const ENV_FETCH_TIMEOUT: &str = "VENDOR_DIR_FETCH_TIMEOUT_SECS";
pub const ENV_FREE_RESULTS: &str = "VENDOR_DIR_FREE_RESULTS";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;

/// Results shown to anonymous callers before the sign-up prompt
pub const DEFAULT_FREE_RESULTS: usize = 3;

/// Where the record stores live. Handed to `RecordStore::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_DATA_DIR)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub bind_addr: String,
    pub fetch_timeout: Duration,
    pub free_results: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store: StoreConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            free_results: DEFAULT_FREE_RESULTS,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(dir) = non_empty(lookup(ENV_DATA_DIR)) {
            config.store = StoreConfig::new(dir);
        }
        if let Some(addr) = non_empty(lookup(ENV_BIND_ADDR)) {
            config.bind_addr = addr;
        }
        if let Some(raw) = non_empty(lookup(ENV_FETCH_TIMEOUT)) {
            let secs = parse_number::<u64>(ENV_FETCH_TIMEOUT, &raw)?;
            if secs == 0 {
                return Err(DirectoryError::Config(format!(
                    "{} must be greater than zero",
                    ENV_FETCH_TIMEOUT
                )));
            }
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = non_empty(lookup(ENV_FREE_RESULTS)) {
            config.free_results = parse_number::<usize>(ENV_FREE_RESULTS, &raw)?;
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.store = StoreConfig::new(data_dir);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        DirectoryError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))
    })
}
