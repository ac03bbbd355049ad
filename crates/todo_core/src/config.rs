//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect the few knobs a host needs: log level/dir, database path and
//!   cache revalidation.
//! - Resolve values from the process environment with safe defaults.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Invalid values are rejected, never silently replaced.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "TODO_CORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TODO_CORE_LOG_DIR";
pub const ENV_DB_PATH: &str = "TODO_CORE_DB_PATH";
pub const ENV_REVALIDATE: &str = "TODO_CORE_REVALIDATE";

const DEFAULT_DB_FILE_NAME: &str = "todo_core.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "todo_core_logs";

/// Configuration resolution error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidBool { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(level) => write!(
                f,
                "`{ENV_LOG_LEVEL}` expects trace|debug|info|warn|error, got `{level}`"
            ),
            Self::InvalidBool { key, value } => {
                write!(f, "`{key}` expects true|false|1|0, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Host-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Serve the cache and then the remote payload for one request.
    pub revalidate_cache: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            log_level: default_log_level().to_string(),
            log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
            db_path: temp.join(DEFAULT_DB_FILE_NAME),
            revalidate_cache: false,
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = read(ENV_LOG_LEVEL) {
            let normalized = normalize_level(&level)
                .ok_or_else(|| ConfigError::InvalidLogLevel(level.clone()))?;
            config.log_level = normalized.to_string();
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(flag) = read(ENV_REVALIDATE) {
            config.revalidate_cache = parse_bool(ENV_REVALIDATE, &flag)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
