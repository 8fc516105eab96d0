//! Configuration management for dispatchd.
//!
//! Loads settings from /etc/dispatch/config.toml or uses defaults.

use anyhow::{Context, Result};
use dispatch_shared::{DEFAULT_BIND_ADDR, STATE_DIR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/dispatch/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/dispatch/config.toml";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Allow any origin (station consoles served from elsewhere)
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum JSON body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_cors_permissive() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    15
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_permissive: default_cors_permissive(),
            request_timeout_secs: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Which document store backs the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database file (sqlite backend only)
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
}

fn default_sqlite_path() -> PathBuf {
    Path::new(STATE_DIR).join("dispatch.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

/// Notification bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Events buffered per subscriber before it starts lagging
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load config from file, or return defaults
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from an explicit path; missing or invalid files are errors
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config rendered as TOML (for `--print-default-config`)
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Config::default())?)
    }
}
