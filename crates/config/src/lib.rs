//! Configuration loading, validation, and management for feedmix.
//!
//! Loads configuration from `~/.feedmix/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.feedmix/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Feed assembly defaults and policies
    #[serde(default)]
    pub feed: FeedConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Feed metrics configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database file. Defaults to `~/.feedmix/content.sqlite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Which `ContentStore` implementation to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    InMemory,
    None,
}

fn default_max_connections() -> u32 {
    4
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

impl StoreConfig {
    /// The configured database path, or the default under the config dir.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("content.sqlite"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size used when a request does not carry one.
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Interleaving period used when a request does not carry one.
    #[serde(default = "default_sponsored_interval")]
    pub default_sponsored_interval: i64,

    #[serde(default)]
    pub fetch_mode: FetchMode,

    #[serde(default)]
    pub on_source_failure: SourceFailurePolicy,

    /// Whole-pipeline deadline in milliseconds. 0 disables it.
    #[serde(default)]
    pub deadline_ms: u64,
}

/// How the four candidate pools are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    #[default]
    Concurrent,
    Sequential,
}

/// What to do when one candidate fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFailurePolicy {
    /// Fail the whole feed.
    #[default]
    Fail,
    /// Treat the failed pool as empty and log it.
    Degrade,
}

fn default_limit() -> i64 {
    20
}
fn default_sponsored_interval() -> i64 {
    4
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_sponsored_interval: default_sponsored_interval(),
            fetch_mode: FetchMode::default(),
            on_source_failure: SourceFailurePolicy::default(),
            deadline_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8480
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Feed metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether metrics are recorded at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Where each feed's record goes besides the in-process aggregate
    #[serde(default)]
    pub sink: MetricsSink,

    /// Output file for the `jsonl` sink. Defaults to
    /// `~/.feedmix/feed-metrics.jsonl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonl_path: Option<PathBuf>,

    /// Recent records kept in memory for `/v1/metrics/recent`
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSink {
    #[default]
    Log,
    Jsonl,
    None,
}

fn default_true() -> bool {
    true
}
fn default_max_records() -> usize {
    1_000
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sink: MetricsSink::default(),
            jsonl_path: None,
            max_records: default_max_records(),
        }
    }
}

impl TelemetryConfig {
    pub fn resolved_jsonl_path(&self) -> PathBuf {
        self.jsonl_path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("feed-metrics.jsonl"))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.feedmix/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&Self::config_path())
    }

    /// Load from `path`, then apply environment overrides:
    /// - `FEEDMIX_STORE_BACKEND` (`sqlite`, `in_memory`, `none`)
    /// - `FEEDMIX_STORE_PATH`
    /// - `FEEDMIX_PORT`
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if let Ok(backend) = std::env::var("FEEDMIX_STORE_BACKEND") {
            config.store.backend = match backend.as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "in_memory" => StoreBackend::InMemory,
                "none" => StoreBackend::None,
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "FEEDMIX_STORE_BACKEND has unknown backend '{other}'"
                    )));
                }
            };
        }

        if let Ok(store_path) = std::env::var("FEEDMIX_STORE_PATH") {
            config.store.path = Some(PathBuf::from(store_path));
        }

        if let Ok(port) = std::env::var("FEEDMIX_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("FEEDMIX_PORT is not a port: '{port}'"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".feedmix")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.feed.default_limit) {
            return Err(ConfigError::ValidationError(
                "feed.default_limit must be between 1 and 100".into(),
            ));
        }

        if self.feed.default_sponsored_interval <= 0 {
            return Err(ConfigError::ValidationError(
                "feed.default_sponsored_interval must be > 0".into(),
            ));
        }

        if self.store.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "store.max_connections must be > 0".into(),
            ));
        }

        if self.telemetry.max_records == 0 {
            return Err(ConfigError::ValidationError(
                "telemetry.max_records must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
