//! Configuration management for Scout services.
//!
//! All Scout services share a configuration file at `~/.scout/config.json`.
//! Every field is optional; missing fields fall back to defaults.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (SCOUT_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `SCOUT_LOG_LEVEL` → observability.log_level
//! - `SCOUT_LOG_FORMAT` → observability.log_format
//! - `SCOUT_DATA_DIR` → screener.data_dir
//! - `SCOUT_LOOKBACK_DAYS` → screener.lookback_days

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".scout"),
        |dirs| dirs.home_dir().join(".scout"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Resolve a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => directories::UserDirs::new()
            .map_or_else(|| path.to_path_buf(), |dirs| dirs.home_dir().join(rest)),
        Err(_) => path.to_path_buf(),
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets forced to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Screener Settings
// ============================================================================

/// One configured asset: ticker symbol and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub ticker: String,
    pub name: String,
}

impl UniverseEntry {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Report format (markdown, json, table)
    #[serde(default)]
    pub format: Option<String>,

    /// Maximum rows rendered in tabular formats
    #[serde(default)]
    pub max_rows: Option<usize>,
}

/// Raw screener settings as they appear in the config file.
///
/// Absent values are resolved to defaults by the screener service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenerSettings {
    /// Ordered asset universe. `None` selects the built-in universe;
    /// an explicit empty list screens nothing.
    #[serde(default)]
    pub universe: Option<Vec<UniverseEntry>>,

    /// Lookback window in calendar days
    #[serde(default)]
    pub lookback_days: Option<u32>,

    /// Per-asset fetch timeout in seconds
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Number of assets processed concurrently
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Directory holding local market data snapshots
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub output: OutputSettings,
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration shared by Scout services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub screener: ScreenerSettings,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SCOUT_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("SCOUT_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(dir) = lookup("SCOUT_DATA_DIR") {
            self.screener.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(days) = lookup("SCOUT_LOOKBACK_DAYS") {
            match days.parse() {
                Ok(days) => self.screener.lookback_days = Some(days),
                Err(_) => tracing::warn!(value = %days, "Ignoring invalid SCOUT_LOOKBACK_DAYS"),
            }
        }
    }
}
