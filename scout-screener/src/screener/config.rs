//! Screener configuration module.
//!
//! Resolves the raw settings from the shared config file into the concrete
//! configuration used by the screener engine.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use scout_common::config::{config_dir, expand_home, ScreenerSettings, UniverseEntry};
use scout_common::error::ResultExt;
use scout_common::{Error, Result};
use serde::{Deserialize, Serialize};

use super::report::ReportFormat;

/// Minimum number of daily points an asset needs before it is scored.
pub const MIN_HISTORY: usize = 200;

// ============================================================================
// Asset Universe
// ============================================================================

/// Ordered list of assets to screen.
///
/// Order matters: it is the tie-break order of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetUniverse(Vec<UniverseEntry>);

impl AssetUniverse {
    pub fn new(entries: Vec<UniverseEntry>) -> Self {
        Self(entries)
    }

    /// Build a universe from `(ticker, name)` pairs.
    pub fn from_pairs<I, T, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, N)>,
        T: Into<String>,
        N: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(ticker, name)| UniverseEntry::new(ticker, name))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[UniverseEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UniverseEntry> {
        self.0.iter()
    }

    /// Reject blank and duplicate tickers.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for (index, entry) in self.0.iter().enumerate() {
            let ticker = entry.ticker.trim();
            if ticker.is_empty() {
                return Err(Error::Config(format!(
                    "universe entry {} has an empty ticker",
                    index
                )));
            }
            if !seen.insert(ticker) {
                return Err(Error::Config(format!(
                    "duplicate ticker in universe: {}",
                    ticker
                )));
            }
        }
        Ok(())
    }
}

impl Default for AssetUniverse {
    /// Large-cap tech names, two major indices and gold.
    fn default() -> Self {
        Self::from_pairs([
            ("AAPL", "Apple"),
            ("MSFT", "Microsoft"),
            ("NVDA", "Nvidia"),
            ("AMZN", "Amazon"),
            ("META", "Meta"),
            ("^NDX", "NASDAQ 100"),
            ("^DJI", "Dow Jones"),
            ("GC=F", "Gold Futures"),
        ])
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output configuration for screener reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format
    #[serde(default = "default_format")]
    pub format: ReportFormat,

    /// Maximum rows rendered in markdown and table reports
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            max_rows: default_max_rows(),
        }
    }
}

fn default_format() -> ReportFormat {
    ReportFormat::Table
}

fn default_max_rows() -> usize {
    50
}

// ============================================================================
// Screener Configuration
// ============================================================================

/// Configuration for a screening run.
#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub universe: AssetUniverse,
    /// Price history window in calendar days
    pub lookback_days: u32,
    /// Upper bound for each provider call
    pub fetch_timeout: Duration,
    /// Assets processed concurrently; 1 is sequential
    pub max_concurrency: usize,
    /// Directory of local market data snapshots
    pub data_dir: PathBuf,
    pub output: OutputConfig,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            universe: AssetUniverse::default(),
            lookback_days: default_lookback_days(),
            fetch_timeout: Duration::from_secs(default_fetch_timeout_secs()),
            max_concurrency: default_max_concurrency(),
            data_dir: default_data_dir(),
            output: OutputConfig::default(),
        }
    }
}

fn default_lookback_days() -> u32 {
    365
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    1
}

fn default_data_dir() -> PathBuf {
    config_dir().join("data")
}

impl ScreenerConfig {
    /// Resolve file settings against defaults and validate the result.
    pub fn from_settings(settings: &ScreenerSettings) -> Result<Self> {
        let defaults = Self::default();

        let format = match settings.output.format.as_deref() {
            Some(raw) => raw
                .parse::<ReportFormat>()
                .map_err(Error::Config)
                .context("screener.output.format")?,
            None => defaults.output.format,
        };

        let config = Self {
            universe: settings
                .universe
                .clone()
                .map(AssetUniverse::new)
                .unwrap_or(defaults.universe),
            lookback_days: settings.lookback_days.unwrap_or(defaults.lookback_days),
            fetch_timeout: settings
                .fetch_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            max_concurrency: settings.max_concurrency.unwrap_or(defaults.max_concurrency),
            data_dir: settings
                .data_dir
                .as_deref()
                .map(expand_home)
                .unwrap_or(defaults.data_dir),
            output: OutputConfig {
                format,
                max_rows: settings.output.max_rows.unwrap_or(defaults.output.max_rows),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.universe.validate()?;
        if self.lookback_days == 0 {
            return Err(Error::Config("lookback_days must be greater than 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(Error::Config("max_concurrency must be greater than 0".into()));
        }
        if self.fetch_timeout.is_zero() {
            return Err(Error::Config("fetch_timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn with_universe(mut self, universe: AssetUniverse) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// One-line description for logs and reports.
    pub fn summary(&self) -> String {
        format!(
            "{} assets, {}d lookback, min {} points",
            self.universe.len(),
            self.lookback_days,
            MIN_HISTORY
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::OutputSettings;

    #[test]
    fn test_default_config() {
        let config = ScreenerConfig::default();
        assert_eq!(config.universe.len(), 8);
        assert_eq!(config.universe.entries()[0].ticker, "AAPL");
        assert_eq!(config.universe.entries()[7].ticker, "GC=F");
        assert_eq!(config.lookback_days, 365);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.output.format, ReportFormat::Table);
        assert_eq!(config.output.max_rows, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_empty_settings_uses_defaults() {
        let config = ScreenerConfig::from_settings(&ScreenerSettings::default()).unwrap();
        assert_eq!(config.universe, AssetUniverse::default());
        assert_eq!(config.lookback_days, 365);
    }

    #[test]
    fn test_from_settings_overrides() {
        let settings = ScreenerSettings {
            universe: Some(vec![UniverseEntry::new("SPY", "S&P 500")]),
            lookback_days: Some(400),
            fetch_timeout_secs: Some(5),
            max_concurrency: Some(4),
            data_dir: Some(PathBuf::from("/tmp/scout")),
            output: OutputSettings {
                format: Some("json".into()),
                max_rows: Some(10),
            },
        };

        let config = ScreenerConfig::from_settings(&settings).unwrap();
        assert_eq!(config.universe.len(), 1);
        assert_eq!(config.lookback_days, 400);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/scout"));
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.output.max_rows, 10);
    }

    #[test]
    fn test_explicit_empty_universe_is_allowed() {
        let settings = ScreenerSettings {
            universe: Some(Vec::new()),
            ..Default::default()
        };
        let config = ScreenerConfig::from_settings(&settings).unwrap();
        assert!(config.universe.is_empty());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let settings = ScreenerSettings {
            output: OutputSettings {
                format: Some("pdf".into()),
                max_rows: None,
            },
            ..Default::default()
        };
        let err = ScreenerConfig::from_settings(&settings).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("screener.output.format"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let dup = ScreenerConfig::default()
            .with_universe(AssetUniverse::from_pairs([("AAPL", "Apple"), ("AAPL", "Again")]));
        assert!(dup.validate().unwrap_err().to_string().contains("duplicate"));

        let blank = ScreenerConfig::default().with_universe(AssetUniverse::from_pairs([(" ", "Blank")]));
        assert!(blank.validate().is_err());

        assert!(ScreenerConfig::default().with_lookback_days(0).validate().is_err());
        assert!(ScreenerConfig::default().with_max_concurrency(0).validate().is_err());
        assert!(ScreenerConfig::default()
            .with_fetch_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_universe_serialization_keeps_order() {
        let universe = AssetUniverse::default();
        let json = serde_json::to_string(&universe).unwrap();
        assert!(json.starts_with("[{\"ticker\":\"AAPL\""));

        let parsed: AssetUniverse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, universe);
    }
}
