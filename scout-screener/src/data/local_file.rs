//! File-backed data provider.
//!
//! Reads one JSON snapshot per ticker from a directory:
//!
//! ```text
//! <root>/AAPL.json
//! <root>/_NDX.json      (^NDX)
//! <root>/GC_F.json      (GC=F)
//! ```
//!
//! Snapshot layout:
//!
//! ```json
//! {
//!   "symbol": "AAPL",
//!   "prices": [{"date": "2024-01-02", "open": 187.1, "high": 188.4,
//!               "low": 183.9, "close": 185.6, "volume": 82488700}],
//!   "fundamentals": {"trailingPE": 28.4, "revenueGrowth": 0.06}
//! }
//! ```

use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{DataProvider, PricePoint, PriceSeries, ProviderError, RawFundamentals};

/// On-disk market data snapshot for one ticker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub fundamentals: RawFundamentals,
}

/// Data provider backed by JSON snapshot files.
#[derive(Debug, Clone)]
pub struct LocalFileProvider {
    root: PathBuf,
}

impl LocalFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file for `symbol`.
    pub fn snapshot_path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(symbol)))
    }

    /// Write a snapshot for `symbol`, creating the directory if needed.
    pub async fn save_snapshot(
        &self,
        symbol: &str,
        snapshot: &Snapshot,
    ) -> Result<PathBuf, ProviderError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ProviderError::Internal(format!("create {}: {}", self.root.display(), e)))?;

        let path = self.snapshot_path(symbol);
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| ProviderError::Internal(format!("write {}: {}", path.display(), e)))?;

        Ok(path)
    }

    async fn load_snapshot(&self, symbol: &str) -> Result<Snapshot, ProviderError> {
        let path = self.snapshot_path(symbol);
        debug!(symbol, path = %path.display(), "Reading snapshot");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProviderError::DataNotAvailable(format!(
                    "no snapshot for {} at {}",
                    symbol,
                    path.display()
                )));
            }
            Err(e) => {
                return Err(ProviderError::Unavailable(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| ProviderError::Decode(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl DataProvider for LocalFileProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get_daily_series(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError> {
        if lookback_days == 0 {
            return Err(ProviderError::InvalidRequest(
                "lookback must be at least one day".into(),
            ));
        }

        let snapshot = self.load_snapshot(symbol).await?;
        let series = PriceSeries::new(symbol, snapshot.prices)
            .map_err(|e| ProviderError::InvalidData(format!("{}: {}", symbol, e)))?;

        let Some(latest) = series.latest().map(|p| p.date) else {
            return Ok(series);
        };
        // A window reaching past the earliest representable date keeps everything.
        match latest.checked_sub_signed(Duration::days(i64::from(lookback_days))) {
            Some(cutoff) => Ok(series.after(cutoff)),
            None => Ok(series),
        }
    }

    async fn get_fundamentals(&self, symbol: &str) -> Result<RawFundamentals, ProviderError> {
        Ok(self.load_snapshot(symbol).await?.fundamentals)
    }
}

/// File-name-safe form of a ticker: anything outside `[A-Za-z0-9.-]`
/// becomes `_`.
pub fn file_stem(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
