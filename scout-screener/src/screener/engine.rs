//! Screener engine module.
//!
//! The central orchestrator for a screening run: fetch, validate, compute,
//! score and rank every asset in the configured universe.

use std::cmp::Reverse;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures_util::stream::{self, StreamExt};
use scout_common::UniverseEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::{DataProvider, ProviderError};

use super::config::{ScreenerConfig, MIN_HISTORY};
use super::fundamentals::FundamentalsRecord;
use super::indicators::IndicatorFrame;
use super::scoring::{score, ScoreBreakdown};

// ============================================================================
// Asset Result
// ============================================================================

/// A scored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResult {
    /// Display name (e.g., "Apple")
    pub name: String,
    /// Ticker symbol (e.g., "AAPL")
    pub ticker: String,
    /// Opportunity score (0-60)
    pub score: u32,
    /// Latest close
    pub price: f64,
    /// Date of the latest close
    pub as_of: NaiveDate,
    /// Latest RSI(14)
    pub rsi: Option<f64>,
    /// Trailing P/E
    pub pe: Option<f64>,
    /// Revenue growth (fraction, 0.15 = 15%)
    pub revenue_growth: Option<f64>,
    /// Return on equity (fraction)
    pub return_on_equity: Option<f64>,
    /// Rules that contributed to the score
    pub breakdown: ScoreBreakdown,
}

// ============================================================================
// Asset Outcome
// ============================================================================

/// Processing stage of a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStage {
    Fetching,
    Validating,
    Computing,
}

impl std::fmt::Display for AssetStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetching => write!(f, "fetching"),
            Self::Validating => write!(f, "validating"),
            Self::Computing => write!(f, "computing"),
        }
    }
}

/// Why an asset was left out of the ranking without being an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer daily points than the slow moving average needs
    InsufficientHistory { points: usize, required: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientHistory { points, required } => {
                write!(f, "insufficient history: {} of {} points", points, required)
            }
        }
    }
}

/// Why an asset failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetFailure {
    /// Provider error or fetch timeout; `transient` marks errors worth
    /// retrying on a later run
    #[error("data unavailable: {message}")]
    DataUnavailable { message: String, transient: bool },

    /// Provider returned a series that violates date ordering or price rules
    #[error("invalid series: {message}")]
    InvalidSeries { message: String },

    /// Indicator computation produced nothing to score
    #[error("computation failed: {message}")]
    Computation { message: String },
}

impl AssetFailure {
    /// Stage at which this kind of failure surfaces.
    pub fn stage(&self) -> AssetStage {
        match self {
            Self::DataUnavailable { .. } => AssetStage::Fetching,
            Self::InvalidSeries { .. } => AssetStage::Validating,
            Self::Computation { .. } => AssetStage::Computing,
        }
    }

    /// Whether a later run may succeed without any data fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DataUnavailable { transient: true, .. })
    }

    fn from_provider(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidData(message) => Self::InvalidSeries { message },
            other => Self::DataUnavailable {
                transient: other.is_recoverable(),
                message: other.to_string(),
            },
        }
    }
}

/// Terminal state of one asset in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetOutcome {
    Recorded(AssetResult),
    Skipped {
        ticker: String,
        name: String,
        reason: SkipReason,
    },
    Failed {
        ticker: String,
        name: String,
        stage: AssetStage,
        reason: AssetFailure,
    },
}

impl AssetOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            Self::Recorded(result) => &result.ticker,
            Self::Skipped { ticker, .. } | Self::Failed { ticker, .. } => ticker,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn failed(entry: &UniverseEntry, reason: AssetFailure) -> Self {
        Self::Failed {
            ticker: entry.ticker.clone(),
            name: entry.name.clone(),
            stage: reason.stage(),
            reason,
        }
    }
}

// ============================================================================
// Screener Result
// ============================================================================

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn tally(outcomes: &[AssetOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                total: outcomes.len(),
                ..Self::default()
            },
            |mut acc, outcome| {
                match outcome {
                    AssetOutcome::Recorded(_) => acc.recorded += 1,
                    AssetOutcome::Skipped { .. } => acc.skipped += 1,
                    AssetOutcome::Failed { .. } => acc.failed += 1,
                }
                acc
            },
        )
    }
}

/// Result of a screening run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    /// Run ID (timestamp-based)
    pub id: String,
    /// Recorded assets, sorted by score descending (ties keep universe order)
    pub results: Vec<AssetResult>,
    /// Every asset's outcome, in universe order
    pub outcomes: Vec<AssetOutcome>,
    pub counts: RunSummary,
    pub config_summary: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl ScreenerResult {
    /// Highest-scoring asset, first in universe order among ties.
    pub fn top_pick(&self) -> Option<&AssetResult> {
        self.results.first()
    }

    /// Get the top N assets by score.
    pub fn top(&self, n: usize) -> Vec<&AssetResult> {
        self.results.iter().take(n).collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    pub fn failed(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Summary string for logging.
    pub fn summary(&self) -> String {
        format!(
            "Screened {} assets in {:.1}s: {} scored, {} skipped, {} failed",
            self.counts.total,
            self.duration_secs,
            self.counts.recorded,
            self.counts.skipped,
            self.counts.failed
        )
    }
}

/// Stable sort by score, highest first.
pub fn rank(results: &mut [AssetResult]) {
    results.sort_by_key(|r| Reverse(r.score));
}

// ============================================================================
// Screener Engine
// ============================================================================

/// The main screener engine.
///
/// For each asset in the universe:
/// 1. Fetch the daily series within the lookback window
/// 2. Skip assets with fewer than 200 points
/// 3. Compute indicators and take the latest snapshot
/// 4. Fetch and extract fundamentals, then score
///
/// A failing asset never aborts the run.
pub struct ScreenerEngine<P: DataProvider + ?Sized> {
    config: ScreenerConfig,
    provider: Arc<P>,
}

impl<P: DataProvider + ?Sized> ScreenerEngine<P> {
    /// Create a new screener engine.
    pub fn new(config: ScreenerConfig, provider: Arc<P>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Run a screening pass over the whole universe.
    pub async fn run(&self) -> ScreenerResult {
        let started_at = Utc::now();
        let id = format!("scan_{}", started_at.format("%Y%m%d_%H%M%S"));

        info!(
            scan_id = %id,
            provider = self.provider.name(),
            assets = self.config.universe.len(),
            "Starting screening run"
        );

        let outcomes: Vec<AssetOutcome> = stream::iter(self.config.universe.iter())
            .map(|entry| self.screen_asset(entry))
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut results: Vec<AssetResult> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                AssetOutcome::Recorded(result) => Some(result.clone()),
                _ => None,
            })
            .collect();
        rank(&mut results);

        let completed_at = Utc::now();
        let duration_secs = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let result = ScreenerResult {
            id,
            counts: RunSummary::tally(&outcomes),
            results,
            outcomes,
            config_summary: self.config.summary(),
            started_at,
            completed_at,
            duration_secs,
        };

        info!(
            scan_id = %result.id,
            scored = result.counts.recorded,
            skipped = result.counts.skipped,
            failed = result.counts.failed,
            top = result.top_pick().map(|r| r.ticker.as_str()).unwrap_or("-"),
            duration = format!("{:.1}s", duration_secs),
            "Screening run complete"
        );

        result
    }

    // ========================================================================
    // Internal Methods
    // ========================================================================

    async fn screen_asset(&self, entry: &UniverseEntry) -> AssetOutcome {
        let ticker = entry.ticker.as_str();

        let series = match self
            .fetch(ticker, self.provider.get_daily_series(ticker, self.config.lookback_days))
            .await
        {
            Ok(series) => series,
            Err(reason) => return self.fail(entry, reason),
        };

        if series.len() < MIN_HISTORY {
            let reason = SkipReason::InsufficientHistory {
                points: series.len(),
                required: MIN_HISTORY,
            };
            debug!(ticker, %reason, "Skipping asset");
            return AssetOutcome::Skipped {
                ticker: entry.ticker.clone(),
                name: entry.name.clone(),
                reason,
            };
        }

        let frame = IndicatorFrame::compute(&series);
        let Some(snapshot) = frame.latest() else {
            let reason = AssetFailure::Computation {
                message: "indicator frame is empty".into(),
            };
            return self.fail(entry, reason);
        };

        let raw = match self
            .fetch(ticker, self.provider.get_fundamentals(ticker))
            .await
        {
            Ok(raw) => raw,
            Err(reason) => return self.fail(entry, reason),
        };
        let fundamentals = FundamentalsRecord::extract(&raw);
        let breakdown = score(&snapshot, &fundamentals);

        let result = AssetResult {
            name: entry.name.clone(),
            ticker: entry.ticker.clone(),
            score: breakdown.total(),
            price: snapshot.close,
            as_of: snapshot.date,
            rsi: snapshot.rsi,
            pe: fundamentals.trailing_pe,
            revenue_growth: fundamentals.revenue_growth,
            return_on_equity: fundamentals.return_on_equity,
            breakdown,
        };

        debug!(
            ticker,
            score = result.score,
            fundamentals = fundamentals.present_count(),
            "Scored asset"
        );

        AssetOutcome::Recorded(result)
    }

    /// Await a provider call under the configured timeout.
    async fn fetch<T, F>(&self, ticker: &str, call: F) -> Result<T, AssetFailure>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.config.fetch_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AssetFailure::from_provider(e)),
            Err(_) => Err(AssetFailure::DataUnavailable {
                message: format!(
                    "{} timed out after {}s",
                    ticker,
                    self.config.fetch_timeout.as_secs_f64()
                ),
                transient: true,
            }),
        }
    }

    fn fail(&self, entry: &UniverseEntry, reason: AssetFailure) -> AssetOutcome {
        warn!(
            ticker = %entry.ticker,
            stage = %reason.stage(),
            transient = reason.is_transient(),
            error = %reason,
            "Asset failed"
        );
        AssetOutcome::failed(entry, reason)
    }
}

// ============================================================================
// Tests
// ============================================================================
