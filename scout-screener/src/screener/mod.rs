//! Market Screener Module.
//!
//! Scores a small, configured universe of stocks, indices and commodities
//! on technical momentum and basic fundamentals, then ranks them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │ DataProvider │──▶│  Indicators  │──▶│   Scoring    │──▶│  Report  │
//! │ (per asset)  │   │ RSI/SMA/VOL  │   │  (0 - 60)    │   │          │
//! └──────┬───────┘   └──────────────┘   └──────▲───────┘   └──────────┘
//!        │                                     │
//!        └────────────▶ Fundamentals ──────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use scout_screener::screener::{ScreenerConfig, ScreenerEngine};
//!
//! let engine = ScreenerEngine::new(ScreenerConfig::default(), provider);
//! let result = engine.run().await;
//!
//! if let Some(top) = result.top_pick() {
//!     println!("{} scored {}", top.ticker, top.score);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod fundamentals;
pub mod indicators;
pub mod report;
pub mod scoring;

pub use config::{AssetUniverse, OutputConfig, ScreenerConfig, MIN_HISTORY};
pub use engine::{
    AssetFailure, AssetOutcome, AssetResult, AssetStage, RunSummary, ScreenerEngine,
    ScreenerResult, SkipReason,
};
pub use fundamentals::FundamentalsRecord;
pub use indicators::{IndicatorFrame, IndicatorSnapshot};
pub use report::{ReportFormat, ScreenerReport};
pub use scoring::{score, Rule, ScoreBreakdown, MAX_SCORE};
