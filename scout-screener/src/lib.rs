//! Scout Screener Library
//!
//! Ranks a watch list of assets by a simple opportunity score built from
//! technical indicators (RSI, moving averages, volume) and fundamentals
//! (valuation, growth, profitability).
//!
//! # Key Concepts
//!
//! ## Indicators
//! - **RSI(14)**: Wilder-smoothed relative strength
//! - **SMA(50) / SMA(200)**: trend alignment
//! - **VOL_MA(20)**: baseline for volume surges
//!
//! ## Outcomes
//! - Assets with less than 200 daily points are skipped
//! - Provider errors and timeouts fail one asset, never the run

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod data;
pub mod screener;

pub use data::{DataProvider, LocalFileProvider, PricePoint, PriceSeries, ProviderError, RawFundamentals};
pub use screener::{ScreenerConfig, ScreenerEngine, ScreenerReport, ScreenerResult};
