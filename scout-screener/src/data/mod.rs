//! Market data module.
//!
//! Holds the daily price/volume series and raw fundamentals that the
//! screener consumes, plus the provider abstraction used to fetch them.
//!
//! # Data Sources
//! - **LocalFileProvider**: JSON snapshots on disk, one file per ticker

mod local_file;
mod provider;

pub use local_file::{LocalFileProvider, Snapshot};
pub use provider::{DataProvider, ProviderError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// Price Data
// ============================================================================

/// One trading day of OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date (ordering key)
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume
    #[serde(default)]
    pub volume: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Point where every price equals `price`.
    pub fn flat(date: NaiveDate, price: f64, volume: f64) -> Self {
        Self::new(date, price, price, price, price, volume)
    }
}

/// Validation failures for a price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("point {index} ({date}) is not after the previous point")]
    OutOfOrder { index: usize, date: NaiveDate },

    #[error("invalid {field} price on {date}")]
    InvalidPrice { date: NaiveDate, field: &'static str },

    #[error("invalid volume on {date}")]
    InvalidVolume { date: NaiveDate },
}

/// Chronologically ordered daily series for one ticker.
///
/// Dates are strictly increasing; prices are positive and finite; volume is
/// non-negative and finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a validated series.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            for (field, value) in [
                ("open", point.open),
                ("high", point.high),
                ("low", point.low),
                ("close", point.close),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(SeriesError::InvalidPrice {
                        date: point.date,
                        field,
                    });
                }
            }

            if !point.volume.is_finite() || point.volume < 0.0 {
                return Err(SeriesError::InvalidVolume { date: point.date });
            }

            if index > 0 && point.date <= points[index - 1].date {
                return Err(SeriesError::OutOfOrder {
                    index,
                    date: point.date,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Volumes in date order.
    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    /// Keep only points dated strictly after `cutoff`.
    pub fn after(mut self, cutoff: NaiveDate) -> Self {
        self.points.retain(|p| p.date > cutoff);
        self
    }
}

// ============================================================================
// Fundamentals
// ============================================================================

/// Loosely structured fundamentals record as delivered by a provider.
///
/// Keys and value types are whatever the provider emits; the screener
/// normalizes the handful of fields it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFundamentals(Map<String, Value>);

impl RawFundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an arbitrary JSON value; non-objects become an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawFundamentals {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Tests
// ============================================================================
