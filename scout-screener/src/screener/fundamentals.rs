//! Fundamentals extractor.
//!
//! Normalizes the three fields the scoring rules read out of whatever shape
//! the provider delivered. Missing, null and malformed values all come out
//! as `None`; zero stays zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::RawFundamentals;

/// Provider key for trailing price/earnings.
pub const TRAILING_PE_KEY: &str = "trailingPE";
/// Provider key for year-over-year revenue growth (fraction, 0.15 = 15%).
pub const REVENUE_GROWTH_KEY: &str = "revenueGrowth";
/// Provider key for return on equity (fraction).
pub const RETURN_ON_EQUITY_KEY: &str = "returnOnEquity";

/// Normalized fundamentals used by scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    pub trailing_pe: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub return_on_equity: Option<f64>,
}

impl FundamentalsRecord {
    pub fn new(
        trailing_pe: Option<f64>,
        revenue_growth: Option<f64>,
        return_on_equity: Option<f64>,
    ) -> Self {
        Self {
            trailing_pe,
            revenue_growth,
            return_on_equity,
        }
    }

    /// Select and coerce the scoring fields from a raw record. Never fails.
    pub fn extract(raw: &RawFundamentals) -> Self {
        Self {
            trailing_pe: field(raw, TRAILING_PE_KEY),
            revenue_growth: field(raw, REVENUE_GROWTH_KEY),
            return_on_equity: field(raw, RETURN_ON_EQUITY_KEY),
        }
    }

    /// Number of fields present.
    pub fn present_count(&self) -> usize {
        [self.trailing_pe, self.revenue_growth, self.return_on_equity]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}

fn field(raw: &RawFundamentals, key: &str) -> Option<f64> {
    raw.get(key).and_then(coerce_numeric)
}

/// Coerce a JSON value to a finite number.
///
/// Accepts numbers, numeric strings and `{"raw": <number>}` wrappers.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("raw").and_then(|raw| match raw {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }),
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
    };

    number.filter(|n| n.is_finite())
}
