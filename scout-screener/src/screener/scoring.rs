//! Opportunity scoring.
//!
//! A pure, additive score over six independent rules:
//!
//! | Rule | Guard | Points |
//! |------|-------|--------|
//! | Valuation | P/E present and < 35 | 10 |
//! | Growth | revenue growth present and > 0.15 | 10 |
//! | Profitability | ROE present and > 0.15 | 5 |
//! | Momentum | 40 < RSI < 70 | 10 |
//! | Trend | close > SMA50 > SMA200 | 15 |
//! | Volume surge | volume > 1.5 × 20-day average volume | 10 |
//!
//! An absent fundamental or undefined indicator makes its guard false.

use serde::{Deserialize, Serialize};

use super::fundamentals::FundamentalsRecord;
use super::indicators::IndicatorSnapshot;

pub const MAX_TRAILING_PE: f64 = 35.0;
pub const MIN_REVENUE_GROWTH: f64 = 0.15;
pub const MIN_RETURN_ON_EQUITY: f64 = 0.15;
pub const RSI_LOWER: f64 = 40.0;
pub const RSI_UPPER: f64 = 70.0;
pub const VOLUME_SURGE_MULTIPLE: f64 = 1.5;

/// Highest achievable score.
pub const MAX_SCORE: u32 = 60;

/// Individual scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Valuation,
    Growth,
    Profitability,
    Momentum,
    Trend,
    VolumeSurge,
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::Valuation,
        Rule::Growth,
        Rule::Profitability,
        Rule::Momentum,
        Rule::Trend,
        Rule::VolumeSurge,
    ];

    /// Points awarded when the rule fires.
    pub const fn points(self) -> u32 {
        match self {
            Self::Valuation => 10,
            Self::Growth => 10,
            Self::Profitability => 5,
            Self::Momentum => 10,
            Self::Trend => 15,
            Self::VolumeSurge => 10,
        }
    }

    /// Whether the rule reads fundamentals (as opposed to price technicals).
    pub const fn is_fundamental(self) -> bool {
        matches!(self, Self::Valuation | Self::Growth | Self::Profitability)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::Growth => "growth",
            Self::Profitability => "profitability",
            Self::Momentum => "momentum",
            Self::Trend => "trend",
            Self::VolumeSurge => "volume_surge",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which rules fired for one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub valuation: bool,
    pub growth: bool,
    pub profitability: bool,
    pub momentum: bool,
    pub trend: bool,
    pub volume_surge: bool,
}

impl ScoreBreakdown {
    pub fn is_fired(&self, rule: Rule) -> bool {
        match rule {
            Rule::Valuation => self.valuation,
            Rule::Growth => self.growth,
            Rule::Profitability => self.profitability,
            Rule::Momentum => self.momentum,
            Rule::Trend => self.trend,
            Rule::VolumeSurge => self.volume_surge,
        }
    }

    /// Rules that fired, in table order.
    pub fn fired(&self) -> impl Iterator<Item = Rule> + '_ {
        Rule::ALL.into_iter().filter(|rule| self.is_fired(*rule))
    }

    /// Total score.
    pub fn total(&self) -> u32 {
        self.fired().map(Rule::points).sum()
    }
}

/// Score one asset from its latest indicators and fundamentals.
pub fn score(snapshot: &IndicatorSnapshot, fundamentals: &FundamentalsRecord) -> ScoreBreakdown {
    ScoreBreakdown {
        valuation: fundamentals
            .trailing_pe
            .is_some_and(|pe| pe < MAX_TRAILING_PE),
        growth: fundamentals
            .revenue_growth
            .is_some_and(|g| g > MIN_REVENUE_GROWTH),
        profitability: fundamentals
            .return_on_equity
            .is_some_and(|roe| roe > MIN_RETURN_ON_EQUITY),
        momentum: snapshot
            .rsi
            .is_some_and(|rsi| rsi > RSI_LOWER && rsi < RSI_UPPER),
        trend: match (snapshot.sma50, snapshot.sma200) {
            (Some(fast), Some(slow)) => snapshot.close > fast && fast > slow,
            _ => false,
        },
        volume_surge: snapshot
            .volume_ma
            .is_some_and(|avg| snapshot.volume > VOLUME_SURGE_MULTIPLE * avg),
    }
}
