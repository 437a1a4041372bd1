//! Data provider abstraction.
//!
//! Defines the `DataProvider` trait the screener fetches through. Any
//! market data source (local snapshots, a vendor API) implements it.

use async_trait::async_trait;
use std::fmt;

use super::{PriceSeries, RawFundamentals};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors specific to data providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network error (connection failed, timeout)
    Network(String),
    /// Rate limit exceeded
    RateLimited { retry_after_secs: Option<u64> },
    /// Data not available for the requested symbol
    DataNotAvailable(String),
    /// Provider is temporarily unavailable
    Unavailable(String),
    /// Invalid request parameters
    InvalidRequest(String),
    /// Provider returned a payload that could not be decoded
    Decode(String),
    /// Provider returned a decodable series that violates ordering or price rules
    InvalidData(String),
    /// Internal provider error
    Internal(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::RateLimited { retry_after_secs } => {
                write!(f, "Rate limited")?;
                if let Some(secs) = retry_after_secs {
                    write!(f, ", retry after {} seconds", secs)?;
                }
                Ok(())
            }
            Self::DataNotAvailable(msg) => write!(f, "Data not available: {}", msg),
            Self::Unavailable(msg) => write!(f, "Provider unavailable: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
            Self::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Check if the error is transient (worth retrying on a later run)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited { .. } | Self::Unavailable(_)
        )
    }
}

// ============================================================================
// Data Provider Trait
// ============================================================================

/// Trait for market data providers.
///
/// Failures are scoped to the requested symbol; the screener never treats a
/// provider error as fatal for the whole run.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Get the provider name (e.g., "local")
    fn name(&self) -> &'static str;

    /// Fetch the daily series for a symbol covering the last
    /// `lookback_days` calendar days, in chronological order.
    async fn get_daily_series(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError>;

    /// Fetch the raw fundamentals record for a symbol.
    async fn get_fundamentals(&self, symbol: &str) -> Result<RawFundamentals, ProviderError>;
}

// ============================================================================
// Tests
// ============================================================================
