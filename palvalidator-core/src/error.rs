//! Error taxonomy for configuration validation and discovery failures.
//!
//! Kinds 2 (InsufficientHistory) and 3 (InsufficientTrades) are not errors:
//! they are handled as internal control flow in discovery and MCPT.

use thiserror::Error;

/// Kind 1: invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("security handle must not be null/empty")]
    NullSecurity,

    #[error("start time {start} is not before end time {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("profit target must be positive, got {0}")]
    NonPositiveProfitTarget(String),

    #[error("stop loss must be positive, got {0}")]
    NonPositiveStopLoss(String),

    #[error("min profitability must be in [0, 100], got {0}")]
    ProfitabilityOutOfRange(String),

    #[error("min trades must be >= 1, got {0}")]
    MinTradesNotPositive(u32),

    #[error("min profit factor must be > 0, got {0}")]
    ProfitFactorNotPositive(String),
}
