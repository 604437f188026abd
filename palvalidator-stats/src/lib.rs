//! Statistical validation for discovered patterns: Monte Carlo permutation
//! testing and multiple-testing correction.
//!
//! This crate depends on `palvalidator-core`'s `Backtester` and `Strategy`
//! types but owns nothing about pattern discovery itself.

pub mod correction;
pub mod error;
pub mod mcpt;
pub mod synthetic;

pub use correction::{
    AdaptiveBh, BaselineStat, BenjaminiHochbergFdr, Entry, Family, HolmRomanoWolfStepUp, PValueContainer,
    RomanoWolfStepDown, UnadjustedSelection, DEFAULT_Q,
};
pub use error::{CorrectionError, McptConfigError};
pub use mcpt::{
    cumulative_return, profit_factor, MetricFn, MonteCarloPermutationDriver, PayoffRatioEstimator,
    PermutationObserver, PositionShufflePermutation, StatisticKind, StreamingStatsObserver, StreamingSummary,
    DRIVER_MIN_PERMUTATIONS, POSITION_SHUFFLE_MIN_PERMUTATIONS,
};
pub use synthetic::{BarPermutationSource, SyntheticSeriesSource};
