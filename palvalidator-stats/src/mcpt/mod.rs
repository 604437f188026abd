pub mod driver;
pub mod observer;
pub mod payoff_ratio;
pub mod position_shuffle;

pub use driver::{
    cumulative_return, profit_factor, MetricFn, MonteCarloPermutationDriver,
    MIN_PERMUTATIONS as DRIVER_MIN_PERMUTATIONS,
};
pub use observer::{PermutationObserver, StatisticKind, StreamingStatsObserver, StreamingSummary};
pub use payoff_ratio::PayoffRatioEstimator;
pub use position_shuffle::{PositionShufflePermutation, MIN_PERMUTATIONS as POSITION_SHUFFLE_MIN_PERMUTATIONS};
