//! `MonteCarloPermutationDriver`. Runs a strategy's baseline
//! backtest, then repeatedly reruns it over synthetic series, counting how
//! often the synthetic metric matches or beats the baseline. Grounded on
//! `original_source/libs/timeserieslib/MonteCarloPermutationTest.h`'s
//! baseline-then-permute loop structure and its no-power short-circuit for
//! thin trade counts.

use super::observer::{PermutationObserver, StatisticKind};
use crate::error::McptConfigError;
use crate::synthetic::SyntheticSeriesSource;
use palvalidator_core::backtest::Backtester;
use palvalidator_core::series::TimeSeries;
use palvalidator_core::strategy::StrategyId;
use rust_decimal::Decimal;
use std::sync::Arc;

pub const MIN_PERMUTATIONS: u32 = 10;
const MAX_REDRAW_ATTEMPTS: u32 = 50;
const MIN_BASELINE_TRADES: u32 = 4;
const MIN_PERMUTED_TRADES: u32 = 2;

/// Computes a single scalar performance statistic from a backtested
/// strategy. The policy is caller-supplied (examples include cumulative
/// return, log profit factor, and max-trade profit factor as examples).
pub type MetricFn = Arc<dyn Fn(&dyn Backtester) -> Decimal + Send + Sync>;

pub fn cumulative_return(backtester: &dyn Backtester) -> Decimal {
    backtester.closed_trades().iter().map(|t| t.pnl_percent).sum()
}

pub fn profit_factor(backtester: &dyn Backtester) -> Decimal {
    backtester.profitability().0
}

pub struct MonteCarloPermutationDriver {
    synthetic_source: Arc<dyn SyntheticSeriesSource>,
    num_permutations: u32,
    observers: Vec<Arc<dyn PermutationObserver>>,
}

impl MonteCarloPermutationDriver {
    pub fn new(synthetic_source: Arc<dyn SyntheticSeriesSource>, num_permutations: u32) -> Result<Self, McptConfigError> {
        if num_permutations < MIN_PERMUTATIONS {
            return Err(McptConfigError::TooFewPermutations(num_permutations, MIN_PERMUTATIONS));
        }
        Ok(Self { synthetic_source, num_permutations, observers: Vec::new() })
    }

    pub fn attach_observer(&mut self, observer: Arc<dyn PermutationObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self, strategy_id: StrategyId, kind: StatisticKind, value: Decimal) {
        for observer in &self.observers {
            observer.on_statistic(strategy_id, kind, value);
        }
    }

    /// `baseline_backtester` must already have the strategy bound and the
    /// original series attached, but not yet run. Returns the permutation
    /// p-value, or the no-power sentinel `1.00` if the baseline run closes
    /// fewer than 4 trades.
    pub fn run(
        &self,
        strategy_id: StrategyId,
        mut baseline_backtester: Box<dyn Backtester>,
        original_series: &Arc<TimeSeries>,
        metric: &MetricFn,
    ) -> Decimal {
        baseline_backtester.backtest();
        if baseline_backtester.get_num_trades() < MIN_BASELINE_TRADES {
            return Decimal::ONE;
        }

        let m0 = metric(baseline_backtester.as_ref());
        self.notify(strategy_id, StatisticKind::Baseline, m0);

        let mut c: u32 = 0;
        for _ in 0..self.num_permutations {
            let mut permuted = self.run_one_permutation(baseline_backtester.as_ref(), original_series);
            permuted.backtest();

            let mut attempts = 1;
            while permuted.get_num_trades() < MIN_PERMUTED_TRADES && attempts < MAX_REDRAW_ATTEMPTS {
                permuted = self.run_one_permutation(baseline_backtester.as_ref(), original_series);
                permuted.backtest();
                attempts += 1;
            }

            let mi = metric(permuted.as_ref());
            self.notify(strategy_id, StatisticKind::Permuted, mi);
            if mi >= m0 {
                c += 1;
            }
        }

        Decimal::from(c + 1) / Decimal::from(self.num_permutations + 1)
    }

    fn run_one_permutation(&self, baseline_backtester: &dyn Backtester, original_series: &Arc<TimeSeries>) -> Box<dyn Backtester> {
        let synthetic = self.synthetic_source.create_synthetic_series(original_series);
        baseline_backtester.clone_with_series(Arc::new(synthetic))
    }
}
