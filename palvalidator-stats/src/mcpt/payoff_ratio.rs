//! `PayoffRatioEstimator` — the payoff-ratio MCPT variant. Runs the
//! strategy over `num_permutations` synthetic series, pools every winning
//! and losing trade it observes, and reports
//! `median(winners) / |median(losers)|`. Shares its synthetic-series loop
//! structure with [`crate::mcpt::driver::MonteCarloPermutationDriver`].

use crate::error::McptConfigError;
use crate::mcpt::driver::MIN_PERMUTATIONS;
use crate::synthetic::SyntheticSeriesSource;
use palvalidator_core::backtest::Backtester;
use palvalidator_core::series::TimeSeries;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct PayoffRatioEstimator {
    synthetic_source: Arc<dyn SyntheticSeriesSource>,
    num_permutations: u32,
}

impl PayoffRatioEstimator {
    pub fn new(synthetic_source: Arc<dyn SyntheticSeriesSource>, num_permutations: u32) -> Result<Self, McptConfigError> {
        if num_permutations < MIN_PERMUTATIONS {
            return Err(McptConfigError::TooFewPermutations(num_permutations, MIN_PERMUTATIONS));
        }
        Ok(Self { synthetic_source, num_permutations })
    }

    /// `baseline_backtester` must already have the strategy bound, but not
    /// yet run — it is used only as a template cloned per synthetic series.
    pub fn estimate(&self, baseline_backtester: &dyn Backtester, original_series: &Arc<TimeSeries>) -> Decimal {
        let mut winners: Vec<Decimal> = Vec::new();
        let mut losers: Vec<Decimal> = Vec::new();

        for _ in 0..self.num_permutations {
            let synthetic = self.synthetic_source.create_synthetic_series(original_series);
            let mut bt = baseline_backtester.clone_with_series(Arc::new(synthetic));
            bt.backtest();
            for trade in bt.closed_trades() {
                if trade.is_winner() {
                    winners.push(trade.pnl_percent);
                } else if trade.pnl_percent < Decimal::ZERO {
                    losers.push(trade.pnl_percent.abs());
                }
            }
        }

        if winners.is_empty() || losers.is_empty() {
            return Decimal::ZERO;
        }

        median(&mut winners) / median(&mut losers)
    }
}

fn median(values: &mut [Decimal]) -> Decimal {
    values.sort();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / Decimal::from(2)
    }
}
