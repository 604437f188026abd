//! `PositionShufflePermutation` — the "original MCPT" sign-shuffle variant.
//! Instead of resynthesizing the whole series, this reshuffles the sign of
//! each closed trade's return (our available unit for "in-position return",
//! since the `Backtester` contract surfaces trades, not a bar-by-bar
//! position/equity curve) and recomputes the total. Grounded on
//! `original_source/libs/statistics/PALMonteCarloValidation.h`'s
//! original-MCPT sign-shuffle description, adapted to this crate's
//! trade-level `Backtester` interface.

use super::observer::{PermutationObserver, StatisticKind};
use crate::error::McptConfigError;
use palvalidator_core::backtest::Backtester;
use palvalidator_core::strategy::StrategyId;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

pub const MIN_PERMUTATIONS: u32 = 100;
const MIN_BASELINE_TRADES: u32 = 4;

pub struct PositionShufflePermutation {
    seed: u64,
    num_permutations: u32,
    observers: Vec<Arc<dyn PermutationObserver>>,
}

impl PositionShufflePermutation {
    pub fn new(seed: u64, num_permutations: u32) -> Result<Self, McptConfigError> {
        if num_permutations < MIN_PERMUTATIONS {
            return Err(McptConfigError::TooFewPermutations(num_permutations, MIN_PERMUTATIONS));
        }
        Ok(Self { seed, num_permutations, observers: Vec::new() })
    }

    pub fn attach_observer(&mut self, observer: Arc<dyn PermutationObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self, strategy_id: StrategyId, kind: StatisticKind, value: Decimal) {
        for observer in &self.observers {
            observer.on_statistic(strategy_id, kind, value);
        }
    }

    /// `baseline_backtester` must already have the strategy and series
    /// bound, but not yet run.
    pub fn run(&self, strategy_id: StrategyId, mut baseline_backtester: Box<dyn Backtester>) -> Decimal {
        baseline_backtester.backtest();
        let trades = baseline_backtester.closed_trades();
        if (trades.len() as u32) < MIN_BASELINE_TRADES {
            return Decimal::ONE;
        }

        let magnitudes: Vec<Decimal> = trades.iter().map(|t| t.pnl_percent.abs()).collect();
        let cand_return: Decimal = trades.iter().map(|t| t.pnl_percent).sum();
        self.notify(strategy_id, StatisticKind::Baseline, cand_return);

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut c: u32 = 0;

        for _ in 0..self.num_permutations {
            let trial_return: Decimal = magnitudes
                .iter()
                .map(|m| if rng.gen_bool(0.5) { *m } else { -*m })
                .sum();
            self.notify(strategy_id, StatisticKind::Permuted, trial_return);
            if trial_return >= cand_return {
                c += 1;
            }
        }

        Decimal::from(c + 1) / Decimal::from(self.num_permutations + 1)
    }
}
