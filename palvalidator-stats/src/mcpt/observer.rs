//! Observer hook for `MonteCarloPermutationDriver`. The
//! driver is a Subject notifying attached observers of each baseline and
//! permuted statistic, keyed by strategy id; observers accumulate streaming
//! summaries without retaining the full stream. Grounded on
//! `PermutationTestingMaxTestStatisticPolicy` (a policy object updated once
//! per permutation, `update`/`get` shape) from
//! `original_source/libs/statistics/PermutationTestResultPolicy.h`,
//! generalized from "track the max" to "track min/max/median/stddev/count".
//!
//! Exact medians require the raw stream; we approximate with reservoir
//! sampling (capacity 201) so memory stays bounded regardless of how many
//! permutations a driver runs.

use palvalidator_core::strategy::StrategyId;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;

const RESERVOIR_CAPACITY: usize = 201;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticKind {
    Baseline,
    Permuted,
}

pub trait PermutationObserver: Send + Sync {
    fn on_statistic(&self, strategy_id: StrategyId, kind: StatisticKind, value: Decimal);
}

#[derive(Debug, Clone, Copy)]
pub struct StreamingSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub stddev: f64,
}

struct Accumulator {
    count: u64,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
    reservoir: Vec<f64>,
}

impl Accumulator {
    fn new() -> Self {
        Self { count: 0, min: f64::INFINITY, max: f64::NEG_INFINITY, sum: 0.0, sum_sq: 0.0, reservoir: Vec::new() }
    }

    fn observe(&mut self, value: f64, rng: &mut ChaCha8Rng) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.sum_sq += value * value;

        if self.reservoir.len() < RESERVOIR_CAPACITY {
            self.reservoir.push(value);
        } else {
            let j = rng.gen_range(0..self.count as usize);
            if j < RESERVOIR_CAPACITY {
                self.reservoir[j] = value;
            }
        }
    }

    fn summary(&self) -> StreamingSummary {
        if self.count == 0 {
            return StreamingSummary { count: 0, min: 0.0, max: 0.0, median: 0.0, stddev: 0.0 };
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n - mean * mean).max(0.0);

        let mut sorted = self.reservoir.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if sorted.is_empty() {
            0.0
        } else if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        };

        StreamingSummary { count: self.count, min: self.min, max: self.max, median, stddev: variance.sqrt() }
    }
}

/// Accumulates per-strategy, per-kind streaming statistics. Reservoir
/// sampling needs its own RNG stream, seeded independently of the
/// permutation driver's synthetic-series RNG.
pub struct StreamingStatsObserver {
    seed: u64,
    accumulators: Mutex<HashMap<(StrategyId, StatisticKind), (Accumulator, ChaCha8Rng)>>,
}

impl StreamingStatsObserver {
    pub fn new(seed: u64) -> Self {
        Self { seed, accumulators: Mutex::new(HashMap::new()) }
    }

    pub fn summary_for(&self, strategy_id: StrategyId, kind: StatisticKind) -> Option<StreamingSummary> {
        let accumulators = self.accumulators.lock().expect("observer accumulator table poisoned");
        accumulators.get(&(strategy_id, kind)).map(|(acc, _)| acc.summary())
    }
}

impl PermutationObserver for StreamingStatsObserver {
    fn on_statistic(&self, strategy_id: StrategyId, kind: StatisticKind, value: Decimal) {
        use rand::SeedableRng;

        let mut accumulators = self.accumulators.lock().expect("observer accumulator table poisoned");
        let entry = accumulators
            .entry((strategy_id, kind))
            .or_insert_with(|| (Accumulator::new(), ChaCha8Rng::seed_from_u64(self.seed)));
        entry.0.observe(value.to_f64().unwrap_or(0.0), &mut entry.1);
    }
}
