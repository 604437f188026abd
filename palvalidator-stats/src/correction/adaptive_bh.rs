//! Policy (c): `AdaptiveBh` — Benjamini-Hochberg with a
//! bootstrap-estimated proportion of true nulls (π₀) instead of the
//! conservative π₀=1 assumption. The q-value monotonicity pass mirrors the
//! `fdr::benjamini_hochberg` reverse-rank step-up idiom
//! (`adjusted[k] = corrected.min(adjusted[k + 1])`), generalized from
//! adjusted p-values to q-values with a bootstrap-estimated `m0` in place of
//! the raw hypothesis count. Bootstrap resampling reuses the
//! seeded-`ChaCha8Rng` pattern from `robustness::levels::bootstrap`.

use super::container::{Entry, Family, PValueContainer};
use palvalidator_core::strategy::StrategyId;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const TAIL_LAMBDA: f64 = 0.5;
const BOOTSTRAP_SAMPLES: usize = 1000;
const BOOTSTRAP_THRESHOLD: usize = 30;

pub struct AdaptiveBh;

impl AdaptiveBh {
    /// `target_fdr`: the q-value cutoff. `seed` drives the bootstrap RNG,
    /// for reproducibility. `partition_by_family` applies the whole
    /// procedure independently within `{Long, Short}` rather than pooling.
    pub fn survivors(
        container: &PValueContainer,
        target_fdr: Decimal,
        seed: u64,
        partition_by_family: bool,
    ) -> Vec<StrategyId> {
        if partition_by_family {
            let mut survivors = Self::survivors_within(container.entries_in(Family::Long), target_fdr, seed);
            survivors.extend(Self::survivors_within(container.entries_in(Family::Short), target_fdr, seed.wrapping_add(1)));
            survivors
        } else {
            Self::survivors_within(container.sorted_ascending(), target_fdr, seed)
        }
    }

    fn survivors_within(mut entries: Vec<Entry>, target_fdr: Decimal, seed: u64) -> Vec<StrategyId> {
        entries.sort_by(|a, b| a.p_value.cmp(&b.p_value));
        let m = entries.len();
        if m == 0 {
            return Vec::new();
        }

        let p: Vec<f64> = entries.iter().map(|e| e.p_value.to_f64().unwrap_or(1.0)).collect();
        let m0 = Self::estimate_m0(&p, seed);
        let q = Self::q_values(&p, m0);
        let target = target_fdr.to_f64().unwrap_or(0.10);

        entries
            .into_iter()
            .zip(q)
            .filter(|(_, q_i)| *q_i <= target)
            .map(|(entry, _)| entry.strategy_id)
            .collect()
    }

    /// q_m = min(1, m0*p_(m)/m); q_i = min(q_(i+1), m0*p_(i)/(i+1)), walked
    /// in reverse rank order so each q_i inherits the monotonicity of its
    /// larger-ranked neighbor.
    fn q_values(p: &[f64], m0: f64) -> Vec<f64> {
        let m = p.len();
        let mut q = vec![0.0; m];
        q[m - 1] = (m0 * p[m - 1] / m as f64).min(1.0);
        for i in (0..m - 1).rev() {
            let candidate = m0 * p[i] / (i + 1) as f64;
            q[i] = candidate.min(q[i + 1]);
        }
        q
    }

    fn estimate_m0(p: &[f64], seed: u64) -> f64 {
        let m = p.len();
        if m < BOOTSTRAP_THRESHOLD {
            return tail_m0(p);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pi0_samples: Vec<f64> = (0..BOOTSTRAP_SAMPLES)
            .map(|_| {
                let sample: Vec<f64> = (0..m).map(|_| p[rng.gen_range(0..m)]).collect();
                tail_pi0(&sample)
            })
            .collect();
        pi0_samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = percentile(&pi0_samples, 0.5);
        let low = percentile(&pi0_samples, 0.025);
        let high = percentile(&pi0_samples, 0.975);

        let m0 = median * m as f64;
        let ci_width = (high - low) * m as f64;

        let floor = (m as f64 * 0.25).max(10.0);
        if ci_width > 0.4 * m as f64 || m0 < floor || m0 > m as f64 {
            tail_m0(p)
        } else {
            m0.max(1.0)
        }
    }
}

fn tail_pi0(p: &[f64]) -> f64 {
    let m = p.len() as f64;
    let count = p.iter().filter(|&&x| x > TAIL_LAMBDA).count() as f64;
    (count / ((1.0 - TAIL_LAMBDA) * m)).min(1.0)
}

fn tail_m0(p: &[f64]) -> f64 {
    (tail_pi0(p) * p.len() as f64).max(1.0)
}

/// Nearest-rank percentile of an already-sorted-ascending slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * fraction).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use palvalidator_core::ast::{Entry as PatternEntry, PatternDescription, PortfolioAttr, ProfitTarget, Side, StopLoss, VolatilityAttr};
    use palvalidator_core::resource_manager::AstResourceManager;
    use palvalidator_core::strategy::Strategy;

    fn id(seed: u32) -> StrategyId {
        let rm = AstResourceManager::new();
        let a = rm.get_price_close(0);
        let b = rm.get_price_close(seed + 1);
        let predicate = rm.compare(a, b);
        let pattern = rm.create_pattern(
            PatternDescription::placeholder("X", seed),
            predicate,
            PatternEntry::LongOnOpen,
            ProfitTarget::new(Side::Long, Decimal::from(4)),
            StopLoss::new(Side::Long, Decimal::from(2)),
            VolatilityAttr::None,
            PortfolioAttr::None,
        );
        Strategy::new("s", pattern).id
    }

    #[test]
    fn small_family_uses_tail_estimator_and_keeps_small_p_values() {
        let mut container = PValueContainer::new();
        let ps = ["0.001", "0.01", "0.02", "0.6", "0.7", "0.8", "0.9"];
        for (i, p) in ps.iter().enumerate() {
            container.add(id(i as u32), p.parse().unwrap(), Family::Long);
        }
        let survivors = AdaptiveBh::survivors(&container, Decimal::from_str_exact("0.10").unwrap(), 7, false);
        assert!(!survivors.is_empty());
        assert!(survivors.len() < ps.len());
    }

    #[test]
    fn q_values_are_monotone_non_decreasing_with_rank() {
        let p = [0.001, 0.01, 0.02, 0.03, 0.05, 0.07, 0.10, 0.20, 0.40, 0.80];
        let q = AdaptiveBh::q_values(&p, tail_m0(&p));
        for window in q.windows(2) {
            assert!(window[0] <= window[1] + 1e-12);
        }
        for q_i in q {
            assert!((0.0..=1.0).contains(&q_i));
        }
    }

    #[test]
    fn empty_container_yields_no_survivors() {
        let container = PValueContainer::new();
        let survivors = AdaptiveBh::survivors(&container, Decimal::from_str_exact("0.10").unwrap(), 1, false);
        assert!(survivors.is_empty());
    }

    #[test]
    fn family_partitioning_runs_each_side_independently() {
        let mut container = PValueContainer::new();
        container.add(id(1), Decimal::from_str_exact("0.001").unwrap(), Family::Long);
        container.add(id(2), Decimal::from_str_exact("0.9").unwrap(), Family::Long);
        container.add(id(3), Decimal::from_str_exact("0.002").unwrap(), Family::Short);
        container.add(id(4), Decimal::from_str_exact("0.8").unwrap(), Family::Short);

        let survivors = AdaptiveBh::survivors(&container, Decimal::from_str_exact("0.10").unwrap(), 3, true);
        assert_eq!(survivors.len(), 2);
    }
}
