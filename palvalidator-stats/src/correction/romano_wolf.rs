//! Policies (d) and (e): `RomanoWolfStepDown` / `HolmRomanoWolfStepUp`.
//! Both take a baseline statistic per strategy and an empirical null
//! distribution of maximum permuted statistics, differing only in
//! iteration direction and the monotonicity combinator (min vs max).
//! Grounded on `MultipleTestingCorrection.h::RomanoWolfStepdownCorrection`
//! (the pack's only source describing an empirical-null stepdown over a
//! baseline statistic vector); unlike the other correction policies,
//! empty input here surfaces as the `EmptyCorrectionInput` error kind.

use crate::error::CorrectionError;
use palvalidator_core::strategy::StrategyId;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// One strategy's baseline test statistic, paired with its identity.
#[derive(Debug, Clone, Copy)]
pub struct BaselineStat {
    pub strategy_id: StrategyId,
    pub statistic: Decimal,
}

fn validate<'a>(strategies: &'a [BaselineStat], null_distribution: &'a [Decimal]) -> Result<(), CorrectionError> {
    if strategies.is_empty() {
        return Err(CorrectionError::EmptyCorrectionInput("no strategies supplied".to_string()));
    }
    if null_distribution.is_empty() {
        return Err(CorrectionError::EmptyCorrectionInput("empty null distribution".to_string()));
    }
    Ok(())
}

fn empirical_p(baseline: f64, null_ascending: &[f64]) -> f64 {
    let m = null_ascending.len() as f64;
    let at_or_above = null_ascending.iter().filter(|&&n| n >= baseline).count() as f64;
    at_or_above / m
}

pub struct RomanoWolfStepDown;

impl RomanoWolfStepDown {
    /// Sorts strategies by baseline statistic descending, walks ranks from
    /// `m-1` down to `0` (step-down), and accumulates the running minimum
    /// adjusted p-value.
    pub fn survivors(strategies: &[BaselineStat], null_distribution: &[Decimal], alpha: Decimal) -> Result<Vec<StrategyId>, CorrectionError> {
        validate(strategies, null_distribution)?;

        let mut sorted = strategies.to_vec();
        sorted.sort_by(|a, b| b.statistic.cmp(&a.statistic));
        let m = sorted.len();

        let mut null_sorted: Vec<f64> = null_distribution.iter().map(|d| d.to_f64().unwrap_or(0.0)).collect();
        null_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let alpha_f = alpha.to_f64().unwrap_or(0.05);
        let mut adjusted = vec![0.0_f64; m];
        let mut previous = 1.0_f64;

        for i in (0..m).rev() {
            let baseline = sorted[i].statistic.to_f64().unwrap_or(0.0);
            let p_emp = empirical_p(baseline, &null_sorted);
            let candidate = p_emp * (m as f64 / (i + 1) as f64);
            let value = if i == m - 1 { candidate } else { previous.min(candidate) };
            adjusted[i] = value;
            previous = value;
        }

        Ok(sorted
            .into_iter()
            .zip(adjusted)
            .filter(|(_, p)| *p <= alpha_f)
            .map(|(s, _)| s.strategy_id)
            .collect())
    }
}

pub struct HolmRomanoWolfStepUp;

impl HolmRomanoWolfStepUp {
    /// Same inputs as [`RomanoWolfStepDown`]; walks ranks forward from `0`
    /// to `m-1` (step-up), accumulating the running maximum adjusted
    /// p-value instead of the running minimum.
    pub fn survivors(strategies: &[BaselineStat], null_distribution: &[Decimal], alpha: Decimal) -> Result<Vec<StrategyId>, CorrectionError> {
        validate(strategies, null_distribution)?;

        let mut sorted = strategies.to_vec();
        sorted.sort_by(|a, b| b.statistic.cmp(&a.statistic));
        let m = sorted.len();

        let mut null_sorted: Vec<f64> = null_distribution.iter().map(|d| d.to_f64().unwrap_or(0.0)).collect();
        null_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let alpha_f = alpha.to_f64().unwrap_or(0.05);
        let mut adjusted = vec![0.0_f64; m];
        let mut previous = 0.0_f64;

        for i in 0..m {
            let baseline = sorted[i].statistic.to_f64().unwrap_or(0.0);
            let p_emp = empirical_p(baseline, &null_sorted);
            let candidate = p_emp * (m - i) as f64;
            let value = if i == 0 { candidate } else { previous.max(candidate) };
            adjusted[i] = value;
            previous = value;
        }

        Ok(sorted
            .into_iter()
            .zip(adjusted)
            .filter(|(_, p)| *p <= alpha_f)
            .map(|(s, _)| s.strategy_id)
            .collect())
    }
}
