//! `PatternDescription` and `Pattern`.

use super::entry::Entry;
use super::predicate::Predicate;
use super::target_stop::{ProfitTarget, StopLoss};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Observed-performance metadata attached to a pattern. Constructed as a
/// placeholder at discovery time, then replaced with the final observed
/// values once backtesting confirms the candidate survives.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDescription {
    pub filename: String,
    pub index: u32,
    pub percent_long: Decimal,
    pub percent_short: Decimal,
    pub num_trades: u32,
    pub consecutive_losses: u32,
}

impl PatternDescription {
    /// A placeholder description, attached before the candidate is
    /// backtested. Mirrors `PricePatternFactory::createLongPalPattern`'s
    /// zeroed-out `PatternDescription`.
    pub fn placeholder(filename: impl Into<String>, index: u32) -> Self {
        Self {
            filename: filename.into(),
            index,
            percent_long: Decimal::ZERO,
            percent_short: Decimal::ZERO,
            num_trades: 0,
            consecutive_losses: 0,
        }
    }

    pub fn hash_code(&self) -> u64 {
        blake3::hash(self.filename.as_bytes())
            .as_bytes()
            .iter()
            .take(8)
            .fold(0u64, |acc, b| (acc << 8) | *b as u64)
            .wrapping_add(self.index as u64)
    }
}

/// How volatile the market conditions a pattern was discovered under were
/// judged to be. Carried through from discovery but not otherwise acted on
/// by this implementation (external consumers, e.g. a code generator, may
/// use it to bucket patterns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityAttr {
    None,
    Low,
    Normal,
    High,
    VeryHigh,
}

/// Which side of a portfolio a pattern is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioAttr {
    None,
    FilterLong,
    FilterShort,
}

/// A fully-constructed candidate: predicate plus its entry/target/stop and
/// description. Hashable, comparable by hash.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub predicate: Arc<Predicate>,
    pub entry: Entry,
    pub profit_target: ProfitTarget,
    pub stop_loss: StopLoss,
    pub description: PatternDescription,
    pub volatility: VolatilityAttr,
    pub portfolio: PortfolioAttr,
    pub max_bars_back: u32,
    pub payoff_ratio: Decimal,
    hash: u64,
}

const PATTERN_SEED: u64 = 181;
const PATTERN_MUL: u64 = 31;

impl Pattern {
    pub(crate) fn new(
        predicate: Arc<Predicate>,
        entry: Entry,
        profit_target: ProfitTarget,
        stop_loss: StopLoss,
        description: PatternDescription,
        volatility: VolatilityAttr,
        portfolio: PortfolioAttr,
    ) -> Self {
        let max_bars_back = predicate.max_bars_back();
        let payoff_ratio = profit_target.percent / stop_loss.percent;

        let base_filename_hash = blake3::hash(description.filename.as_bytes())
            .as_bytes()
            .iter()
            .take(8)
            .fold(0u64, |acc, b| (acc << 8) | *b as u64);
        let mut hash = PATTERN_SEED;
        for component in [
            base_filename_hash,
            predicate.hash_code(),
            description.hash_code(),
            entry.hash_code(),
            profit_target.hash_code(),
            stop_loss.hash_code(),
        ] {
            hash = hash.wrapping_mul(PATTERN_MUL).wrapping_add(component);
        }

        Self {
            predicate,
            entry,
            profit_target,
            stop_loss,
            description,
            volatility,
            portfolio,
            max_bars_back,
            payoff_ratio,
            hash,
        }
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    /// A new `Pattern` identical in every field except its `description`,
    /// used by discovery to replace the placeholder with observed
    /// performance. The hash is recomputed since `PatternDescription`
    /// participates in it.
    pub fn with_description(&self, description: PatternDescription) -> Self {
        Self::new(
            self.predicate.clone(),
            self.entry,
            self.profit_target,
            self.stop_loss,
            description,
            self.volatility,
            self.portfolio,
        )
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}
impl Eq for Pattern {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::bar_ref::{PriceBarRef, PriceComponent};

    fn sample(percent_target: &str, percent_stop: &str) -> Pattern {
        let lhs = PriceBarRef::new(PriceComponent::Close, 0);
        let rhs = PriceBarRef::new(PriceComponent::Close, 1);
        let predicate = Arc::new(Predicate::compare(lhs, rhs));
        Pattern::new(
            predicate,
            Entry::LongOnOpen,
            ProfitTarget::new(super::super::target_stop::Side::Long, percent_target.parse().unwrap()),
            StopLoss::new(super::super::target_stop::Side::Long, percent_stop.parse().unwrap()),
            PatternDescription::placeholder("SPY_L2_D0", 0),
            VolatilityAttr::None,
            PortfolioAttr::None,
        )
    }

    #[test]
    fn payoff_ratio_is_target_over_stop() {
        let p = sample("4", "2");
        assert_eq!(p.payoff_ratio, Decimal::from(2));
    }

    #[test]
    fn max_bars_back_matches_predicate() {
        let p = sample("4", "2");
        assert_eq!(p.max_bars_back, 1);
    }

    #[test]
    fn changing_any_field_changes_hash() {
        let a = sample("4", "2");
        let b = sample("5", "2");
        assert_ne!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn same_content_same_hash() {
        let a = sample("4", "2");
        let b = sample("4", "2");
        assert_eq!(a.hash_code(), b.hash_code());
        assert_eq!(a, b);
    }
}
