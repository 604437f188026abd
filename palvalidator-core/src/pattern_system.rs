//! `PatternSystem` — the discovery aggregator.

use crate::ast::{Entry, Pattern};
use std::collections::BTreeMap;

/// Accumulates discovered patterns, deduping by hash with the
/// `SmallestVolatility` tiebreaker. Two ordered maps (longs/shorts),
/// iteration is by ascending hash for determinism.
#[derive(Debug, Default, Clone)]
pub struct PatternSystem {
    longs: BTreeMap<u64, Pattern>,
    shorts: BTreeMap<u64, Pattern>,
}

/// Between two patterns with an equal hash: smaller stop wins; if tied,
/// smaller target wins; if still tied, the first one seen wins.
fn tiebreak(existing: &Pattern, candidate: &Pattern) -> bool {
    if candidate.stop_loss.percent != existing.stop_loss.percent {
        return candidate.stop_loss.percent < existing.stop_loss.percent;
    }
    if candidate.profit_target.percent != existing.profit_target.percent {
        return candidate.profit_target.percent < existing.profit_target.percent;
    }
    false
}

impl PatternSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `pattern` to the longs or shorts map by its entry direction.
    pub fn add_pattern(&mut self, pattern: Pattern) {
        let map = if pattern.entry == Entry::LongOnOpen { &mut self.longs } else { &mut self.shorts };
        let hash = pattern.hash_code();
        match map.get(&hash) {
            Some(existing) if tiebreak(existing, &pattern) => {
                map.insert(hash, pattern);
            }
            Some(_) => {}
            None => {
                map.insert(hash, pattern);
            }
        }
    }

    pub fn num_long_patterns(&self) -> usize {
        self.longs.len()
    }

    pub fn num_short_patterns(&self) -> usize {
        self.shorts.len()
    }

    pub fn len(&self) -> usize {
        self.longs.len() + self.shorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates all patterns (longs then shorts), each side in ascending
    /// hash order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.longs.values().chain(self.shorts.values())
    }

    pub fn long_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.longs.values()
    }

    pub fn short_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.shorts.values()
    }

    /// Merges `other` into `self`, applying the tiebreaker across sides.
    pub fn merge(&mut self, other: PatternSystem) {
        for (_, pattern) in other.longs {
            self.add_pattern(pattern);
        }
        for (_, pattern) in other.shorts {
            self.add_pattern(pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{PatternDescription, PortfolioAttr, ProfitTarget, Side, StopLoss, VolatilityAttr};
    use crate::resource_manager::AstResourceManager;
    use std::sync::Arc;

    fn pattern(rm: &AstResourceManager, target: &str, stop: &str) -> Pattern {
        let a = rm.get_price_close(0);
        let b = rm.get_price_close(1);
        let predicate = Arc::new(crate::ast::Predicate::compare(a, b));
        rm.create_pattern(
            PatternDescription::placeholder("SPY_L2_D0", 0),
            predicate,
            Entry::LongOnOpen,
            ProfitTarget::new(Side::Long, target.parse().unwrap()),
            StopLoss::new(Side::Long, stop.parse().unwrap()),
            VolatilityAttr::None,
            PortfolioAttr::None,
        )
    }

    #[test]
    fn dedupes_by_hash() {
        let rm = AstResourceManager::new();
        let mut system = PatternSystem::new();
        system.add_pattern(pattern(&rm, "4", "2"));
        system.add_pattern(pattern(&rm, "4", "2"));
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn routes_by_entry_direction() {
        let rm = AstResourceManager::new();
        let mut system = PatternSystem::new();
        system.add_pattern(pattern(&rm, "4", "2"));
        assert_eq!(system.num_long_patterns(), 1);
        assert_eq!(system.num_short_patterns(), 0);
    }

    #[test]
    fn iteration_order_is_by_hash() {
        let rm = AstResourceManager::new();
        let mut system = PatternSystem::new();
        system.add_pattern(pattern(&rm, "4", "2"));
        system.add_pattern(pattern(&rm, "6", "3"));
        let hashes: Vec<u64> = system.iter().map(|p| p.hash_code()).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);
    }
}
