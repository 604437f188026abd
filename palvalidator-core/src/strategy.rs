//! `Strategy` and its globally-unique instance id.
//!
//! `StrategyId` follows a `hash_id!`-macro idiom
//! (`trendlab-core::domain::ids`): a 32-byte BLAKE3 digest newtype with hex
//! `Display` and a truncated hex `Debug`.

use crate::ast::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static STRATEGY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Globally unique per-instance identifier; distinct from a pattern's
/// content hash, which is deterministic and shared across equivalent
/// patterns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyId([u8; 32]);

impl StrategyId {
    /// Combines a process-unique sequence number with the pattern's
    /// content hash so that two `Strategy` instances over the same pattern
    /// still get distinct ids.
    fn fresh(pattern_hash: u64) -> Self {
        let seq = STRATEGY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&seq.to_le_bytes());
        hasher.update(&pattern_hash.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrategyId({}…)", &self.as_hex()[..16])
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

/// A named strategy built around one discovered `Pattern`, ready to be
/// bound to a backtester. Created per backtest invocation.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub id: StrategyId,
    pub name: String,
    pub pattern: Pattern,
}

impl Strategy {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        let id = StrategyId::fresh(pattern.hash_code());
        Self { id, name: name.into(), pattern }
    }

    pub fn content_hash(&self) -> u64 {
        self.pattern.hash_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::bar_ref::PriceComponent;
    use crate::ast::{Entry, PatternDescription, Predicate, ProfitTarget, Side, StopLoss};
    use std::sync::Arc;

    fn pattern() -> Pattern {
        let lhs = crate::ast::PriceBarRef::new(PriceComponent::Close, 0);
        let rhs = crate::ast::PriceBarRef::new(PriceComponent::Close, 1);
        Pattern::new(
            Arc::new(Predicate::compare(lhs, rhs)),
            Entry::LongOnOpen,
            ProfitTarget::new(Side::Long, "4".parse().unwrap()),
            StopLoss::new(Side::Long, "2".parse().unwrap()),
            PatternDescription::placeholder("SPY_L2_D0", 0),
            crate::ast::VolatilityAttr::None,
            crate::ast::PortfolioAttr::None,
        )
    }

    #[test]
    fn two_strategies_over_same_pattern_get_distinct_ids() {
        let a = Strategy::new("s1", pattern());
        let b = Strategy::new("s2", pattern());
        assert_ne!(a.id, b.id);
        assert_eq!(a.content_hash(), b.content_hash());
    }
}
