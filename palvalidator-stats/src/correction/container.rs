//! `PValueContainer` — the shared sorted-by-p-value container the
//! correction policies are built on. Grounded on the `fdr::FdrFamily`
//! accumulator shape (`add`/`len`/`is_empty`), reused for every policy that
//! consumes `{(p_i, strategy_i)}` rather than each policy reinventing its
//! own storage.

use palvalidator_core::strategy::StrategyId;
use rust_decimal::Decimal;

/// Which side of the book a strategy belongs to, for Adaptive-BH's optional
/// family-partitioning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub strategy_id: StrategyId,
    pub p_value: Decimal,
    pub family: Family,
}

#[derive(Debug, Default, Clone)]
pub struct PValueContainer {
    entries: Vec<Entry>,
}

impl PValueContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, strategy_id: StrategyId, p_value: Decimal, family: Family) {
        self.entries.push(Entry { strategy_id, p_value, family });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, sorted ascending by p-value (ties broken by the order
    /// they were added, for determinism).
    pub fn sorted_ascending(&self) -> Vec<Entry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.p_value.cmp(&b.p_value));
        sorted
    }

    pub fn entries_in(&self, family: Family) -> Vec<Entry> {
        self.entries.iter().copied().filter(|e| e.family == family).collect()
    }
}
