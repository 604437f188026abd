//! `Predicate` — conjunctions of strict-greater comparisons between
//! `PriceBarRef`s.

use super::bar_ref::PriceBarRef;
use std::sync::Arc;

/// A node in the predicate tree. Nodes are immutable once built and are
/// shared (via `Arc`) across patterns that reuse the same sub-tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `lhs > rhs`.
    Compare { lhs: PriceBarRef, rhs: PriceBarRef, hash: u64 },
    /// `lhs AND rhs`.
    And { lhs: Arc<Predicate>, rhs: Arc<Predicate>, hash: u64 },
}

const COMPARE_SEED: u64 = 37;
const COMPARE_MUL: u64 = 71;
const AND_SEED: u64 = 41;
const AND_MUL: u64 = 79;

impl Predicate {
    pub(crate) fn compare(lhs: PriceBarRef, rhs: PriceBarRef) -> Self {
        // Order-sensitive left fold: rhs first, then lhs, so that
        // compare(a, b) and compare(b, a) hash differently.
        let mut hash = COMPARE_SEED;
        hash = COMPARE_MUL.wrapping_mul(hash).wrapping_add(rhs.hash_code());
        hash = COMPARE_MUL.wrapping_mul(hash).wrapping_add(lhs.hash_code());
        Predicate::Compare { lhs, rhs, hash }
    }

    pub(crate) fn and(lhs: Arc<Predicate>, rhs: Arc<Predicate>) -> Self {
        let mut hash = AND_SEED;
        hash = AND_MUL.wrapping_mul(hash).wrapping_add(rhs.hash_code());
        hash = AND_MUL.wrapping_mul(hash).wrapping_add(lhs.hash_code());
        Predicate::And { lhs, rhs, hash }
    }

    pub fn hash_code(&self) -> u64 {
        match self {
            Predicate::Compare { hash, .. } => *hash,
            Predicate::And { hash, .. } => *hash,
        }
    }

    /// Maximum bar offset appearing anywhere in this subtree.
    pub fn max_bars_back(&self) -> u32 {
        match self {
            Predicate::Compare { lhs, rhs, .. } => lhs.offset.max(rhs.offset),
            Predicate::And { lhs, rhs, .. } => lhs.max_bars_back().max(rhs.max_bars_back()),
        }
    }

    /// All `(component, offset)` pairs referenced anywhere in this subtree.
    pub fn offsets(&self) -> Vec<u32> {
        match self {
            Predicate::Compare { lhs, rhs, .. } => vec![lhs.offset, rhs.offset],
            Predicate::And { lhs, rhs, .. } => {
                let mut v = lhs.offsets();
                v.extend(rhs.offsets());
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::bar_ref::PriceComponent;

    #[test]
    fn max_bars_back_over_chain() {
        let c0 = PriceBarRef::new(PriceComponent::Close, 0);
        let c1 = PriceBarRef::new(PriceComponent::Close, 1);
        let c2 = PriceBarRef::new(PriceComponent::Close, 2);
        let p1 = Arc::new(Predicate::compare(c0, c1));
        let p2 = Predicate::compare(c1, c2);
        let combined = Predicate::and(p1, Arc::new(p2));
        assert_eq!(combined.max_bars_back(), 2);
    }

    #[test]
    fn equal_structure_equal_hash() {
        let c0 = PriceBarRef::new(PriceComponent::Open, 0);
        let c1 = PriceBarRef::new(PriceComponent::Open, 1);
        let a = Predicate::compare(c0, c1);
        let b = Predicate::compare(c0, c1);
        assert_eq!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn reversed_operands_hash_differently() {
        let c0 = PriceBarRef::new(PriceComponent::Close, 0);
        let c1 = PriceBarRef::new(PriceComponent::Close, 1);
        let up = Predicate::compare(c0, c1);
        let down = Predicate::compare(c1, c0);
        assert_ne!(up.hash_code(), down.hash_code());
    }
}
