//! Stable visitor surface for external consumers (code generators).
//! Default methods are no-ops so an external visitor only overrides what
//! it needs; internal traversal (delay rewriting, max-bars-back, hashing)
//! uses plain recursive `match`, not this trait.

use super::bar_ref::PriceBarRef;
use super::entry::Entry;
use super::pattern::{Pattern, PatternDescription};
use super::predicate::Predicate;
use super::target_stop::{ProfitTarget, StopLoss};

pub trait Visit {
    fn visit_price_bar_ref(&mut self, _node: &PriceBarRef) {}
    fn visit_compare(&mut self, _lhs: &PriceBarRef, _rhs: &PriceBarRef) {}
    fn visit_and(&mut self, _lhs: &Predicate, _rhs: &Predicate) {}
    fn visit_profit_target(&mut self, _node: &ProfitTarget) {}
    fn visit_stop_loss(&mut self, _node: &StopLoss) {}
    fn visit_entry(&mut self, _node: &Entry) {}
    fn visit_description(&mut self, _node: &PatternDescription) {}
    fn visit_pattern(&mut self, _node: &Pattern) {}
}

/// Walks `predicate` in left-then-right order, calling back into `visitor`.
pub fn walk_predicate<V: Visit + ?Sized>(visitor: &mut V, predicate: &Predicate) {
    match predicate {
        Predicate::Compare { lhs, rhs, .. } => {
            visitor.visit_price_bar_ref(lhs);
            visitor.visit_price_bar_ref(rhs);
            visitor.visit_compare(lhs, rhs);
        }
        Predicate::And { lhs, rhs, .. } => {
            walk_predicate(visitor, lhs);
            walk_predicate(visitor, rhs);
            visitor.visit_and(lhs, rhs);
        }
    }
}

/// Walks an entire pattern: predicate, then entry/target/stop/description.
pub fn walk_pattern<V: Visit + ?Sized>(visitor: &mut V, pattern: &Pattern) {
    walk_predicate(visitor, &pattern.predicate);
    visitor.visit_entry(&pattern.entry);
    visitor.visit_profit_target(&pattern.profit_target);
    visitor.visit_stop_loss(&pattern.stop_loss);
    visitor.visit_description(&pattern.description);
    visitor.visit_pattern(pattern);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::bar_ref::PriceComponent;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingVisitor {
        compares: usize,
        ands: usize,
    }

    impl Visit for CountingVisitor {
        fn visit_compare(&mut self, _lhs: &PriceBarRef, _rhs: &PriceBarRef) {
            self.compares += 1;
        }
        fn visit_and(&mut self, _lhs: &Predicate, _rhs: &Predicate) {
            self.ands += 1;
        }
    }

    #[test]
    fn walk_visits_every_node_once() {
        let a = PriceBarRef::new(PriceComponent::Close, 0);
        let b = PriceBarRef::new(PriceComponent::Close, 1);
        let c = PriceBarRef::new(PriceComponent::Close, 2);
        let p1 = Arc::new(Predicate::compare(a, b));
        let p2 = Predicate::compare(b, c);
        let combined = Predicate::and(p1, Arc::new(p2));

        let mut v = CountingVisitor::default();
        walk_predicate(&mut v, &combined);
        assert_eq!(v.compares, 2);
        assert_eq!(v.ands, 1);
    }
}
