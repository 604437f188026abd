//! `DelayRewriter` — shifts every bar offset in a predicate by a fixed
//! delay, rebuilding through the resource manager. See
//! grounded on `PatternDiscoveryTask.h`'s local `AstOffsetShifter`.

use crate::ast::Predicate;
use crate::resource_manager::AstResourceManager;
use std::sync::Arc;

/// Rewrites `predicate` with every `PriceBarRef(component, offset)`
/// replaced by `PriceBarRef(component, offset + delay)`. Does not mutate
/// `predicate`; returns a freshly (re-)interned tree of the same shape.
pub fn rewrite_with_delay(rm: &AstResourceManager, predicate: &Predicate, delay: u32) -> Arc<Predicate> {
    match predicate {
        Predicate::Compare { lhs, rhs, .. } => {
            let lhs = rm.get_price_component(lhs.component, lhs.offset + delay);
            let rhs = rm.get_price_component(rhs.component, rhs.offset + delay);
            rm.compare(lhs, rhs)
        }
        Predicate::And { lhs, rhs, .. } => {
            let lhs = rewrite_with_delay(rm, lhs, delay);
            let rhs = rewrite_with_delay(rm, rhs, delay);
            rm.and(lhs, rhs)
        }
    }
}
