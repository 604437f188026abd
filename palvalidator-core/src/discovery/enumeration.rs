//! `EnumerationGenerator` — builds one maximal candidate predicate per
//! (anchor, length).

use crate::ast::bar_ref::PriceComponent;
use crate::ast::Predicate;
use crate::resource_manager::AstResourceManager;
use crate::search::SearchMode;
use crate::series::{Bar, TimeSeries};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::sync::Arc;

pub(crate) fn component_value(bar: &Bar, component: PriceComponent) -> Option<Decimal> {
    match component {
        PriceComponent::Open => Some(bar.open),
        PriceComponent::High => Some(bar.high),
        PriceComponent::Low => Some(bar.low),
        PriceComponent::Close => Some(bar.close),
        PriceComponent::Volume => Some(bar.volume),
        // Derived indicators are legal AST variants but no
        // search mode selects them for enumeration,
        // so no series-derived value is ever needed here.
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Triple {
    value: Decimal,
    component: PriceComponent,
    offset: u32,
}

/// Total order used to sort triples: value descending, then offset
/// ascending, then component declaration order (DESIGN.md Open Question
/// 1). Must be identical between discovery and delay rewrite, which is
/// satisfied here since delay rewrite never re-sorts — it only shifts
/// offsets of an already-built predicate.
fn triple_order(a: &Triple, b: &Triple) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| a.offset.cmp(&b.offset))
        .then_with(|| a.component.cmp(&b.component))
}

/// Builds the candidate predicate for one `(anchor_index, length)` pair, or
/// `None` if history is insufficient or fewer than two triples remain
/// (both the anchor and length loops silently abandon this length, kind
/// `InsufficientHistory`, never surfaced as an error).
pub fn generate_candidate(
    rm: &AstResourceManager,
    series: &TimeSeries,
    anchor_index: usize,
    length: u32,
    mode: SearchMode,
) -> Option<Arc<Predicate>> {
    let mut triples = Vec::with_capacity(length as usize * mode.components().len());

    for offset in 0..length {
        let bar = series.bar_before(anchor_index, offset as usize)?;
        for &component in mode.components() {
            if let Some(value) = component_value(bar, component) {
                triples.push(Triple { value, component, offset });
            }
        }
    }

    if triples.len() < 2 {
        return None;
    }

    triples.sort_by(triple_order);

    let mut iter = triples.into_iter();
    let first = iter.next().unwrap();
    let mut lhs_ref = rm.get_price_component(first.component, first.offset);
    let mut acc: Option<Arc<Predicate>> = None;

    for triple in iter {
        let rhs_ref = rm.get_price_component(triple.component, triple.offset);
        let compare = rm.compare(lhs_ref, rhs_ref);
        acc = Some(match acc {
            None => compare,
            Some(prev) => rm.and(prev, compare),
        });
        lhs_ref = rhs_ref;
    }

    acc
}
