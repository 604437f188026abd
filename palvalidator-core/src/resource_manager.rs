//! `AstResourceManager` — interns every AST node by content hash.

use crate::ast::bar_ref::PriceComponent;
use crate::ast::entry::Entry;
use crate::ast::pattern::{Pattern, PatternDescription, PortfolioAttr, VolatilityAttr};
use crate::ast::predicate::Predicate;
use crate::ast::target_stop::{ProfitTarget, Side, StopLoss};
use crate::ast::PriceBarRef;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Offsets at or below this bound use the preallocated array fast path;
/// above it, a mutex-guarded map is used.
const PREALLOCATION_BOUND: usize = 15;

#[derive(Default)]
struct BarRefTable {
    fast: [Option<PriceBarRef>; PREALLOCATION_BOUND + 1],
    overflow: Mutex<HashMap<u32, PriceBarRef>>,
}

impl BarRefTable {
    fn get(&mut self, component: PriceComponent, offset: u32) -> PriceBarRef {
        if (offset as usize) <= PREALLOCATION_BOUND {
            let idx = offset as usize;
            if let Some(existing) = self.fast[idx] {
                return existing;
            }
            let created = PriceBarRef::new(component, offset);
            self.fast[idx] = Some(created);
            created
        } else {
            let mut guard = self.overflow.lock().expect("bar ref overflow table poisoned");
            *guard.entry(offset).or_insert_with(|| PriceBarRef::new(component, offset))
        }
    }
}

/// Interns every AST node kind. One instance is shared (read-mostly) by an
/// entire discovery run; shared read-only across worker threads.
pub struct AstResourceManager {
    bar_refs: Mutex<HashMap<PriceComponent, BarRefTable>>,
    decimals: Mutex<HashMap<String, Decimal>>,
    profit_targets: Mutex<HashMap<(Side, String), ProfitTarget>>,
    stop_losses: Mutex<HashMap<(Side, String), StopLoss>>,
    predicates: Mutex<HashMap<u64, Arc<Predicate>>>,
}

impl Default for AstResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AstResourceManager {
    pub fn new() -> Self {
        Self {
            bar_refs: Mutex::new(HashMap::new()),
            decimals: Mutex::new(HashMap::new()),
            profit_targets: Mutex::new(HashMap::new()),
            stop_losses: Mutex::new(HashMap::new()),
            predicates: Mutex::new(HashMap::new()),
        }
    }

    fn get_price(&self, component: PriceComponent, offset: u32) -> PriceBarRef {
        let mut tables = self.bar_refs.lock().expect("bar ref table poisoned");
        tables.entry(component).or_default().get(component, offset)
    }

    pub fn get_price_open(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Open, offset)
    }
    pub fn get_price_high(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::High, offset)
    }
    pub fn get_price_low(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Low, offset)
    }
    pub fn get_price_close(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Close, offset)
    }
    pub fn get_price_volume(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Volume, offset)
    }
    pub fn get_price_roc1(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Roc1, offset)
    }
    pub fn get_price_ibs1(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Ibs1, offset)
    }
    pub fn get_price_ibs2(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Ibs2, offset)
    }
    pub fn get_price_ibs3(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Ibs3, offset)
    }
    pub fn get_price_meander(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::Meander, offset)
    }
    pub fn get_price_vchart_low(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::VChartLow, offset)
    }
    pub fn get_price_vchart_high(&self, offset: u32) -> PriceBarRef {
        self.get_price(PriceComponent::VChartHigh, offset)
    }

    /// Generic lookup by component, used by enumeration where the
    /// component is only known at runtime.
    pub fn get_price_component(&self, component: PriceComponent, offset: u32) -> PriceBarRef {
        self.get_price(component, offset)
    }

    pub fn get_decimal(&self, value: Decimal) -> Decimal {
        let key = value.normalize().to_string();
        let mut table = self.decimals.lock().expect("decimal table poisoned");
        *table.entry(key).or_insert(value)
    }

    pub fn get_long_profit_target(&self, percent: Decimal) -> ProfitTarget {
        self.get_profit_target(Side::Long, percent)
    }
    pub fn get_short_profit_target(&self, percent: Decimal) -> ProfitTarget {
        self.get_profit_target(Side::Short, percent)
    }

    fn get_profit_target(&self, side: Side, percent: Decimal) -> ProfitTarget {
        let key = (side, percent.normalize().to_string());
        let mut table = self.profit_targets.lock().expect("profit target table poisoned");
        *table.entry(key).or_insert_with(|| ProfitTarget::new(side, percent))
    }

    pub fn get_long_stop_loss(&self, percent: Decimal) -> StopLoss {
        self.get_stop_loss(Side::Long, percent)
    }
    pub fn get_short_stop_loss(&self, percent: Decimal) -> StopLoss {
        self.get_stop_loss(Side::Short, percent)
    }

    fn get_stop_loss(&self, side: Side, percent: Decimal) -> StopLoss {
        let key = (side, percent.normalize().to_string());
        let mut table = self.stop_losses.lock().expect("stop loss table poisoned");
        *table.entry(key).or_insert_with(|| StopLoss::new(side, percent))
    }

    pub fn get_long_entry_on_open(&self) -> Entry {
        Entry::LongOnOpen
    }
    pub fn get_short_entry_on_open(&self) -> Entry {
        Entry::ShortOnOpen
    }

    /// Interns a `Compare` predicate node, deduping structurally-identical
    /// comparisons so sub-trees can be shared.
    pub fn compare(&self, lhs: PriceBarRef, rhs: PriceBarRef) -> Arc<Predicate> {
        let node = Predicate::compare(lhs, rhs);
        let hash = node.hash_code();
        let mut table = self.predicates.lock().expect("predicate table poisoned");
        table.entry(hash).or_insert_with(|| Arc::new(node)).clone()
    }

    /// Interns an `And` predicate node over two already-interned operands.
    pub fn and(&self, lhs: Arc<Predicate>, rhs: Arc<Predicate>) -> Arc<Predicate> {
        let node = Predicate::and(lhs, rhs);
        let hash = node.hash_code();
        let mut table = self.predicates.lock().expect("predicate table poisoned");
        table.entry(hash).or_insert_with(|| Arc::new(node)).clone()
    }

    /// Builds a `Pattern` value. Computes `max_bars_back` and
    /// `payoff_ratio`; does not store the pattern.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pattern(
        &self,
        description: PatternDescription,
        predicate: Arc<Predicate>,
        entry: Entry,
        target: ProfitTarget,
        stop: StopLoss,
        volatility: VolatilityAttr,
        portfolio: PortfolioAttr,
    ) -> Pattern {
        Pattern::new(predicate, entry, target, stop, description, volatility, portfolio)
    }
}
