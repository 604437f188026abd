//! Policy (a): `UnadjustedSelection` — no correction at all;
//! a strategy survives iff its own p-value clears alpha. Kept as the
//! baseline every other policy is compared against.

use super::container::PValueContainer;
use palvalidator_core::strategy::StrategyId;
use rust_decimal::Decimal;

pub struct UnadjustedSelection;

impl UnadjustedSelection {
    pub fn survivors(container: &PValueContainer, alpha: Decimal) -> Vec<StrategyId> {
        container
            .sorted_ascending()
            .into_iter()
            .filter(|entry| entry.p_value <= alpha)
            .map(|entry| entry.strategy_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::container::Family;
    use palvalidator_core::ast::{Entry as PatternEntry, PatternDescription, PortfolioAttr, ProfitTarget, Side, StopLoss, VolatilityAttr};
    use palvalidator_core::resource_manager::AstResourceManager;
    use palvalidator_core::strategy::Strategy;

    fn id(seed: u32) -> StrategyId {
        let rm = AstResourceManager::new();
        let a = rm.get_price_close(0);
        let b = rm.get_price_close(seed + 1);
        let predicate = rm.compare(a, b);
        let pattern = rm.create_pattern(
            PatternDescription::placeholder("X", seed),
            predicate,
            PatternEntry::LongOnOpen,
            ProfitTarget::new(Side::Long, Decimal::from(4)),
            StopLoss::new(Side::Long, Decimal::from(2)),
            VolatilityAttr::None,
            PortfolioAttr::None,
        );
        Strategy::new("s", pattern).id
    }

    #[test]
    fn survives_iff_at_or_below_alpha() {
        let mut container = PValueContainer::new();
        let below = id(1);
        let at = id(2);
        let above = id(3);
        container.add(below, Decimal::from_str_exact("0.01").unwrap(), Family::Long);
        container.add(at, Decimal::from_str_exact("0.05").unwrap(), Family::Long);
        container.add(above, Decimal::from_str_exact("0.10").unwrap(), Family::Long);

        let survivors = UnadjustedSelection::survivors(&container, Decimal::from_str_exact("0.05").unwrap());
        assert_eq!(survivors.len(), 2);
        assert!(survivors.contains(&below));
        assert!(survivors.contains(&at));
        assert!(!survivors.contains(&above));
    }

    #[test]
    fn empty_container_yields_no_survivors() {
        let container = PValueContainer::new();
        let survivors = UnadjustedSelection::survivors(&container, Decimal::from_str_exact("0.05").unwrap());
        assert!(survivors.is_empty());
    }
}
