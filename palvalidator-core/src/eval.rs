//! Evaluates a predicate tree against a concrete anchor bar in a series.
//! Used by the reference backtester to detect when a discovered pattern
//! recurs; discovery itself never needs this (a freshly-built candidate is
//! true at its own anchor by construction).

use crate::ast::Predicate;
use crate::discovery::enumeration::component_value;
use crate::series::TimeSeries;

/// `None` if the predicate reaches back further than available history.
pub fn predicate_is_true(series: &TimeSeries, anchor_index: usize, predicate: &Predicate) -> Option<bool> {
    match predicate {
        Predicate::Compare { lhs, rhs, .. } => {
            let lhs_bar = series.bar_before(anchor_index, lhs.offset as usize)?;
            let rhs_bar = series.bar_before(anchor_index, rhs.offset as usize)?;
            let lhs_value = component_value(lhs_bar, lhs.component)?;
            let rhs_value = component_value(rhs_bar, rhs.component)?;
            Some(lhs_value > rhs_value)
        }
        Predicate::And { lhs, rhs, .. } => {
            let lhs_true = predicate_is_true(series, anchor_index, lhs)?;
            if !lhs_true {
                return Some(false);
            }
            predicate_is_true(series, anchor_index, rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::bar_ref::PriceComponent;
    use crate::ast::PriceBarRef;
    use crate::resource_manager::AstResourceManager;
    use crate::series::Bar;
    use chrono::NaiveDate;

    fn bar(date: &str, o: &str, h: &str, l: &str, c: &str) -> Bar {
        Bar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: o.parse().unwrap(),
            high: h.parse().unwrap(),
            low: l.parse().unwrap(),
            close: c.parse().unwrap(),
            volume: "1000".parse().unwrap(),
        }
    }

    #[test]
    fn evaluates_true_when_constructed_from_this_anchor() {
        let rm = AstResourceManager::new();
        let series = TimeSeries::new(vec![
            bar("2023-01-01", "90", "95", "89", "94"),
            bar("2023-01-02", "100", "110", "99", "105"),
        ]);
        let close0 = PriceBarRef::new(PriceComponent::Close, 0);
        let close1 = PriceBarRef::new(PriceComponent::Close, 1);
        let predicate = rm.compare(close0, close1);
        assert_eq!(predicate_is_true(&series, 1, &predicate), Some(true));
    }

    #[test]
    fn returns_false_when_condition_fails() {
        let rm = AstResourceManager::new();
        let series = TimeSeries::new(vec![
            bar("2023-01-01", "100", "105", "99", "104"),
            bar("2023-01-02", "90", "95", "89", "94"),
        ]);
        let close0 = PriceBarRef::new(PriceComponent::Close, 0);
        let close1 = PriceBarRef::new(PriceComponent::Close, 1);
        let predicate = rm.compare(close0, close1);
        assert_eq!(predicate_is_true(&series, 1, &predicate), Some(false));
    }

    #[test]
    fn none_on_insufficient_history() {
        let rm = AstResourceManager::new();
        let series = TimeSeries::new(vec![bar("2023-01-01", "100", "105", "99", "104")]);
        let close0 = PriceBarRef::new(PriceComponent::Close, 0);
        let close1 = PriceBarRef::new(PriceComponent::Close, 1);
        let predicate = rm.compare(close0, close1);
        assert_eq!(predicate_is_true(&series, 0, &predicate), None);
    }
}
