//! OHLCV bar data and the in-memory time series discovery reads from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Bar {
    /// H >= L, H >= O, H >= C, L <= O, L <= C, O > 0, C > 0.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > Decimal::ZERO
            && self.close > Decimal::ZERO
    }
}

/// An ordered sequence of bars for one instrument, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    bars: Vec<Bar>,
}

impl TimeSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Index of the first bar at or after `date`, if any.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.iter().position(|b| b.date == date)
    }

    /// Bar `offset` positions before `anchor_index` (offset 0 = the anchor
    /// itself). `None` if that index would fall before the start of the
    /// series.
    pub fn bar_before(&self, anchor_index: usize, offset: usize) -> Option<&Bar> {
        if offset > anchor_index {
            return None;
        }
        self.bars.get(anchor_index - offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn bar(date: &str, o: &str, h: &str, l: &str, c: &str) -> Bar {
        Bar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: d(o),
            high: d(h),
            low: d(l),
            close: d(c),
            volume: d("1000"),
        }
    }

    #[test]
    fn sane_bar_passes() {
        let b = bar("2023-01-01", "100", "105", "99", "104");
        assert!(b.is_sane());
    }

    #[test]
    fn insane_bar_fails() {
        let b = bar("2023-01-01", "100", "99", "101", "104");
        assert!(!b.is_sane());
    }

    #[test]
    fn bar_before_respects_bounds() {
        let ts = TimeSeries::new(vec![
            bar("2023-01-01", "100", "105", "99", "104"),
            bar("2023-01-02", "104", "108", "103", "107"),
        ]);
        assert_eq!(ts.bar_before(1, 0).unwrap().date.to_string(), "2023-01-02");
        assert_eq!(ts.bar_before(1, 1).unwrap().date.to_string(), "2023-01-01");
        assert!(ts.bar_before(1, 2).is_none());
        assert!(ts.bar_before(0, 1).is_none());
    }
}
