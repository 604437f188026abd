//! `SimplePalBacktester` — minimal reference implementation of
//! `Backtester`, specialized to PAL-style entry/target/stop semantics.
//! Not a production backtester: no slippage, commission, or sizing model.

use super::{Backtester, ClosedTrade};
use crate::ast::Entry;
use crate::eval::predicate_is_true;
use crate::series::TimeSeries;
use crate::strategy::Strategy;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    entry_index: usize,
    entry_price: Decimal,
    is_long: bool,
}

pub struct SimplePalBacktester {
    series: Arc<TimeSeries>,
    start_index: usize,
    end_index: usize,
    strategy: Option<Strategy>,
    trades: Vec<ClosedTrade>,
}

impl SimplePalBacktester {
    pub fn new(series: Arc<TimeSeries>, start_index: usize, end_index: usize) -> Self {
        Self { series, start_index, end_index, strategy: None, trades: Vec::new() }
    }

    fn exit_prices(entry_price: Decimal, target_percent: Decimal, stop_percent: Decimal, is_long: bool) -> (Decimal, Decimal) {
        let hundred = Decimal::from(100);
        if is_long {
            let target = entry_price * (Decimal::ONE + target_percent / hundred);
            let stop = entry_price * (Decimal::ONE - stop_percent / hundred);
            (target, stop)
        } else {
            let target = entry_price * (Decimal::ONE - target_percent / hundred);
            let stop = entry_price * (Decimal::ONE + stop_percent / hundred);
            (target, stop)
        }
    }
}

impl Backtester for SimplePalBacktester {
    fn add_strategy(&mut self, strategy: Strategy) {
        self.strategy = Some(strategy);
    }

    fn clone_empty(&self) -> Box<dyn Backtester> {
        Box::new(SimplePalBacktester::new(self.series.clone(), self.start_index, self.end_index))
    }

    fn clone_with_series(&self, series: Arc<TimeSeries>) -> Box<dyn Backtester> {
        let mut clone = SimplePalBacktester::new(series, self.start_index, self.end_index);
        if let Some(strategy) = &self.strategy {
            clone.add_strategy(strategy.clone());
        }
        Box::new(clone)
    }

    fn backtest(&mut self) {
        let strategy = match &self.strategy {
            Some(s) => s,
            None => return,
        };
        let pattern = &strategy.pattern;
        let is_long = matches!(pattern.entry, Entry::LongOnOpen);
        let target_percent = pattern.profit_target.percent;
        let stop_percent = pattern.stop_loss.percent;
        let bars = self.series.bars();

        let mut position: Option<OpenPosition> = None;
        let mut pending_entry = false;
        self.trades.clear();

        for i in self.start_index..=self.end_index.min(bars.len().saturating_sub(1)) {
            let bar = &bars[i];

            // 1. process pending exit of the currently open position first.
            if let Some(pos) = position {
                let (target_price, stop_price) = Self::exit_prices(pos.entry_price, target_percent, stop_percent, pos.is_long);
                let exit_price = if pos.is_long {
                    let stop_hit = bar.low <= stop_price;
                    let target_hit = bar.high >= target_price;
                    match (stop_hit, target_hit) {
                        (true, _) => Some(stop_price), // worst-case ordering on ambiguity
                        (false, true) => Some(target_price),
                        (false, false) => None,
                    }
                } else {
                    let stop_hit = bar.high >= stop_price;
                    let target_hit = bar.low <= target_price;
                    match (stop_hit, target_hit) {
                        (true, _) => Some(stop_price),
                        (false, true) => Some(target_price),
                        (false, false) => None,
                    }
                };

                if let Some(exit_price) = exit_price {
                    let pnl_percent = if pos.is_long {
                        (exit_price - pos.entry_price) / pos.entry_price * Decimal::from(100)
                    } else {
                        (pos.entry_price - exit_price) / pos.entry_price * Decimal::from(100)
                    };
                    self.trades.push(ClosedTrade { entry_index: pos.entry_index, exit_index: i, pnl_percent });
                    position = None;
                }
            }

            // 2. process pending entry (queued from the previous bar's
            //    signal), applied at this bar's open — only if the
            //    position slot is free, which may have just been freed by
            //    the exit processed above (exit-before-entry rule).
            if position.is_none() && pending_entry {
                position = Some(OpenPosition { entry_index: i, entry_price: bar.open, is_long });
            }
            pending_entry = false;

            // 3. evaluate the signal at this bar to queue the next entry,
            //    only while flat.
            if position.is_none() && i + 1 <= self.end_index && i + 1 < bars.len() {
                if let Some(true) = predicate_is_true(&self.series, i, &pattern.predicate) {
                    pending_entry = true;
                }
            }
        }
    }

    fn closed_position_history_num_positions(&self) -> u32 {
        self.trades.len() as u32
    }

    fn profitability(&self) -> (Decimal, Decimal) {
        if self.trades.is_empty() {
            return (Decimal::ZERO, Decimal::ZERO);
        }
        let winners: Vec<&ClosedTrade> = self.trades.iter().filter(|t| t.is_winner()).collect();
        let losers: Vec<&ClosedTrade> = self.trades.iter().filter(|t| !t.is_winner()).collect();

        let gross_profit: Decimal = winners.iter().map(|t| t.pnl_percent).sum();
        let gross_loss: Decimal = losers.iter().map(|t| t.pnl_percent.abs()).sum();

        let profit_factor = if gross_loss == Decimal::ZERO {
            if gross_profit > Decimal::ZERO {
                Decimal::from(9999)
            } else {
                Decimal::ZERO
            }
        } else {
            gross_profit / gross_loss
        };

        let win_rate = Decimal::from(winners.len() as u32) / Decimal::from(self.trades.len() as u32) * Decimal::from(100);
        (profit_factor, win_rate)
    }

    fn num_consecutive_losses(&self) -> u32 {
        let mut max_run = 0u32;
        let mut current = 0u32;
        for trade in &self.trades {
            if trade.is_winner() {
                current = 0;
            } else {
                current += 1;
                max_run = max_run.max(current);
            }
        }
        max_run
    }

    fn get_num_trades(&self) -> u32 {
        self.trades.len() as u32
    }

    fn get_num_bars_in_trades(&self) -> u32 {
        self.trades.iter().map(|t| t.bars_held() as u32).sum()
    }

    fn closed_trades(&self) -> &[ClosedTrade] {
        &self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{PatternDescription, Pattern, PortfolioAttr, ProfitTarget, Side, StopLoss, VolatilityAttr};
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
            volume: "10000".parse().unwrap(),
        }
    }

    fn close_gt_prev_close_long_pattern(rm: &AstResourceManager) -> Pattern {
        let c0 = rm.get_price_close(0);
        let c1 = rm.get_price_close(1);
        let predicate = rm.compare(c0, c1);
        rm.create_pattern(
            PatternDescription::placeholder("TEST_L2_D0", 0),
            predicate,
            crate::ast::Entry::LongOnOpen,
            ProfitTarget::new(Side::Long, Decimal::from(4)),
            StopLoss::new(Side::Long, Decimal::from(2)),
            VolatilityAttr::None,
            PortfolioAttr::None,
        )
    }

    #[test]
    fn hits_profit_target_end_to_end() {
        let rm = AstResourceManager::new();
        let series = TimeSeries::new(vec![
            bar("2023-01-02", "98", "101", "97", "100"),       // history for the signal check
            bar("2023-01-03", "100", "105", "99", "104"),      // signal bar: close(104) > prev close(100)
            bar("2023-01-04", "104.5", "106", "104", "105.5"), // entry bar (open=104.5)
            bar("2023-01-05", "105.6", "110", "105", "109"),   // profit target hit: 104.5*1.04=108.68 <= high 110
        ]);
        let pattern = close_gt_prev_close_long_pattern(&rm);
        let strategy = Strategy::new("test", pattern);
        let mut bt = SimplePalBacktester::new(Arc::new(series), 0, 3);
        bt.add_strategy(strategy);
        bt.backtest();
        assert_eq!(bt.get_num_trades(), 1);
        let (profit_factor, win_rate) = bt.profitability();
        assert!(profit_factor > Decimal::ZERO);
        assert_eq!(win_rate, Decimal::from(100));
    }
}
