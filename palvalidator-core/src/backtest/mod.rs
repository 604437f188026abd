//! `Backtester` — external interface consumed by discovery and MCPT.

mod simple;

pub use simple::SimplePalBacktester;

use crate::series::TimeSeries;
use crate::strategy::Strategy;
use rust_decimal::Decimal;
use std::sync::Arc;

/// One closed trade, kept only for diagnostics/statistics collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub pnl_percent: Decimal,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.pnl_percent > Decimal::ZERO
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index.saturating_sub(self.entry_index)
    }
}

/// Minimal contract consumed by discovery and MCPT.
///
/// Exit-before-entry rule: an implementation's `backtest()` must process
/// pending exits before new entries on any given bar, so the same bar can
/// both close a trade and open a new one.
pub trait Backtester: Send {
    fn add_strategy(&mut self, strategy: Strategy);

    /// A fresh, empty backtester bound to the same series/date range, with
    /// no strategies and no trade history.
    fn clone_empty(&self) -> Box<dyn Backtester>;

    /// A fresh, empty backtester over the same date range but rebound to
    /// `series` — used by Monte Carlo permutation testing to rerun the same
    /// strategy over a synthetic series.
    fn clone_with_series(&self, series: Arc<TimeSeries>) -> Box<dyn Backtester>;

    fn backtest(&mut self);

    fn closed_position_history_num_positions(&self) -> u32;

    /// `(profit_factor, win_rate_percent)`.
    fn profitability(&self) -> (Decimal, Decimal);

    fn num_consecutive_losses(&self) -> u32;

    fn get_num_trades(&self) -> u32;

    fn get_num_bars_in_trades(&self) -> u32;

    /// Individual trade results, for statistics that need more than the
    /// profit-factor/win-rate summary (e.g. payoff-ratio estimation).
    fn closed_trades(&self) -> &[ClosedTrade];
}
