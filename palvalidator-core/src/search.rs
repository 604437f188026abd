//! `SearchConfiguration` and `PerformanceCriteria`.

use crate::ast::PriceComponent;
use crate::error::ConfigError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which components enumeration draws from and how long candidates may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    Unknown,
    Basic,
    Extended,
    Deep,
    CloseOnly,
    HighLowOnly,
    OpenCloseOnly,
    Mixed,
}

impl SearchMode {
    /// `(min_length, max_length)` inclusive, per the length-range table below.
    pub fn length_range(self) -> (u32, u32) {
        match self {
            SearchMode::Unknown | SearchMode::Mixed | SearchMode::Deep => (2, 9),
            SearchMode::Basic => (2, 4),
            SearchMode::Extended => (2, 6),
            SearchMode::CloseOnly => (3, 9),
            SearchMode::HighLowOnly => (3, 9),
            SearchMode::OpenCloseOnly => (3, 9),
        }
    }

    /// Components enabled for this mode, in the declaration order used as
    /// the enumeration tie-break (DESIGN.md Open Question 1).
    pub fn components(self) -> &'static [PriceComponent] {
        use PriceComponent::*;
        match self {
            SearchMode::Unknown | SearchMode::Mixed | SearchMode::Deep | SearchMode::Basic | SearchMode::Extended => {
                &[Open, High, Low, Close]
            }
            SearchMode::CloseOnly => &[Close],
            SearchMode::HighLowOnly => &[High, Low],
            SearchMode::OpenCloseOnly => &[Open, Close],
        }
    }
}

/// Validated performance filter applied to a backtested candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCriteria {
    pub min_profitability: Decimal,
    pub min_trades: u32,
    pub max_consecutive_losers: u32,
    pub min_profit_factor: Decimal,
}

impl PerformanceCriteria {
    pub fn new(
        min_profitability: Decimal,
        min_trades: u32,
        max_consecutive_losers: u32,
        min_profit_factor: Decimal,
    ) -> Result<Self, ConfigError> {
        if min_profitability < Decimal::ZERO || min_profitability > Decimal::from(100) {
            return Err(ConfigError::ProfitabilityOutOfRange(min_profitability.to_string()));
        }
        if min_trades == 0 {
            return Err(ConfigError::MinTradesNotPositive(min_trades));
        }
        if min_profit_factor <= Decimal::ZERO {
            return Err(ConfigError::ProfitFactorNotPositive(min_profit_factor.to_string()));
        }
        Ok(Self { min_profitability, min_trades, max_consecutive_losers, min_profit_factor })
    }

    /// True when a candidate's backtest results clear every filter.
    pub fn is_satisfied_by(
        &self,
        closed_trades: u32,
        profitability_percent: Decimal,
        consecutive_losses: u32,
        profit_factor: Decimal,
    ) -> bool {
        closed_trades >= self.min_trades
            && profitability_percent >= self.min_profitability
            && consecutive_losses <= self.max_consecutive_losers
            && profit_factor >= self.min_profit_factor
    }
}

/// Full configuration for a discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfiguration {
    pub symbol: String,
    pub search_mode: SearchMode,
    pub search_for_delay_patterns: bool,
    pub min_delay_bars: u32,
    pub max_delay_bars: u32,
    pub long_profit_target_percent: Decimal,
    pub long_stop_loss_percent: Decimal,
    pub short_profit_target_percent: Decimal,
    pub short_stop_loss_percent: Decimal,
    pub performance_criteria: PerformanceCriteria,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchConfiguration {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        search_mode: SearchMode,
        search_for_delay_patterns: bool,
        long_profit_target_percent: Decimal,
        long_stop_loss_percent: Decimal,
        short_profit_target_percent: Decimal,
        short_stop_loss_percent: Decimal,
        performance_criteria: PerformanceCriteria,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ConfigError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(ConfigError::NullSecurity);
        }
        if start_date >= end_date {
            return Err(ConfigError::InvertedDateRange { start: start_date.to_string(), end: end_date.to_string() });
        }
        for (label, value) in [
            ("long profit target", long_profit_target_percent),
            ("short profit target", short_profit_target_percent),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveProfitTarget(format!("{label}={value}")));
            }
        }
        for (label, value) in
            [("long stop loss", long_stop_loss_percent), ("short stop loss", short_stop_loss_percent)]
        {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveStopLoss(format!("{label}={value}")));
            }
        }

        // Delay range default: (1,5) enabled, (0,0) disabled.
        let (min_delay_bars, max_delay_bars) = if search_for_delay_patterns { (1, 5) } else { (0, 0) };

        Ok(Self {
            symbol,
            search_mode,
            search_for_delay_patterns,
            min_delay_bars,
            max_delay_bars,
            long_profit_target_percent,
            long_stop_loss_percent,
            short_profit_target_percent,
            short_stop_loss_percent,
            performance_criteria,
            start_date,
            end_date,
        })
    }
}
