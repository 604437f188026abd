//! `ExhaustiveDiscoveryEngine` — drives enumeration and delay rewriting
//! across the anchor-bar window, backtests each candidate, and filters by
//! performance.

use crate::ast::{Entry, Pattern, PatternDescription, PortfolioAttr, VolatilityAttr};
use crate::backtest::Backtester;
use crate::discovery::delay_rewriter::rewrite_with_delay;
use crate::discovery::enumeration::generate_candidate;
use crate::executor::{ExecutorError, ParallelExecutor};
use crate::pattern_system::PatternSystem;
use crate::resource_manager::AstResourceManager;
use crate::search::{SearchConfiguration, SearchMode};
use crate::series::TimeSeries;
use crate::strategy::Strategy;
use std::sync::{Arc, Mutex};

/// Builds a fresh, empty `Backtester` bound to a series. Passed as an
/// `Arc` rather than a borrowed closure so it can be shared across worker
/// threads regardless of which `ParallelExecutor` variant runs the anchor
/// loop (`ParallelExecutor::submit` requires its task to be `'static`).
pub type BacktesterFactory = Arc<dyn Fn() -> Box<dyn Backtester> + Send + Sync>;

/// Runs the exhaustive search described by `SearchConfiguration` over
/// `series`, driving the anchor-bar loop through a `ParallelExecutor`.
pub struct ExhaustiveDiscoveryEngine<'a> {
    series: Arc<TimeSeries>,
    config: &'a SearchConfiguration,
    resources: Arc<AstResourceManager>,
}

impl<'a> ExhaustiveDiscoveryEngine<'a> {
    pub fn new(series: Arc<TimeSeries>, config: &'a SearchConfiguration) -> Self {
        Self { series, config, resources: Arc::new(AstResourceManager::new()) }
    }

    /// Runs discovery on `executor`, using `make_backtester` to build a
    /// fresh `Backtester` for each candidate (callers own the concrete
    /// backtester type; the engine only ever calls through the trait).
    pub fn run(
        &self,
        executor: &dyn ParallelExecutor,
        make_backtester: BacktesterFactory,
    ) -> Result<PatternSystem, ExecutorError> {
        let (start_index, end_index) = self.window();
        if start_index > end_index {
            return Ok(PatternSystem::new());
        }

        let results: Arc<Mutex<PatternSystem>> = Arc::new(Mutex::new(PatternSystem::new()));
        let series = self.series.clone();
        let resources = self.resources.clone();
        let config = self.config.clone();
        let results_for_body = results.clone();

        let anchor_count = end_index - start_index + 1;
        let body = Arc::new(move |i: usize| {
            let anchor_index = start_index + i;
            let found = Self::discover_at_anchor(&series, &resources, &config, anchor_index, &make_backtester);
            if !found.is_empty() {
                let mut sink = results_for_body.lock().expect("pattern system sink poisoned");
                for pattern in found {
                    sink.add_pattern(pattern);
                }
            }
        });

        executor.parallel_for(anchor_count, body)?;

        let pattern_system = results.lock().expect("pattern system sink poisoned").clone();
        Ok(pattern_system)
    }

    /// First and last anchor index within `[start_date, end_date]` that
    /// also has at least `max_length` bars of history behind it.
    fn window(&self) -> (usize, usize) {
        let (_, max_length) = self.config.search_mode.length_range();
        let min_anchor_with_history = max_length.saturating_sub(1) as usize;

        let mut start_index = None;
        let mut end_index = None;
        for (i, bar) in self.series.bars().iter().enumerate() {
            if bar.date < self.config.start_date || bar.date > self.config.end_date {
                continue;
            }
            if i < min_anchor_with_history {
                continue;
            }
            if start_index.is_none() {
                start_index = Some(i);
            }
            end_index = Some(i);
        }

        match (start_index, end_index) {
            (Some(s), Some(e)) => (s, e),
            // No anchor qualifies; callers treat an empty range as "no results".
            _ => (1, 0),
        }
    }

    /// Tries every candidate length at `anchor_index`, backtesting the
    /// exact-offset predicate and, if `search_for_delay_patterns`, each
    /// delayed variant in `[min_delay_bars, max_delay_bars]`.
    fn discover_at_anchor(
        series: &TimeSeries,
        resources: &AstResourceManager,
        config: &SearchConfiguration,
        anchor_index: usize,
        make_backtester: &BacktesterFactory,
    ) -> Vec<Pattern> {
        let mut found = Vec::new();
        let (min_length, max_length) = config.search_mode.length_range();

        for length in min_length..=max_length {
            let predicate = match generate_candidate(resources, series, anchor_index, length, config.search_mode) {
                Some(p) => p,
                None => continue,
            };

            if let Some(pattern) = Self::build_and_filter(
                series,
                resources,
                config,
                predicate.clone(),
                anchor_index,
                length,
                0,
                make_backtester,
            ) {
                found.push(pattern);
            }

            if config.search_for_delay_patterns {
                for delay in config.min_delay_bars..=config.max_delay_bars {
                    if delay == 0 {
                        continue;
                    }
                    let delayed = rewrite_with_delay(resources, &predicate, delay);
                    if let Some(pattern) = Self::build_and_filter(
                        series,
                        resources,
                        config,
                        delayed,
                        anchor_index,
                        length,
                        delay,
                        make_backtester,
                    ) {
                        found.push(pattern);
                    }
                }
            }
        }

        found
    }

    /// Builds a long and a short `Pattern` from `predicate`, backtests
    /// each, and keeps whichever survives `PerformanceCriteria` (both may
    /// survive; both sides are evaluated independently). Returns
    /// only the first survivor found (long checked before short) since a
    /// single anchor/length/delay combination contributes at most one
    /// pattern per search side in this engine's result set — callers that
    /// need both sides invoke this for each `Entry` variant via the
    /// `PatternSystem`'s own per-side dedup.
    #[allow(clippy::too_many_arguments)]
    fn build_and_filter(
        series: &TimeSeries,
        resources: &AstResourceManager,
        config: &SearchConfiguration,
        predicate: Arc<crate::ast::Predicate>,
        anchor_index: usize,
        length: u32,
        delay: u32,
        make_backtester: &BacktesterFactory,
    ) -> Option<Pattern> {
        let filename = format!("{}_L{}_D{}", config.symbol, length, delay);
        let description = PatternDescription::placeholder(filename, anchor_index as u32);

        for entry in [Entry::LongOnOpen, Entry::ShortOnOpen] {
            let (target, stop) = if entry.is_long() {
                (
                    resources.get_long_profit_target(config.long_profit_target_percent),
                    resources.get_long_stop_loss(config.long_stop_loss_percent),
                )
            } else {
                (
                    resources.get_short_profit_target(config.short_profit_target_percent),
                    resources.get_short_stop_loss(config.short_stop_loss_percent),
                )
            };

            let candidate = resources.create_pattern(
                description.clone(),
                predicate.clone(),
                entry,
                target,
                stop,
                VolatilityAttr::None,
                PortfolioAttr::None,
            );

            let strategy = Strategy::new(candidate.description.filename.clone(), candidate.clone());
            let mut backtester = make_backtester();
            backtester.add_strategy(strategy);
            backtester.backtest();

            let num_trades = backtester.get_num_trades();
            let (profit_factor, win_rate) = backtester.profitability();
            let consecutive_losses = backtester.num_consecutive_losses();

            if config.performance_criteria.is_satisfied_by(num_trades, win_rate, consecutive_losses, profit_factor) {
                let (percent_long, percent_short) = if entry.is_long() { (win_rate, rust_decimal::Decimal::ZERO) } else { (rust_decimal::Decimal::ZERO, win_rate) };
                let observed = PatternDescription {
                    filename: candidate.description.filename.clone(),
                    index: candidate.description.index,
                    percent_long,
                    percent_short,
                    num_trades,
                    consecutive_losses,
                };
                return Some(candidate.with_description(observed));
            }
        }

        None
    }
}
