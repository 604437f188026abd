//! End-to-end scenarios over a handcrafted daily series: ten linearly
//! rising bars followed by two signal/entry/profit-target cycles.
//! Exercises discovery, the exit-before-entry rule, the delay sweep, and
//! inline/pooled executor parity together against one fixture.

use chrono::NaiveDate;
use palvalidator_core::backtest::{Backtester, SimplePalBacktester};
use palvalidator_core::discovery::{BacktesterFactory, ExhaustiveDiscoveryEngine};
use palvalidator_core::executor::{FixedPool, Inline};
use palvalidator_core::search::{PerformanceCriteria, SearchConfiguration, SearchMode};
use palvalidator_core::series::{Bar, TimeSeries};
use rust_decimal::Decimal;
use std::sync::Arc;

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

/// Ten linearly rising daily bars (closes 82..100 by 2, H = O+5, L = O-2,
/// O = C-2) followed by six explicitly dated/priced bars covering two
/// signal/entry/exit cycles.
fn canonical_series() -> Arc<TimeSeries> {
    let rising_dates = [
        "2022-12-20", "2022-12-21", "2022-12-22", "2022-12-23", "2022-12-26", "2022-12-27", "2022-12-28",
        "2022-12-29", "2022-12-30", "2023-01-02",
    ];
    let mut bars: Vec<Bar> = rising_dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let close = 82 + 2 * i as i64;
            let open = close - 2;
            let high = open + 5;
            let low = open - 2;
            bar(date, &open.to_string(), &high.to_string(), &low.to_string(), &close.to_string())
        })
        .collect();

    bars.push(bar("2023-01-03", "100", "105", "99", "104"));
    bars.push(bar("2023-01-04", "104.5", "106", "104", "105.5"));
    bars.push(bar("2023-01-05", "105.6", "110", "105", "109"));
    bars.push(bar("2023-01-06", "108", "112", "107", "111"));
    bars.push(bar("2023-01-09", "111.5", "118", "111", "117"));
    bars.push(bar("2023-01-10", "117.1", "125", "117", "124"));

    Arc::new(TimeSeries::new(bars))
}

fn config(mode: SearchMode, search_for_delay_patterns: bool) -> SearchConfiguration {
    SearchConfiguration::new(
        "SPY",
        mode,
        search_for_delay_patterns,
        Decimal::from(4),
        Decimal::from(2),
        Decimal::from(4),
        Decimal::from(2),
        PerformanceCriteria::new(Decimal::ZERO, 1, 99, Decimal::from_str_exact("0.01").unwrap()).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 20).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
    )
    .unwrap()
}

fn factory(series: &Arc<TimeSeries>) -> BacktesterFactory {
    let s = series.clone();
    Arc::new(move || -> Box<dyn Backtester> { Box::new(SimplePalBacktester::new(s.clone(), 0, s.len() - 1)) })
}

/// Scenario 1: discovery in Extended mode (length 2..6) over the full
/// range, anchored at the last bar, produces at least one pattern whose
/// filename carries the `_L`/`_D0` markers and whose max_bars_back sits in
/// [1,5].
#[test]
fn scenario_1_extended_discovery_at_last_bar_anchor() {
    let series = canonical_series();
    let cfg = config(SearchMode::Extended, false);
    let engine = ExhaustiveDiscoveryEngine::new(series.clone(), &cfg);
    let system = engine.run(&Inline, factory(&series)).unwrap();

    assert!(!system.is_empty(), "expected discovery to find at least one pattern over the canonical fixture");
    let mut found_markers = false;
    for pattern in system.iter() {
        if pattern.description.filename.contains("_L") && pattern.description.filename.contains("_D0") {
            found_markers = true;
        }
        assert!(
            pattern.max_bars_back >= 1 && pattern.max_bars_back <= 5,
            "max_bars_back {} out of [1,5] for {}",
            pattern.max_bars_back,
            pattern.description.filename
        );
    }
    assert!(found_markers, "expected at least one filename containing both _L and _D0");
}

/// Scenario 2: running discovery over the full range produces at least
/// two patterns whose entry bars land on the two dated entry days
/// (2023-01-04, 2023-01-09) — confirming the exit-before-entry rule lets
/// both cycles register as separate entries rather than the second being
/// swallowed by the first's still-open position.
#[test]
fn scenario_2_exit_before_entry_yields_both_entry_cycles() {
    let series = canonical_series();
    let cfg = config(SearchMode::Extended, false);
    let engine = ExhaustiveDiscoveryEngine::new(series.clone(), &cfg);
    let system = engine.run(&Inline, factory(&series)).unwrap();

    let entry_bar_1 = NaiveDate::from_ymd_opt(2023, 1, 4).unwrap();
    let entry_bar_2 = NaiveDate::from_ymd_opt(2023, 1, 9).unwrap();
    let bars = series.bars();

    let mut matching_patterns = 0usize;
    for pattern in system.iter() {
        let mut backtester = SimplePalBacktester::new(series.clone(), 0, series.len() - 1);
        backtester.add_strategy(palvalidator_core::strategy::Strategy::new(
            pattern.description.filename.clone(),
            pattern.clone(),
        ));
        backtester.backtest();
        let entry_dates: Vec<NaiveDate> = backtester.closed_trades().iter().map(|t| bars[t.entry_index].date).collect();
        if entry_dates.contains(&entry_bar_1) || entry_dates.contains(&entry_bar_2) {
            matching_patterns += 1;
        }
    }

    assert!(matching_patterns >= 2, "expected at least 2 patterns entering on the two dated entry bars, got {matching_patterns}");
}

/// Scenario 3: a delay sweep (delays 1..5) never finds fewer patterns than
/// the exact-only run on the same inputs.
#[test]
fn scenario_3_delay_sweep_covers_at_least_exact_only() {
    let series = canonical_series();
    let exact_cfg = config(SearchMode::Extended, false);
    let delay_cfg = config(SearchMode::Extended, true);

    let exact_engine = ExhaustiveDiscoveryEngine::new(series.clone(), &exact_cfg);
    let delay_engine = ExhaustiveDiscoveryEngine::new(series.clone(), &delay_cfg);

    let exact_system = exact_engine.run(&Inline, factory(&series)).unwrap();
    let delay_system = delay_engine.run(&Inline, factory(&series)).unwrap();

    assert!(delay_system.len() >= exact_system.len());
}

/// Scenario 4: the inline and a 4-worker FixedPool executor agree on
/// survivor counts for scenarios 1-3's configurations.
#[test]
fn scenario_4_inline_and_fixed_pool_agree_across_configs() {
    let series = canonical_series();
    let pool = FixedPool::new(4);

    for cfg in [config(SearchMode::Extended, false), config(SearchMode::Extended, true)] {
        let inline_engine = ExhaustiveDiscoveryEngine::new(series.clone(), &cfg);
        let inline_system = inline_engine.run(&Inline, factory(&series)).unwrap();

        let pooled_engine = ExhaustiveDiscoveryEngine::new(series.clone(), &cfg);
        let pooled_system = pooled_engine.run(&pool, factory(&series)).unwrap();

        assert_eq!(inline_system.len(), pooled_system.len());
    }
}
