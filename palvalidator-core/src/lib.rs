//! Pattern discovery and AST interning for price-action strategy search.
//!
//! This crate owns the pattern AST, its interning resource manager, the
//! exhaustive discovery engine, the parallel executor abstraction, and the
//! external backtester contract. Statistical validation (Monte Carlo
//! permutation testing, multiple-testing correction) lives in
//! `palvalidator-stats`, which depends on this crate.

pub mod ast;
pub mod backtest;
pub mod discovery;
pub mod error;
pub mod eval;
pub mod executor;
pub mod pattern_system;
pub mod resource_manager;
pub mod search;
pub mod series;
pub mod strategy;

pub use ast::{
    Entry, Pattern, PatternDescription, PortfolioAttr, Predicate, PriceBarRef, PriceComponent, ProfitTarget, Side,
    StopLoss, VolatilityAttr,
};
pub use backtest::{Backtester, ClosedTrade, SimplePalBacktester};
pub use discovery::{generate_candidate, rewrite_with_delay, BacktesterFactory, ExhaustiveDiscoveryEngine};
pub use error::ConfigError;
pub use executor::{ExecutorError, FixedPool, HostPool, Inline, JoinHandle, ParallelExecutor, PerTaskThread};
pub use pattern_system::PatternSystem;
pub use resource_manager::AstResourceManager;
pub use search::{PerformanceCriteria, SearchConfiguration, SearchMode};
pub use series::{Bar, TimeSeries};
pub use strategy::{Strategy, StrategyId};
