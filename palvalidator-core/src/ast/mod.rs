//! Interned pattern AST: bar references, predicates, entries,
//! targets/stops, and the `Pattern`/`PatternDescription` types built from
//! them. See `AstResourceManager` for construction — nothing in this
//! module is meant to be built directly outside of it (constructors are
//! crate-private).

pub mod bar_ref;
pub mod entry;
pub mod pattern;
pub mod predicate;
pub mod target_stop;
pub mod visit;

pub use bar_ref::{PriceBarRef, PriceComponent};
pub use entry::Entry;
pub use pattern::{Pattern, PatternDescription, PortfolioAttr, VolatilityAttr};
pub use predicate::Predicate;
pub use target_stop::{ProfitTarget, Side, StopLoss};
pub use visit::{walk_pattern, walk_predicate, Visit};
