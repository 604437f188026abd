//! Exhaustive discovery: enumeration, delay rewriting, and the engine that
//! drives both across the anchor-bar window.

pub mod delay_rewriter;
pub mod enumeration;
pub mod engine;

pub use delay_rewriter::rewrite_with_delay;
pub use engine::{BacktesterFactory, ExhaustiveDiscoveryEngine};
pub use enumeration::generate_candidate;
