//! `MultipleTestingCorrector`. Five survivor-selection
//! policies sharing one sorted-p-value container.

pub mod adaptive_bh;
pub mod benjamini_hochberg;
pub mod container;
pub mod romano_wolf;
pub mod unadjusted;

pub use adaptive_bh::AdaptiveBh;
pub use benjamini_hochberg::{BenjaminiHochbergFdr, DEFAULT_Q};
pub use container::{Entry, Family, PValueContainer};
pub use romano_wolf::{BaselineStat, HolmRomanoWolfStepUp, RomanoWolfStepDown};
pub use unadjusted::UnadjustedSelection;
