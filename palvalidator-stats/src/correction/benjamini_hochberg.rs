//! Policy (b): `BenjaminiHochbergFdr`. Walks ranks from
//! largest to smallest and stops at the first rejection; every hypothesis at
//! or below that rank survives. This is the literal rank-walk
//! grounded on `MultipleTestingCorrection.h::BenjaminiHochbergFdr`
//! in `original_source/`; it is NOT the same algorithm as
//! `fdr::benjamini_hochberg` (which adjusts q-values directly rather than
//! walking ranks) — that function is kept only as idiom/test-layout
//! grounding, per the design ledger.

use super::container::PValueContainer;
use palvalidator_core::strategy::StrategyId;
use rust_decimal::Decimal;

/// Design default target FDR when the caller doesn't supply one.
pub const DEFAULT_Q: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

pub struct BenjaminiHochbergFdr;

impl BenjaminiHochbergFdr {
    /// `q`: target false discovery rate.
    pub fn survivors(container: &PValueContainer, q: Decimal) -> Vec<StrategyId> {
        let sorted = container.sorted_ascending();
        let m = sorted.len();
        if m == 0 {
            return Vec::new();
        }
        let m_dec = Decimal::from(m as u64);

        let mut first_rejected_rank: Option<usize> = None;
        for rank in (1..=m).rev() {
            let entry = &sorted[rank - 1];
            let threshold = Decimal::from(rank as u64) / m_dec * q;
            if entry.p_value < threshold {
                first_rejected_rank = Some(rank);
                break;
            }
        }

        match first_rejected_rank {
            Some(rank) => sorted[..rank].iter().map(|e| e.strategy_id).collect(),
            None => Vec::new(),
        }
    }
}
