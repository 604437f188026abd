//! `ProfitTarget` and `StopLoss` — interned percentage annotations.

use rust_decimal::Decimal;

/// Which side of the market a target/stop applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

/// A profit target expressed as a percentage of entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitTarget {
    pub side: Side,
    pub percent: Decimal,
    hash: u64,
}

/// A stop loss expressed as a percentage of entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopLoss {
    pub side: Side,
    pub percent: Decimal,
    hash: u64,
}

const PROFIT_TARGET_SEED: u64 = 43;
const PROFIT_TARGET_MUL: u64 = 97;
const STOP_LOSS_SEED: u64 = 47;
const STOP_LOSS_MUL: u64 = 101;

/// Canonical string key for interning: fixed-precision decimal string.
fn decimal_hash_component(value: Decimal) -> u64 {
    blake3::hash(value.normalize().to_string().as_bytes())
        .as_bytes()
        .iter()
        .take(8)
        .fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

impl ProfitTarget {
    pub fn new(side: Side, percent: Decimal) -> Self {
        let hash = PROFIT_TARGET_SEED.wrapping_add(PROFIT_TARGET_MUL.wrapping_mul(decimal_hash_component(percent)));
        Self { side, percent, hash }
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }
}

impl StopLoss {
    pub fn new(side: Side, percent: Decimal) -> Self {
        let hash = STOP_LOSS_SEED.wrapping_add(STOP_LOSS_MUL.wrapping_mul(decimal_hash_component(percent)));
        Self { side, percent, hash }
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }
}
