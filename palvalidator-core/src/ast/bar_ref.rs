//! `PriceBarRef` — an interned reference to one price/volume component at a
//! fixed bar offset from the anchor.

use std::fmt;

/// Which OHLCV (or derived) component of a bar is being referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceComponent {
    Open,
    High,
    Low,
    Close,
    Volume,
    Roc1,
    Ibs1,
    Ibs2,
    Ibs3,
    Meander,
    VChartLow,
    VChartHigh,
}

impl PriceComponent {
    /// Seed/multiplier per the component hash table below. IBS1-3 are not named
    /// in the table (they never appear in enumeration output, only as a
    /// legal AST variant consumed externally) so they reuse Roc1's family.
    pub(crate) fn hash_seed_mul(self) -> (u64, u64) {
        match self {
            PriceComponent::Open => (17, 53),
            PriceComponent::High => (19, 59),
            PriceComponent::Low => (23, 61),
            PriceComponent::Close => (29, 67),
            PriceComponent::Volume => (37, 73),
            PriceComponent::Roc1 | PriceComponent::Ibs1 | PriceComponent::Ibs2 | PriceComponent::Ibs3 => (41, 79),
            PriceComponent::Meander => (43, 83),
            PriceComponent::VChartLow => (47, 89),
            PriceComponent::VChartHigh => (53, 97),
        }
    }

    /// Extra bars of history needed beyond the referenced offset itself.
    pub fn extra_bars_needed(self) -> u32 {
        match self {
            PriceComponent::Open
            | PriceComponent::High
            | PriceComponent::Low
            | PriceComponent::Close
            | PriceComponent::Volume => 0,
            PriceComponent::Roc1 | PriceComponent::Ibs1 | PriceComponent::Ibs2 | PriceComponent::Ibs3 => 1,
            PriceComponent::Meander => 5,
            PriceComponent::VChartLow | PriceComponent::VChartHigh => 6,
        }
    }
}

impl fmt::Display for PriceComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceComponent::Open => "Open",
            PriceComponent::High => "High",
            PriceComponent::Low => "Low",
            PriceComponent::Close => "Close",
            PriceComponent::Volume => "Volume",
            PriceComponent::Roc1 => "Roc1",
            PriceComponent::Ibs1 => "Ibs1",
            PriceComponent::Ibs2 => "Ibs2",
            PriceComponent::Ibs3 => "Ibs3",
            PriceComponent::Meander => "Meander",
            PriceComponent::VChartLow => "VChartLow",
            PriceComponent::VChartHigh => "VChartHigh",
        };
        write!(f, "{s}")
    }
}

/// An interned (component, offset) handle. Two `PriceBarRef`s with the same
/// component and offset are always `==` and, once obtained from
/// `AstResourceManager`, are the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceBarRef {
    pub component: PriceComponent,
    pub offset: u32,
    hash: u64,
}

impl PriceBarRef {
    pub(crate) fn new(component: PriceComponent, offset: u32) -> Self {
        let (seed, mul) = component.hash_seed_mul();
        let hash = mul.wrapping_mul(seed).wrapping_add(offset as u64);
        Self { component, offset, hash }
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    /// Same component, offset shifted by `delay` (used by the delay
    /// rewriter; does not consult the resource manager itself).
    pub fn with_offset(&self, offset: u32) -> (PriceComponent, u32) {
        (self.component, offset)
    }
}
