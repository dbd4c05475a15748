use serde::{Deserialize, Serialize};

/// Representation of the observations an allocator expects to be fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Raw prices.
    Raw,
    /// Period-over-period price relatives, price(t) / price(t-1).
    Ratio,
}

/// Read-only metadata the iteration harness consults before calling an allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocatorInfo {
    pub hinted: bool,
    pub min_history: usize,
    pub price_type: PriceType,
    pub replace_missing: bool,
}

impl AllocatorInfo {
    pub const fn unhinted() -> Self {
        Self {
            hinted: false,
            min_history: 0,
            price_type: PriceType::Ratio,
            replace_missing: true,
        }
    }

    pub const fn hinted(min_history: usize, price_type: PriceType) -> Self {
        Self {
            hinted: true,
            min_history,
            price_type,
            replace_missing: true,
        }
    }
}
