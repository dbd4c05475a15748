pub mod price;
pub mod weights;

pub use price::{AllocatorInfo, PriceType};
