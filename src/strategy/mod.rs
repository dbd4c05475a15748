pub mod greedy;
pub mod hinted;
pub mod ucrp;
pub mod up;
pub mod up_si;

pub use greedy::Greedy;
pub use hinted::{CombineMode, HintedCombiner};
pub use ucrp::UniformCrp;
pub use up::UniversalPortfolio;
pub use up_si::UniversalPortfolioSi;

use crate::error::Result;
use crate::hint::HintProvider;
use crate::model::AllocatorInfo;

/// Per-period portfolio allocator driven by an iteration harness.
///
/// The harness calls `init_weights` once, then `init_step` once, then `step`
/// once per period, strictly sequentially. Unhinted allocators ignore `hint`.
pub trait Allocator {
    fn name(&self) -> &'static str;

    fn info(&self) -> AllocatorInfo;

    /// Weights for period 0.
    fn init_weights(&mut self, assets: &[String], hint: Option<&[f64]>) -> Result<Vec<f64>>;

    /// Build per-run state from the history known before the first `step`.
    fn init_step(&mut self, history: &[Vec<f64>], hint: Option<&[f64]>) -> Result<()>;

    /// Weights for the next period, given the newly realized price relatives
    /// `x` and this allocator's own previous weights.
    fn step(
        &mut self,
        x: &[f64],
        last_b: &[f64],
        history: &[Vec<f64>],
        hint: Option<&[f64]>,
    ) -> Result<Vec<f64>>;

    /// Hint provider owned by this allocator, if any.
    fn hinter_mut(&mut self) -> Option<&mut (dyn HintProvider + 'static)> {
        None
    }
}
