pub mod ma_reversion;
pub mod noisy_oracle;

pub use ma_reversion::MaReversionHint;
pub use noisy_oracle::NoisyOracleHint;

use crate::error::Result;

/// Source of per-asset hints consumed by hinted allocators.
///
/// Providers are trained once, before the trading loop starts, and then
/// queried once per period.
pub trait HintProvider {
    /// Length of the hint vectors this provider produces.
    fn n_assets(&self) -> usize;

    /// Fit internal state from a historical dataset. Providers with nothing
    /// to fit accept any input and return `Ok(())`.
    fn train(&mut self, observations: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()>;

    /// Hint for the upcoming period.
    ///
    /// `next_x` is the observation about to be realized; only diagnostic
    /// providers are allowed to read it.
    fn get_hint(&mut self, next_x: &[f64], history: &[Vec<f64>]) -> Result<Vec<f64>>;
}
