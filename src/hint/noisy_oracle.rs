use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{ensure_len, PortfolioError, Result};
use crate::hint::HintProvider;

pub const DEFAULT_NOISE_SCALE: f64 = 0.5;

/// Diagnostic hint: the true next price-relative vector plus i.i.d. noise.
///
/// This provider reads the observation that has not been realized yet, so it
/// is a benchmarking tool for measuring how much a hinted allocator gains
/// from a hint of known quality. Never wire it into live allocation.
#[derive(Debug, Clone)]
pub struct NoisyOracleHint<D = Normal<f64>> {
    n_assets: usize,
    noise: D,
    rng: StdRng,
}

impl NoisyOracleHint<Normal<f64>> {
    /// Zero-mean Gaussian noise with standard deviation `scale`.
    pub fn gaussian(n_assets: usize, scale: f64, seed: u64) -> Result<Self> {
        let noise = Normal::new(0.0, scale).map_err(|e| {
            PortfolioError::InvalidConfig(format!("invalid noise scale {scale}: {e}"))
        })?;
        Ok(Self::with_noise(n_assets, noise, seed))
    }

    pub fn new(n_assets: usize, seed: u64) -> Result<Self> {
        Self::gaussian(n_assets, DEFAULT_NOISE_SCALE, seed)
    }
}

impl<D: Distribution<f64>> NoisyOracleHint<D> {
    pub fn with_noise(n_assets: usize, noise: D, seed: u64) -> Self {
        Self {
            n_assets,
            noise,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<D: Distribution<f64>> HintProvider for NoisyOracleHint<D> {
    fn n_assets(&self) -> usize {
        self.n_assets
    }

    fn train(&mut self, _observations: &[Vec<f64>], _targets: &[Vec<f64>]) -> Result<()> {
        Ok(())
    }

    fn get_hint(&mut self, next_x: &[f64], _history: &[Vec<f64>]) -> Result<Vec<f64>> {
        ensure_len(next_x, self.n_assets)?;
        Ok(next_x
            .iter()
            .map(|x| x + self.noise.sample(&mut self.rng))
            .collect())
    }
}
