use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PortfolioError, Result};

pub const DEFAULT_MESH_SEED: u64 = 0x5EED_CAFE;

/// Produces a finite sample of points approximating the simplex.
pub trait MeshGenerator {
    /// `points` rows of length `dim + 1`, each non-negative and summing to 1.
    fn sample(&mut self, dim: usize, points: usize) -> Vec<Vec<f64>>;
}

/// Uniform Monte-Carlo sampling of the simplex by sorted uniform spacings:
/// draw `dim` uniforms, sort them, pad with 0 and 1 and take consecutive
/// differences.
#[derive(Debug, Clone)]
pub struct MonteCarloSimplex {
    rng: StdRng,
}

impl MonteCarloSimplex {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MonteCarloSimplex {
    fn default() -> Self {
        Self::new(DEFAULT_MESH_SEED)
    }
}

impl MeshGenerator for MonteCarloSimplex {
    fn sample(&mut self, dim: usize, points: usize) -> Vec<Vec<f64>> {
        let mut cuts = Vec::with_capacity(dim + 2);
        (0..points)
            .map(|_| {
                cuts.clear();
                cuts.push(0.0);
                cuts.extend((0..dim).map(|_| self.rng.gen::<f64>()));
                cuts[1..].sort_by(|a, b| a.total_cmp(b));
                cuts.push(1.0);
                cuts.windows(2).map(|w| w[1] - w[0]).collect()
            })
            .collect()
    }
}

/// Effective leverage for `m` assets; anything below the uniform CRP is
/// raised to `1/m`.
pub fn effective_leverage(leverage: f64, m: usize) -> f64 {
    leverage.max(1.0 / m as f64)
}

/// Stretch every mesh point about the uniform CRP centre so the mesh spans a
/// simplex scaled by `leverage`. Rows keep summing to 1.
pub fn stretch_mesh(mesh: &mut [Vec<f64>], leverage: f64) {
    for row in mesh.iter_mut() {
        let m = row.len();
        if m < 2 {
            continue;
        }
        let centre = 1.0 / m as f64;
        let stretch = (effective_leverage(leverage, m) - centre) / (1.0 - centre);
        for w in row.iter_mut() {
            *w = (*w - centre) * stretch + centre;
        }
    }
}

/// Sample and stretch a mesh for `m` assets.
pub fn build_mesh(
    generator: &mut dyn MeshGenerator,
    m: usize,
    eval_points: usize,
    leverage: f64,
) -> Result<Vec<Vec<f64>>> {
    if m == 0 {
        return Err(PortfolioError::InvalidConfig(
            "mesh needs at least one asset".to_string(),
        ));
    }
    if eval_points == 0 {
        return Err(PortfolioError::InvalidConfig(
            "eval_points must be >= 1".to_string(),
        ));
    }
    let mut mesh = generator.sample(m - 1, eval_points);
    if let Some(bad) = mesh.iter().find(|row| row.len() != m) {
        return Err(PortfolioError::DimensionMismatch {
            expected: m,
            got: bad.len(),
        });
    }
    stretch_mesh(&mut mesh, leverage);
    Ok(mesh)
}

/// Validate a configured leverage value.
pub fn check_leverage(leverage: f64) -> Result<()> {
    if !leverage.is_finite() || leverage <= 0.0 {
        return Err(PortfolioError::InvalidConfig(format!(
            "leverage must be finite and > 0, got {leverage}"
        )));
    }
    Ok(())
}
