use crate::error::{ensure_len, PortfolioError, Result};
use crate::mesh::{build_mesh, check_leverage, effective_leverage, MeshGenerator, MonteCarloSimplex};
use crate::model::weights::{dot, normalize, uniform};
use crate::model::AllocatorInfo;
use crate::strategy::Allocator;

pub const DEFAULT_EVAL_POINTS: usize = 10_000;

/// Wealth vectors are rescaled once their largest magnitude leaves
/// `[1 / WEALTH_RESCALE_BOUND, WEALTH_RESCALE_BOUND]`.
pub const WEALTH_RESCALE_BOUND: f64 = 1e100;

/// Cover's Universal Portfolio approximated over a Monte-Carlo mesh of CRPs.
///
/// Every mesh point is a constant-rebalanced portfolio; the output is the
/// mixture of mesh points weighted by the wealth each has accumulated.
pub struct UniversalPortfolio {
    eval_points: usize,
    leverage: f64,
    mesh_gen: Box<dyn MeshGenerator>,
    n_assets: Option<usize>,
    mesh: Vec<Vec<f64>>,
    wealth: Vec<f64>,
}

impl UniversalPortfolio {
    pub fn new(eval_points: usize, leverage: f64) -> Result<Self> {
        if eval_points == 0 {
            return Err(PortfolioError::InvalidConfig(
                "eval_points must be >= 1".to_string(),
            ));
        }
        check_leverage(leverage)?;
        Ok(Self {
            eval_points,
            leverage,
            mesh_gen: Box::new(MonteCarloSimplex::default()),
            n_assets: None,
            mesh: Vec::new(),
            wealth: Vec::new(),
        })
    }

    pub fn with_mesh_generator(mut self, mesh_gen: Box<dyn MeshGenerator>) -> Self {
        self.mesh_gen = mesh_gen;
        self
    }

    pub fn mesh(&self) -> &[Vec<f64>] {
        &self.mesh
    }

    pub fn wealth(&self) -> &[f64] {
        &self.wealth
    }
}

impl Default for UniversalPortfolio {
    fn default() -> Self {
        Self {
            eval_points: DEFAULT_EVAL_POINTS,
            leverage: 1.0,
            mesh_gen: Box::new(MonteCarloSimplex::default()),
            n_assets: None,
            mesh: Vec::new(),
            wealth: Vec::new(),
        }
    }
}

/// Multiply each mesh point's wealth by its realized return under `x`.
///
/// Only ratios between entries matter to the mixture, so the vector is
/// divided by its peak magnitude whenever that drifts far from 1.
pub(crate) fn grow_wealth(mesh: &[Vec<f64>], wealth: &mut [f64], x: &[f64]) -> Result<()> {
    for (row, w) in mesh.iter().zip(wealth.iter_mut()) {
        *w *= dot(row, x)?;
    }
    rescale_wealth(wealth);
    Ok(())
}

fn rescale_wealth(wealth: &mut [f64]) {
    let peak = wealth.iter().fold(0.0_f64, |acc, w| acc.max(w.abs()));
    if peak == 0.0 || !peak.is_finite() {
        return;
    }
    if peak > WEALTH_RESCALE_BOUND || peak < WEALTH_RESCALE_BOUND.recip() {
        for w in wealth.iter_mut() {
            *w /= peak;
        }
    }
}

/// Wealth-weighted mixture of the mesh points, normalized to sum to 1.
pub(crate) fn wealth_mixture(mesh: &[Vec<f64>], wealth: &[f64], m: usize) -> Result<Vec<f64>> {
    let mut b = vec![0.0; m];
    for (row, w) in mesh.iter().zip(wealth) {
        for (acc, v) in b.iter_mut().zip(row) {
            *acc += v * w;
        }
    }
    normalize(b)
}

/// Number of assets from whatever the harness has told us so far.
pub(crate) fn resolve_n_assets(
    known: Option<usize>,
    history: &[Vec<f64>],
    hint: Option<&[f64]>,
) -> Option<usize> {
    known
        .or_else(|| history.last().map(Vec::len))
        .or_else(|| hint.map(<[f64]>::len))
        .filter(|m| *m > 0)
}

pub(crate) fn warn_if_clamped(leverage: f64, m: usize) {
    let floor = effective_leverage(leverage, m);
    if floor > leverage {
        tracing::warn!(
            requested = leverage,
            effective = floor,
            "leverage below uniform CRP, clamping"
        );
    }
}

impl Allocator for UniversalPortfolio {
    fn name(&self) -> &'static str {
        "up"
    }

    fn info(&self) -> AllocatorInfo {
        AllocatorInfo::unhinted()
    }

    fn init_weights(&mut self, assets: &[String], _hint: Option<&[f64]>) -> Result<Vec<f64>> {
        self.n_assets = Some(assets.len());
        Ok(uniform(assets.len()))
    }

    fn init_step(&mut self, history: &[Vec<f64>], hint: Option<&[f64]>) -> Result<()> {
        if !self.mesh.is_empty() {
            return Ok(());
        }
        let m = resolve_n_assets(self.n_assets, history, hint)
            .ok_or(PortfolioError::NotInitialized("up"))?;
        self.n_assets = Some(m);
        warn_if_clamped(self.leverage, m);
        self.mesh = build_mesh(self.mesh_gen.as_mut(), m, self.eval_points, self.leverage)?;
        self.wealth = vec![1.0; self.mesh.len()];
        tracing::info!(
            assets = m,
            points = self.mesh.len(),
            leverage = effective_leverage(self.leverage, m),
            "UP mesh built"
        );
        Ok(())
    }

    fn step(
        &mut self,
        x: &[f64],
        _last_b: &[f64],
        _history: &[Vec<f64>],
        _hint: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let m = match self.n_assets {
            Some(m) if !self.mesh.is_empty() => m,
            _ => return Err(PortfolioError::NotInitialized("up")),
        };
        ensure_len(x, m)?;
        grow_wealth(&self.mesh, &mut self.wealth, x)?;
        wealth_mixture(&self.mesh, &self.wealth, m)
    }
}
