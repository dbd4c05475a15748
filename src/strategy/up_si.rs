use crate::error::{ensure_len, PortfolioError, Result};
use crate::hint::HintProvider;
use crate::mesh::{build_mesh, check_leverage, effective_leverage, MeshGenerator, MonteCarloSimplex};
use crate::model::weights::{argmax, uniform};
use crate::model::{AllocatorInfo, PriceType};
use crate::strategy::up::{
    grow_wealth, resolve_n_assets, warn_if_clamped, wealth_mixture, DEFAULT_EVAL_POINTS,
};
use crate::strategy::Allocator;

/// Universal Portfolio with side information.
///
/// The regime of a period is the asset the hint favors (`argmax(hint)`).
/// One wealth column per regime is tracked over a shared CRP mesh; a period
/// only grows and reads the column of its own regime, so each regime runs an
/// independent universal portfolio over the sub-sequence of periods where it
/// was selected.
///
/// `leverage == 1` keeps the mesh on the simplex, `leverage == 1/m` collapses
/// it onto the uniform CRP and `leverage > 1` admits short positions.
pub struct UniversalPortfolioSi {
    hinter: Option<Box<dyn HintProvider>>,
    eval_points: usize,
    leverage: f64,
    mesh_gen: Box<dyn MeshGenerator>,
    n_assets: Option<usize>,
    mesh: Vec<Vec<f64>>,
    // wealth[regime][mesh point]
    wealth: Vec<Vec<f64>>,
}

impl UniversalPortfolioSi {
    pub fn new(eval_points: usize, leverage: f64) -> Result<Self> {
        if eval_points == 0 {
            return Err(PortfolioError::InvalidConfig(
                "eval_points must be >= 1".to_string(),
            ));
        }
        check_leverage(leverage)?;
        Ok(Self {
            hinter: None,
            eval_points,
            leverage,
            mesh_gen: Box::new(MonteCarloSimplex::default()),
            n_assets: None,
            mesh: Vec::new(),
            wealth: Vec::new(),
        })
    }

    pub fn with_default_mesh(hinter: Box<dyn HintProvider>) -> Self {
        Self {
            hinter: Some(hinter),
            eval_points: DEFAULT_EVAL_POINTS,
            leverage: 1.0,
            mesh_gen: Box::new(MonteCarloSimplex::default()),
            n_assets: None,
            mesh: Vec::new(),
            wealth: Vec::new(),
        }
    }

    pub fn with_hinter(mut self, hinter: Box<dyn HintProvider>) -> Self {
        self.hinter = Some(hinter);
        self
    }

    pub fn with_mesh_generator(mut self, mesh_gen: Box<dyn MeshGenerator>) -> Self {
        self.mesh_gen = mesh_gen;
        self
    }

    pub fn eval_points(&self) -> usize {
        self.eval_points
    }

    pub fn leverage(&self) -> f64 {
        self.leverage
    }

    pub fn mesh(&self) -> &[Vec<f64>] {
        &self.mesh
    }

    /// Wealth of every mesh point under `regime`.
    pub fn wealth_column(&self, regime: usize) -> Option<&[f64]> {
        self.wealth.get(regime).map(Vec::as_slice)
    }
}

impl Allocator for UniversalPortfolioSi {
    fn name(&self) -> &'static str {
        "upsi"
    }

    fn info(&self) -> AllocatorInfo {
        AllocatorInfo::hinted(0, PriceType::Ratio)
    }

    fn init_weights(&mut self, assets: &[String], _hint: Option<&[f64]>) -> Result<Vec<f64>> {
        self.n_assets = Some(assets.len());
        Ok(uniform(assets.len()))
    }

    fn init_step(&mut self, history: &[Vec<f64>], hint: Option<&[f64]>) -> Result<()> {
        if !self.mesh.is_empty() {
            tracing::debug!("UPSI mesh already built, keeping it");
            return Ok(());
        }
        let m = resolve_n_assets(self.n_assets, history, hint)
            .ok_or(PortfolioError::NotInitialized("upsi"))?;
        self.n_assets = Some(m);
        warn_if_clamped(self.leverage, m);

        self.mesh = build_mesh(self.mesh_gen.as_mut(), m, self.eval_points, self.leverage)?;
        self.wealth = vec![vec![1.0; self.mesh.len()]; m];
        tracing::info!(
            assets = m,
            points = self.mesh.len(),
            leverage = effective_leverage(self.leverage, m),
            "UPSI mesh built"
        );
        Ok(())
    }

    fn step(
        &mut self,
        x: &[f64],
        _last_b: &[f64],
        _history: &[Vec<f64>],
        hint: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let m = match self.n_assets {
            Some(m) if !self.mesh.is_empty() => m,
            _ => return Err(PortfolioError::NotInitialized("upsi")),
        };
        let hint = hint.ok_or(PortfolioError::MissingHint("upsi"))?;
        ensure_len(hint, m)?;
        ensure_len(x, m)?;

        let regime = argmax(hint).ok_or(PortfolioError::MissingHint("upsi"))?;
        tracing::debug!(regime, "UPSI regime selected");

        let column = &mut self.wealth[regime];
        grow_wealth(&self.mesh, column, x)?;
        wealth_mixture(&self.mesh, column, m)
    }

    fn hinter_mut(&mut self) -> Option<&mut (dyn HintProvider + 'static)> {
        self.hinter.as_deref_mut()
    }
}
