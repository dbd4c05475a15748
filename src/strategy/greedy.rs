use crate::error::{PortfolioError, Result};
use crate::hint::HintProvider;
use crate::model::weights::{argmax, unit};
use crate::model::{AllocatorInfo, PriceType};
use crate::strategy::Allocator;

/// Puts all weight on the asset with the largest hint. Ties resolve to the
/// first maximum.
#[derive(Default)]
pub struct Greedy {
    hinter: Option<Box<dyn HintProvider>>,
}

impl Greedy {
    pub fn new() -> Self {
        Self { hinter: None }
    }

    pub fn with_hinter(mut self, hinter: Box<dyn HintProvider>) -> Self {
        self.hinter = Some(hinter);
        self
    }

    pub fn portfolio(hint: &[f64]) -> Result<Vec<f64>> {
        let idx = argmax(hint).ok_or(PortfolioError::MissingHint("greedy"))?;
        Ok(unit(hint.len(), idx))
    }
}

impl Allocator for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn info(&self) -> AllocatorInfo {
        AllocatorInfo::hinted(1, PriceType::Raw)
    }

    fn init_weights(&mut self, _assets: &[String], hint: Option<&[f64]>) -> Result<Vec<f64>> {
        Self::portfolio(hint.ok_or(PortfolioError::MissingHint("greedy"))?)
    }

    fn init_step(&mut self, _history: &[Vec<f64>], _hint: Option<&[f64]>) -> Result<()> {
        Ok(())
    }

    fn step(
        &mut self,
        _x: &[f64],
        _last_b: &[f64],
        _history: &[Vec<f64>],
        hint: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        Self::portfolio(hint.ok_or(PortfolioError::MissingHint("greedy"))?)
    }

    fn hinter_mut(&mut self) -> Option<&mut (dyn HintProvider + 'static)> {
        self.hinter.as_deref_mut()
    }
}
