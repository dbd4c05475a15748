use crate::error::Result;
use crate::model::weights::uniform;
use crate::model::AllocatorInfo;
use crate::strategy::Allocator;

/// Uniform constant-rebalanced portfolio: `1/m` in every asset, every period.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCrp;

impl UniformCrp {
    pub fn new() -> Self {
        Self
    }
}

impl Allocator for UniformCrp {
    fn name(&self) -> &'static str {
        "ucrp"
    }

    fn info(&self) -> AllocatorInfo {
        AllocatorInfo::unhinted()
    }

    fn init_weights(&mut self, assets: &[String], _hint: Option<&[f64]>) -> Result<Vec<f64>> {
        Ok(uniform(assets.len()))
    }

    fn init_step(&mut self, _history: &[Vec<f64>], _hint: Option<&[f64]>) -> Result<()> {
        Ok(())
    }

    fn step(
        &mut self,
        x: &[f64],
        _last_b: &[f64],
        _history: &[Vec<f64>],
        _hint: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        Ok(uniform(x.len()))
    }
}
