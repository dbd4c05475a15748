use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_len, PortfolioError, Result};
use crate::hint::HintProvider;
use crate::model::weights::dot;
use crate::model::{AllocatorInfo, PriceType};
use crate::strategy::{Allocator, Greedy, UniformCrp};

/// How the unhinted and hinted weights are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    /// `(1 - w) * b_hat + w * f`
    Arithmetic,
    /// `b_hat^(1 - w) * f^w`, elementwise
    Geometric,
}

impl FromStr for CombineMode {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" | "add" => Ok(Self::Arithmetic),
            "geometric" | "mult" => Ok(Self::Geometric),
            other => Err(PortfolioError::InvalidConfig(format!(
                "combination mode '{other}' is not one of arithmetic/add, geometric/mult"
            ))),
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arithmetic => write!(f, "arithmetic"),
            Self::Geometric => write!(f, "geometric"),
        }
    }
}

/// Blend `b_hat` and `f` with weight `w` on `f`.
///
/// `w` is not clamped: above 1 the arithmetic form extrapolates past `f`.
/// Geometric blending is only defined for non-negative inputs.
pub fn combine(mode: CombineMode, w: f64, b_hat: &[f64], f: &[f64]) -> Result<Vec<f64>> {
    ensure_len(f, b_hat.len())?;
    match mode {
        CombineMode::Arithmetic => Ok(b_hat
            .iter()
            .zip(f)
            .map(|(b, h)| (1.0 - w) * b + w * h)
            .collect()),
        CombineMode::Geometric => {
            if let Some(neg) = b_hat.iter().chain(f).find(|v| **v < 0.0) {
                return Err(PortfolioError::NumericDomain(format!(
                    "geometric combination of negative weight {neg}"
                )));
            }
            Ok(b_hat
                .iter()
                .zip(f)
                .map(|(b, h)| b.powf(1.0 - w) * h.powf(w))
                .collect())
        }
    }
}

/// Combines a hint-agnostic allocator with a hint-driven one.
///
/// The blend weight on the hinted side is `lambda / r`. `r` starts at 1 and
/// grows as `r <- sqrt(r^2 + (R_b_hat - R_f) / R_b_hat)` every period the
/// hinted allocation earned less than the unhinted one, so the hint's share
/// decays with its cumulative regret. `r` never decreases.
///
/// A failed `step` leaves `r` and the stored sub-allocations unchanged.
pub struct HintedCombiner {
    lambda: f64,
    mode: CombineMode,
    unhinted: Box<dyn Allocator>,
    hinted: Box<dyn Allocator>,
    hinter: Option<Box<dyn HintProvider>>,
    r: f64,
    last_b_hat: Option<Vec<f64>>,
    last_f: Option<Vec<f64>>,
}

impl HintedCombiner {
    /// Uniform CRP as the unhinted side and Greedy as the hinted side, both
    /// owned by this instance.
    pub fn new(lambda: f64, mode: CombineMode) -> Result<Self> {
        Self::with_strategies(
            lambda,
            mode,
            Box::new(UniformCrp::new()),
            Box::new(Greedy::new()),
        )
    }

    pub fn with_strategies(
        lambda: f64,
        mode: CombineMode,
        unhinted: Box<dyn Allocator>,
        hinted: Box<dyn Allocator>,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&lambda) {
            return Err(PortfolioError::InvalidConfig(format!(
                "lambda must be in [0, 1], got {lambda}"
            )));
        }
        Ok(Self {
            lambda,
            mode,
            unhinted,
            hinted,
            hinter: None,
            r: 1.0,
            last_b_hat: None,
            last_f: None,
        })
    }

    pub fn with_hinter(mut self, hinter: Box<dyn HintProvider>) -> Self {
        self.hinter = Some(hinter);
        self
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn mode(&self) -> CombineMode {
        self.mode
    }

    /// Current trust-decay parameter.
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Current weight on the hinted allocation.
    pub fn hint_weight(&self) -> f64 {
        self.lambda / self.r
    }

    pub fn last_b_hat(&self) -> Option<&[f64]> {
        self.last_b_hat.as_deref()
    }

    pub fn last_f(&self) -> Option<&[f64]> {
        self.last_f.as_deref()
    }

    fn combine_current(&self, b_hat: &[f64], f: &[f64]) -> Result<Vec<f64>> {
        combine(self.mode, self.hint_weight(), b_hat, f)
    }

    /// Trust parameter after a period with the given returns. Does not
    /// modify `self`.
    fn next_trust(&self, return_f: f64, return_b_hat: f64) -> Result<f64> {
        if return_f >= return_b_hat {
            return Ok(self.r);
        }
        if return_b_hat <= 0.0 {
            return Err(PortfolioError::NumericDomain(format!(
                "unhinted return {return_b_hat} must be positive to update trust"
            )));
        }
        let r = (self.r * self.r + (return_b_hat - return_f) / return_b_hat).sqrt();
        tracing::debug!(
            r_prev = self.r,
            r,
            return_f,
            return_b_hat,
            "hint underperformed, trust decayed"
        );
        Ok(r)
    }
}

impl Allocator for HintedCombiner {
    fn name(&self) -> &'static str {
        "hinted"
    }

    fn info(&self) -> AllocatorInfo {
        AllocatorInfo::hinted(0, PriceType::Ratio)
    }

    fn init_weights(&mut self, assets: &[String], hint: Option<&[f64]>) -> Result<Vec<f64>> {
        let b_hat = self.unhinted.init_weights(assets, None)?;
        let f = self.hinted.init_weights(assets, hint)?;
        let b = self.combine_current(&b_hat, &f)?;
        self.last_b_hat = Some(b_hat);
        self.last_f = Some(f);
        Ok(b)
    }

    fn init_step(&mut self, history: &[Vec<f64>], hint: Option<&[f64]>) -> Result<()> {
        self.unhinted.init_step(history, None)?;
        self.hinted.init_step(history, hint)
    }

    fn step(
        &mut self,
        x: &[f64],
        _last_b: &[f64],
        history: &[Vec<f64>],
        hint: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let (Some(last_b_hat), Some(last_f)) = (self.last_b_hat.clone(), self.last_f.clone())
        else {
            return Err(PortfolioError::NotInitialized("hinted"));
        };

        let return_f = dot(&last_f, x)?;
        let return_b_hat = dot(&last_b_hat, x)?;
        let r = self.next_trust(return_f, return_b_hat)?;

        // Each side continues from its own previous weights, not the blend.
        let b_hat = self.unhinted.step(x, &last_b_hat, history, None)?;
        let f = self.hinted.step(x, &last_f, history, hint)?;

        let b = combine(self.mode, self.lambda / r, &b_hat, &f)?;
        self.r = r;
        self.last_b_hat = Some(b_hat);
        self.last_f = Some(f);
        Ok(b)
    }

    fn hinter_mut(&mut self) -> Option<&mut (dyn HintProvider + 'static)> {
        self.hinter.as_deref_mut()
    }
}
