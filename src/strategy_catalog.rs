use std::str::FromStr;

use crate::config::{AllocatorConfig, HintConfig};
use crate::error::{PortfolioError, Result};
use crate::hint::{HintProvider, MaReversionHint, NoisyOracleHint};
use crate::mesh::MonteCarloSimplex;
use crate::strategy::{
    Allocator, CombineMode, Greedy, HintedCombiner, UniformCrp, UniversalPortfolio,
    UniversalPortfolioSi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorKind {
    Ucrp,
    Up,
    Greedy,
    Hinted,
    Upsi,
}

impl AllocatorKind {
    pub const ALL: [AllocatorKind; 5] = [
        AllocatorKind::Ucrp,
        AllocatorKind::Up,
        AllocatorKind::Greedy,
        AllocatorKind::Hinted,
        AllocatorKind::Upsi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ucrp => "ucrp",
            Self::Up => "up",
            Self::Greedy => "greedy",
            Self::Hinted => "hinted",
            Self::Upsi => "upsi",
        }
    }

    pub fn is_hinted(self) -> bool {
        matches!(self, Self::Greedy | Self::Hinted | Self::Upsi)
    }
}

impl FromStr for AllocatorKind {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.label() == key)
            .ok_or_else(|| PortfolioError::InvalidConfig(format!("unknown allocator kind '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    MaReversion,
    /// Reads the next realized observation; benchmarking only.
    NoisyOracle,
}

impl FromStr for HintKind {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ma_reversion" | "ma" => Ok(Self::MaReversion),
            "noisy_oracle" | "oracle" => Ok(Self::NoisyOracle),
            _ => Err(PortfolioError::InvalidConfig(format!(
                "unknown hint kind '{s}'"
            ))),
        }
    }
}

pub fn build_hint_provider(cfg: &HintConfig, n_assets: usize) -> Result<Box<dyn HintProvider>> {
    match cfg.kind.parse::<HintKind>()? {
        HintKind::MaReversion => Ok(Box::new(MaReversionHint::new(n_assets, cfg.window)?)),
        HintKind::NoisyOracle => {
            tracing::warn!("noisy oracle hint reads future prices; results are a benchmark only");
            Ok(Box::new(NoisyOracleHint::gaussian(
                n_assets,
                cfg.noise_scale,
                cfg.seed,
            )?))
        }
    }
}

fn build_unhinted(cfg: &AllocatorConfig) -> Result<Box<dyn Allocator>> {
    match cfg.unhinted.parse::<AllocatorKind>()? {
        AllocatorKind::Ucrp => Ok(Box::new(UniformCrp::new())),
        AllocatorKind::Up => Ok(Box::new(build_up(cfg)?)),
        other => Err(PortfolioError::InvalidConfig(format!(
            "'{}' cannot be used as the unhinted strategy",
            other.label()
        ))),
    }
}

fn build_up(cfg: &AllocatorConfig) -> Result<UniversalPortfolio> {
    let up = UniversalPortfolio::new(cfg.eval_points, cfg.leverage)?;
    Ok(match cfg.mesh_seed {
        Some(seed) => up.with_mesh_generator(Box::new(MonteCarloSimplex::new(seed))),
        None => up,
    })
}

/// Build the configured allocator. Hinted kinds take ownership of `hinter`.
pub fn build_allocator(
    cfg: &AllocatorConfig,
    hinter: Option<Box<dyn HintProvider>>,
) -> Result<Box<dyn Allocator>> {
    let kind = cfg.kind.parse::<AllocatorKind>()?;
    if kind.is_hinted() && hinter.is_none() {
        return Err(PortfolioError::InvalidConfig(format!(
            "allocator '{}' needs a hint provider",
            kind.label()
        )));
    }

    let allocator: Box<dyn Allocator> = match kind {
        AllocatorKind::Ucrp => Box::new(UniformCrp::new()),
        AllocatorKind::Up => Box::new(build_up(cfg)?),
        AllocatorKind::Greedy => {
            let mut greedy = Greedy::new();
            if let Some(h) = hinter {
                greedy = greedy.with_hinter(h);
            }
            Box::new(greedy)
        }
        AllocatorKind::Hinted => {
            let mode = cfg.mode.parse::<CombineMode>()?;
            let mut combiner = HintedCombiner::with_strategies(
                cfg.lambda,
                mode,
                build_unhinted(cfg)?,
                Box::new(Greedy::new()),
            )?;
            if let Some(h) = hinter {
                combiner = combiner.with_hinter(h);
            }
            Box::new(combiner)
        }
        AllocatorKind::Upsi => {
            let mut upsi = UniversalPortfolioSi::new(cfg.eval_points, cfg.leverage)?;
            if let Some(seed) = cfg.mesh_seed {
                upsi = upsi.with_mesh_generator(Box::new(MonteCarloSimplex::new(seed)));
            }
            if let Some(h) = hinter {
                upsi = upsi.with_hinter(h);
            }
            Box::new(upsi)
        }
    };
    Ok(allocator)
}
