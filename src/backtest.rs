use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ensure_len, PortfolioError, Result};
use crate::model::weights::dot;
use crate::model::AllocatorInfo;
use crate::strategy::Allocator;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub allocator: String,
    pub info: AllocatorInfo,
    pub assets: Vec<String>,
    pub periods: usize,
    /// Weights held during each period.
    pub weights: Vec<Vec<f64>>,
    /// Cumulative wealth after each period, starting from 1.
    pub wealth: Vec<f64>,
    pub final_wealth: f64,
}

fn fetch_hint(
    allocator: &mut dyn Allocator,
    hinted: bool,
    next_x: &[f64],
    history: &[Vec<f64>],
) -> Result<Option<Vec<f64>>> {
    if !hinted {
        return Ok(None);
    }
    let name = allocator.name();
    let hinter = allocator
        .hinter_mut()
        .ok_or(PortfolioError::MissingHint(name))?;
    hinter.get_hint(next_x, history).map(Some)
}

/// Drive `allocator` over `relatives`, one period at a time.
///
/// The weights for period `t` are produced from the relatives realized up to
/// `t - 1`; the allocator's own hint provider is asked for the hint with the
/// upcoming row as `next_x`. Periods before `min_history` keep the previous
/// weights.
pub fn run(
    allocator: &mut dyn Allocator,
    assets: &[String],
    relatives: &[Vec<f64>],
) -> Result<RunReport> {
    let m = assets.len();
    if m == 0 || relatives.is_empty() {
        return Err(PortfolioError::InvalidConfig(
            "backtest needs at least one asset and one period".to_string(),
        ));
    }
    for row in relatives {
        ensure_len(row, m)?;
    }

    let info = allocator.info();
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        allocator = allocator.name(),
        assets = m,
        periods = relatives.len(),
        "backtest started"
    );

    let hint = fetch_hint(allocator, info.hinted, &relatives[0], &[])?;
    let mut b = allocator.init_weights(assets, hint.as_deref())?;
    ensure_len(&b, m)?;
    let warmup = info.min_history.min(relatives.len());
    allocator.init_step(&relatives[..warmup], hint.as_deref())?;

    let mut wealth = dot(&b, &relatives[0])?;
    let mut weights = vec![b.clone()];
    let mut curve = vec![wealth];

    for t in 1..relatives.len() {
        if t >= info.min_history {
            let history = &relatives[..t];
            let hint = fetch_hint(allocator, info.hinted, &relatives[t], history)?;
            b = allocator.step(&relatives[t - 1], &b, history, hint.as_deref())?;
            ensure_len(&b, m)?;
        }
        wealth *= dot(&b, &relatives[t])?;
        weights.push(b.clone());
        curve.push(wealth);
    }

    tracing::info!(%run_id, final_wealth = wealth, "backtest finished");
    Ok(RunReport {
        run_id,
        started_at,
        allocator: allocator.name().to_string(),
        info,
        assets: assets.to_vec(),
        periods: relatives.len(),
        weights,
        wealth: curve,
        final_wealth: wealth,
    })
}

/// Seeded log-normal price relatives for `periods` periods of `m` assets.
pub fn synthetic_relatives(
    m: usize,
    periods: usize,
    drift: f64,
    volatility: f64,
    seed: u64,
) -> Result<Vec<Vec<f64>>> {
    let dist = LogNormal::new(drift, volatility).map_err(|e| {
        PortfolioError::InvalidConfig(format!("invalid drift/volatility: {e}"))
    })?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..periods)
        .map(|_| (0..m).map(|_| dist.sample(&mut rng)).collect())
        .collect())
}
