use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::hint::noisy_oracle::DEFAULT_NOISE_SCALE;
use crate::strategy::up::DEFAULT_EVAL_POINTS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub hint: HintConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub assets: Vec<String>,
    pub periods: usize,
    #[serde(default)]
    pub seed: u64,
    /// Mean log price relative per period.
    #[serde(default)]
    pub drift: f64,
    /// Standard deviation of the log price relative per period.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocatorConfig {
    pub kind: String,
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_unhinted")]
    pub unhinted: String,
    #[serde(default = "default_eval_points")]
    pub eval_points: usize,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    #[serde(default)]
    pub mesh_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HintConfig {
    #[serde(default = "default_hint_kind")]
    pub kind: String,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,
    #[serde(default)]
    pub seed: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            kind: default_hint_kind(),
            window: default_window(),
            noise_scale: default_noise_scale(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_volatility() -> f64 {
    0.02
}

fn default_lambda() -> f64 {
    0.5
}

fn default_mode() -> String {
    "add".to_string()
}

fn default_unhinted() -> String {
    "ucrp".to_string()
}

fn default_eval_points() -> usize {
    DEFAULT_EVAL_POINTS
}

fn default_leverage() -> f64 {
    1.0
}

fn default_hint_kind() -> String {
    "ma_reversion".to_string()
}

fn default_window() -> usize {
    5
}

fn default_noise_scale() -> f64 {
    DEFAULT_NOISE_SCALE
}

fn config_path() -> PathBuf {
    std::env::var("HP_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/default.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate().context("config is invalid")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.assets.is_empty() {
            bail!("simulation.assets must list at least one asset");
        }
        if sim.periods == 0 {
            bail!("simulation.periods must be > 0");
        }
        if !sim.volatility.is_finite() || sim.volatility < 0.0 {
            bail!(
                "simulation.volatility must be finite and >= 0, got {}",
                sim.volatility
            );
        }

        let alloc = &self.allocator;
        if !(0.0..=1.0).contains(&alloc.lambda) {
            bail!("allocator.lambda must be in [0, 1], got {}", alloc.lambda);
        }
        if alloc.eval_points == 0 {
            bail!("allocator.eval_points must be > 0");
        }
        if !alloc.leverage.is_finite() || alloc.leverage <= 0.0 {
            bail!("allocator.leverage must be > 0, got {}", alloc.leverage);
        }

        if self.hint.window == 0 {
            bail!("hint.window must be > 0");
        }
        Ok(())
    }
}
