use anyhow::{Context, Result};

use hint_portfolio::backtest::{self, synthetic_relatives};
use hint_portfolio::config::Config;
use hint_portfolio::hint::HintProvider;
use hint_portfolio::strategy_catalog::{build_allocator, build_hint_provider, AllocatorKind};

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set HP_CONFIG_PATH or create config/default.toml");
            std::process::exit(1);
        }
    };

    // Log to file so stdout carries only the JSON report
    let log_file = std::fs::File::create("hint-portfolio.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let sim = &config.simulation;
    tracing::info!(
        allocator = %config.allocator.kind,
        assets = sim.assets.len(),
        periods = sim.periods,
        "Starting hint-portfolio"
    );

    let relatives = synthetic_relatives(
        sim.assets.len(),
        sim.periods,
        sim.drift,
        sim.volatility,
        sim.seed,
    )
    .context("failed to generate price relatives")?;

    let kind: AllocatorKind = config.allocator.kind.parse()?;
    let hinter = if kind.is_hinted() {
        let mut hinter = build_hint_provider(&config.hint, sim.assets.len())?;
        // Train on the first half against next-period targets.
        let split = relatives.len() / 2;
        hinter
            .train(&relatives[..split], &relatives[1..=split])
            .context("hint provider training failed")?;
        Some(hinter)
    } else {
        None
    };

    let mut allocator = build_allocator(&config.allocator, hinter)?;
    let report = backtest::run(allocator.as_mut(), &sim.assets, &relatives)
        .context("backtest failed")?;

    tracing::info!(final_wealth = report.final_wealth, "Run complete");
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize run report")?
    );
    Ok(())
}
