use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ascent_simulation::{ScenarioRunner, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "ascent-sim")]
#[command(about = "Drive an Ascent bonding curve from launch to liquidity migration")]
struct Args {
    /// Path to scenario configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    report: Option<String>,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    init: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = args.init {
        SimulationConfig::default()
            .save(&path)
            .with_context(|| format!("writing default configuration to {}", path))?;
        info!("Wrote default configuration to {}", path);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => {
            warn!("No configuration given, using built-in defaults");
            SimulationConfig::default()
        }
    };

    info!(
        "Curve: p0={} ratio={} cap={} fee_tier={}",
        config.curve.initial_price,
        config.curve.ratio,
        config.curve.cap,
        config.curve.fee_tier.fee()
    );

    let report = ScenarioRunner::new(config)
        .context("setting up scenario")?
        .run()
        .context("running scenario")?;

    if let Some(migration) = &report.final_state.migration {
        info!(
            "Migrated into pool {} (position {}, liquidity {})",
            migration.pool, migration.position_id, migration.liquidity
        );
    }

    match args.report {
        Some(path) => {
            report.write(&path).context("writing report")?;
            info!("Report written to {}", path);
        }
        None => println!("{}", report.to_json()?),
    }

    Ok(())
}
