// hexrotor_sim/src/main.rs

use clap::Parser;
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hexrotor_sim::cli::Cli;
use hexrotor_sim::driver::SimulationDriver;
use hexrotor_sim::output;
use hexrotor_sim::scenario::ScenarioConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.scenario {
        Some(path) => {
            info!("loading scenario from: {}", path.display());
            ScenarioConfig::load(path)?
        }
        None => {
            info!("no scenario given, using built-in defaults");
            ScenarioConfig::default()
        }
    };

    // CLI overrides are re-validated: an override can break a valid scenario.
    if let Some(total_time) = cli.total_time {
        config.simulation.total_time = total_time;
    }
    if let Some(dt) = cli.dt {
        config.simulation.dt = dt;
    }
    config.validate()?;

    let history = SimulationDriver::from_config(&config).run()?;

    if let Some(path) = &cli.output {
        output::write_csv(&history, path)?;
        info!(
            records = history.records.len(),
            "wrote time series to {}",
            path.display()
        );
    }

    Ok(())
}
