// hexrotor_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Hexrotor: a six-rotor UAV fault and disturbance simulator.
///
/// This struct defines the command-line arguments for any binary that drives
/// the simulation library.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run. Built-in defaults
    /// (the reference hover run) are used when omitted.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Write the per-tick time series to this CSV file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the scenario's total simulated time in seconds.
    #[arg(long)]
    pub total_time: Option<f64>,

    /// Override the scenario's integration time step in seconds.
    #[arg(long)]
    pub dt: Option<f64>,
}
