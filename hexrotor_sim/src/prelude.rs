// hexrotor_sim/src/prelude.rs

pub use crate::cli::Cli;
pub use crate::driver::{DriverError, SimulationDriver, SimulationHistory, TickRecord};
pub use crate::output::{write_csv, write_csv_to};
pub use crate::scenario::{ScenarioConfig, ScenarioError, ScenarioScript};

// Re-export the core components the driver is built around.
pub use hexrotor_core::prelude::*;
