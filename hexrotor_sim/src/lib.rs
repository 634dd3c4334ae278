// hexrotor_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the hexrotor_sim crate.
pub mod prelude;

pub mod cli;
pub mod driver;
pub mod output;
pub mod scenario;
