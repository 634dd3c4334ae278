// hexrotor_core/src/lib.rs

// This file defines the public modules of the library.
pub mod error;
pub mod estimation;
pub mod fdi;
pub mod models;
pub mod prelude;
pub mod types;
