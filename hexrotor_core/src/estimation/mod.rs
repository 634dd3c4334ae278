// hexrotor_core/src/estimation/mod.rs

pub mod disturbance_observer;
