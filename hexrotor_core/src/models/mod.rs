// hexrotor_core/src/models/mod.rs

pub mod rigid_body;
