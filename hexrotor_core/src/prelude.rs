// hexrotor_core/src/prelude.rs

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::types::{
    Attitude, DisturbanceEstimate, RotorCommand, RotorHealth, VehicleState,
};

// --- Errors ---
pub use crate::error::{CoreError, CoreResult};

// --- Concrete Components ---
pub use crate::estimation::disturbance_observer::DisturbanceObserver;
pub use crate::fdi::FaultDetector;
pub use crate::models::rigid_body::RigidBodyModel;
