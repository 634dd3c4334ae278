// hexrotor_core/src/types.rs

use nalgebra::{DVector, Vector3, Vector6};
use serde::{Deserialize, Serialize};

// --- Core Type Aliases ---

/// Translational state in the inertial frame, ordered `(x, y, z, vx, vy, vz)`.
/// Downstream consumers (CSV export, plotting) rely on this field order
/// positionally, so it must never be reshuffled.
pub type VehicleState = Vector6<f64>;

/// Accumulated external-force estimate, ordered `(dx, dy, dz)`.
pub type DisturbanceEstimate = Vector3<f64>;

/// Per-rotor speed values. Length must match the owning component's rotor count.
pub type RotorCommand = DVector<f64>;

/// Per-rotor health flags: `1.0` healthy, `0.0` faulty.
pub type RotorHealth = DVector<f64>;

/// ZYX Euler attitude in radians.
///
/// Rotational dynamics are out of scope; the attitude is a kinematic input
/// set by the caller, not evolved by the model. Angles are plain radians
/// with no wrap-around enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Attitude {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }
}

/// Position component of a [`VehicleState`].
pub fn position(state: &VehicleState) -> Vector3<f64> {
    state.fixed_rows::<3>(0).into_owned()
}

/// Velocity component of a [`VehicleState`].
pub fn velocity(state: &VehicleState) -> Vector3<f64> {
    state.fixed_rows::<3>(3).into_owned()
}
