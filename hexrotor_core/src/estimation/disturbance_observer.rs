// hexrotor_core/src/estimation/disturbance_observer.rs

use crate::error::{CoreError, CoreResult};
use crate::types::{velocity, DisturbanceEstimate, VehicleState};
use nalgebra::{Matrix3, Vector3};

/// Integral observer for lumped external forces.
///
/// Each update compares the nominal acceleration predicted from thrust and
/// gravity against an acceleration proxy derived from the measured velocity,
/// and integrates the gain-weighted error into a running estimate. The
/// estimate accumulates across calls and is only zero at construction.
///
/// The observer's `mass` must equal the modeled vehicle mass for the
/// estimate to be meaningful; this is not enforced.
#[derive(Debug, Clone)]
pub struct DisturbanceObserver {
    mass: f64,
    gravity: f64,
    gain: Matrix3<f64>,
    estimate: DisturbanceEstimate,
}

impl DisturbanceObserver {
    /// Creates an observer with the identity gain matrix.
    pub fn new(mass: f64, gravity: f64) -> Self {
        Self::with_gain(mass, gravity, Matrix3::identity())
    }

    /// Creates an observer with an explicit 3x3 gain matrix. Non-diagonal
    /// gains are legal.
    pub fn with_gain(mass: f64, gravity: f64, gain: Matrix3<f64>) -> Self {
        Self {
            mass,
            gravity,
            gain,
            estimate: DisturbanceEstimate::zeros(),
        }
    }

    /// Current accumulated estimate, returned by value.
    pub fn estimate(&self) -> DisturbanceEstimate {
        self.estimate
    }

    /// Folds one tick of evidence into the estimate and returns the updated
    /// value.
    ///
    /// The acceleration proxy is `velocity / dt`, not a finite difference;
    /// the estimator is tuned around that exact quantity. `dt <= 0` is a
    /// contract violation (and would divide by zero).
    pub fn update(
        &mut self,
        state: &VehicleState,
        thrust_direction: &Vector3<f64>,
        total_thrust: f64,
        dt: f64,
    ) -> CoreResult<DisturbanceEstimate> {
        if dt <= 0.0 {
            return Err(CoreError::NonPositiveTimeStep(dt));
        }

        let nominal_accel =
            (total_thrust / self.mass) * thrust_direction - Vector3::new(0.0, 0.0, self.gravity);
        let actual_accel = velocity(state) / dt;

        let error = actual_accel - nominal_accel;
        self.estimate += dt * (self.gain * error);

        Ok(self.estimate)
    }
}
