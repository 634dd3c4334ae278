// hexrotor_core/src/models/rigid_body.rs

use crate::error::{CoreError, CoreResult};
use crate::types::{velocity, Attitude, RotorCommand, VehicleState};
use nalgebra::{Matrix3, Vector3};

/// Translational rigid-body model of a multirotor with co-axial rotors.
///
/// All rotor thrust acts along the body z-axis; the attitude that orients
/// that axis is a kinematic input (see [`Attitude`]). The model owns its
/// state and advances it with an explicit forward-Euler step:
///
/// ```text
/// a = (P̄/M)·d̂ − (0,0,G) − (Γ·v)/M + disturbance
/// ```
///
/// where `P̄` is the total thrust, `d̂` the thrust direction, `Γ` the diagonal
/// linear air-resistance matrix. Floating-point accumulation error grows with
/// step count; no clamping or correction is applied.
#[derive(Debug, Clone)]
pub struct RigidBodyModel {
    mass: f64,
    gravity: f64,
    /// Diagonal linear air-resistance matrix Γ.
    air_resistance: Matrix3<f64>,
    thrust_const: f64,
    num_rotors: usize,
    attitude: Attitude,
    state: VehicleState,
}

impl RigidBodyModel {
    /// Creates a model at rest, level attitude, at the inertial origin.
    ///
    /// # Panics
    /// Panics if `mass` is not strictly positive.
    pub fn new(
        mass: f64,
        gravity: f64,
        air_resistance: Vector3<f64>,
        thrust_const: f64,
        num_rotors: usize,
    ) -> Self {
        assert!(mass > 0.0, "vehicle mass must be positive, got {mass}");
        Self {
            mass,
            gravity,
            air_resistance: Matrix3::from_diagonal(&air_resistance),
            thrust_const,
            num_rotors,
            attitude: Attitude::default(),
            state: VehicleState::zeros(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    /// Current `(x, y, z, vx, vy, vz)` state, returned by value.
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Replaces the attitude. No range constraints.
    pub fn set_attitude(&mut self, attitude: Attitude) {
        self.attitude = attitude;
    }

    /// Replaces the translational state. No range constraints.
    pub fn set_state(&mut self, state: VehicleState) {
        self.state = state;
    }

    /// Body-to-inertial rotation matrix for the ZYX (yaw-pitch-roll)
    /// Euler convention. Pure function of the three angles.
    pub fn rotation_matrix(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();

        Matrix3::new(
            cy * cp,
            cy * sp * sr - sy * cr,
            cy * sp * cr + sy * sr,
            sy * cp,
            sy * sp * sr + cy * cr,
            sy * sp * cr - cy * sr,
            -sp,
            cp * sr,
            cp * cr,
        )
    }

    /// Direction of the total thrust vector in the inertial frame: the body
    /// z-axis, i.e. the third column of the rotation matrix at the current
    /// attitude. Unit norm by construction.
    pub fn thrust_direction(&self) -> Vector3<f64> {
        let r = Self::rotation_matrix(self.attitude.roll, self.attitude.pitch, self.attitude.yaw);
        r.column(2).into_owned()
    }

    /// Total thrust `P̄ = p · Σ speed_k²`. Monotonic and non-negative for
    /// real speeds; an all-zero command yields zero thrust.
    pub fn total_thrust(&self, rotor_speeds: &RotorCommand) -> CoreResult<f64> {
        self.check_command(rotor_speeds)?;
        Ok(self.thrust_const * rotor_speeds.iter().map(|s| s * s).sum::<f64>())
    }

    fn check_command(&self, rotor_speeds: &RotorCommand) -> CoreResult<()> {
        if rotor_speeds.is_empty() {
            return Err(CoreError::EmptyRotorCommand);
        }
        if rotor_speeds.len() != self.num_rotors {
            return Err(CoreError::RotorCountMismatch {
                expected: self.num_rotors,
                got: rotor_speeds.len(),
            });
        }
        Ok(())
    }

    /// Advances the state by one explicit-Euler step of length `dt` and
    /// returns the authoritative post-step state.
    ///
    /// `disturbance` is a lumped external acceleration added to the nominal
    /// thrust/gravity/drag balance. `dt <= 0` is a contract violation.
    pub fn integrate(
        &mut self,
        rotor_speeds: &RotorCommand,
        dt: f64,
        disturbance: &Vector3<f64>,
    ) -> CoreResult<VehicleState> {
        if dt <= 0.0 {
            return Err(CoreError::NonPositiveTimeStep(dt));
        }

        let p_bar = self.total_thrust(rotor_speeds)?;
        let d_hat = self.thrust_direction();
        let vel = velocity(&self.state);

        let accel = (p_bar / self.mass) * d_hat
            - Vector3::new(0.0, 0.0, self.gravity)
            - (self.air_resistance * vel) / self.mass
            + disturbance;

        // Position uses the pre-step velocity, then velocity picks up the
        // acceleration: the explicit (forward) Euler ordering.
        {
            let mut pos = self.state.fixed_rows_mut::<3>(0);
            pos += vel * dt;
        }
        {
            let mut v = self.state.fixed_rows_mut::<3>(3);
            v += accel * dt;
        }

        Ok(self.state)
    }
}
