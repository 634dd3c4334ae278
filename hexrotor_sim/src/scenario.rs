// hexrotor_sim/src/scenario.rs

//! Scenario configuration and time-scripted injection.
//!
//! A scenario TOML file describes the vehicle, the observer/FDI tuning and
//! the scripted events (wind disturbances, rotor faults) for one run. The
//! "what happens" lives here as pure functions of elapsed simulated time;
//! the dynamics components never know about the script.

use figment::{
    providers::{Format, Toml},
    Figment,
};
use hexrotor_core::types::{Attitude, RotorCommand};
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario file not found: {0}")]
    NotFound(String),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] Box<figment::Error>),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

// =========================================================================
// == Configuration Structs ==
// These map directly to the sections of a scenario.toml file. Defaults
// reproduce the reference hover run.
// =========================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use defaults if the [simulation] section is missing
    pub simulation: SimulationSection,

    #[serde(default)]
    pub vehicle: VehicleSection,

    #[serde(default)]
    pub observer: ObserverSection,

    #[serde(default)]
    pub fdi: FdiSection,

    // `[[disturbances]]` and `[[rotor_faults]]` become Vecs of event structs.
    #[serde(default)]
    pub disturbances: Vec<DisturbanceWindow>,

    #[serde(default)]
    pub rotor_faults: Vec<RotorFault>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Total simulated time in seconds.
    pub total_time: f64,
    /// Fixed integration time step in seconds.
    pub dt: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            total_time: 2.0,
            dt: 0.01,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleSection {
    pub mass: f64,
    pub gravity: f64,
    /// Diagonal of the linear air-resistance matrix.
    pub air_resistance: [f64; 3],
    /// Constant in the square-law thrust relation.
    pub thrust_const: f64,
    pub num_rotors: usize,
    /// Fixed ZYX Euler attitude for the whole run, radians.
    pub attitude: Attitude,
    /// Initial `(x, y, z, vx, vy, vz)`.
    pub initial_state: [f64; 6],
    /// Commanded speed for every rotor before compensation.
    pub base_rotor_speed: f64,
}

impl Default for VehicleSection {
    fn default() -> Self {
        Self {
            mass: 6.0,
            gravity: 9.81,
            air_resistance: [0.1, 0.1, 0.1],
            thrust_const: 0.05,
            num_rotors: 6,
            attitude: Attitude::new(0.1, 0.05, 0.2),
            initial_state: [0.0; 6],
            base_rotor_speed: 400.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverSection {
    /// Observer gain matrix, row-major 3x3.
    pub gain: [[f64; 3]; 3],
}

impl Default for ObserverSection {
    fn default() -> Self {
        Self {
            gain: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

impl ObserverSection {
    pub fn gain_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|r, c| self.gain[r][c])
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FdiSection {
    /// Speed-tracking error threshold for fault detection.
    pub threshold: f64,
    /// Total "thrust" quantity the compensator splits across healthy rotors.
    /// Defaults to `base_rotor_speed * num_rotors`, so an all-healthy hexarotor
    /// flies the base command unchanged.
    pub desired_thrust: Option<f64>,
}

impl Default for FdiSection {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            desired_thrust: None,
        }
    }
}

/// A constant external force active over a time window.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisturbanceWindow {
    /// Activation time (inclusive), seconds.
    pub start: f64,
    /// Deactivation time (exclusive). Absent means active until the end.
    pub end: Option<f64>,
    pub force: [f64; 3],
}

/// A rotor whose measured speed is degraded over a time window.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotorFault {
    pub rotor: usize,
    /// Activation time (inclusive), seconds.
    pub start: f64,
    /// Deactivation time (exclusive). Absent means active until the end.
    pub end: Option<f64>,
    /// Factor applied to the commanded speed to form the measured speed.
    /// 0.0 is a dead rotor, 0.8 a 20% underperformance.
    pub speed_scale: f64,
}

impl ScenarioConfig {
    /// Loads and validates a scenario from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        if !path.exists() {
            return Err(ScenarioError::NotFound(path.display().to_string()));
        }
        let config: Self = Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.simulation.dt <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "dt must be positive, got {}",
                self.simulation.dt
            )));
        }
        if self.simulation.total_time <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "total_time must be positive, got {}",
                self.simulation.total_time
            )));
        }
        if self.vehicle.mass <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "vehicle mass must be positive, got {}",
                self.vehicle.mass
            )));
        }
        if self.vehicle.num_rotors == 0 {
            return Err(ScenarioError::Invalid(
                "vehicle must have at least one rotor".to_string(),
            ));
        }
        for fault in &self.rotor_faults {
            if fault.rotor >= self.vehicle.num_rotors {
                return Err(ScenarioError::Invalid(format!(
                    "rotor fault index {} out of range for {} rotors",
                    fault.rotor, self.vehicle.num_rotors
                )));
            }
        }
        Ok(())
    }

    /// The thrust quantity handed to the compensator each tick.
    pub fn desired_thrust(&self) -> f64 {
        self.fdi
            .desired_thrust
            .unwrap_or(self.vehicle.base_rotor_speed * self.vehicle.num_rotors as f64)
    }
}

// =========================================================================
// == Scripted Injection ==
// =========================================================================

/// The scripted events of a scenario as pure functions of elapsed time.
#[derive(Debug, Clone, Default)]
pub struct ScenarioScript {
    disturbances: Vec<DisturbanceWindow>,
    faults: Vec<RotorFault>,
}

impl ScenarioScript {
    pub fn new(disturbances: Vec<DisturbanceWindow>, faults: Vec<RotorFault>) -> Self {
        Self {
            disturbances,
            faults,
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self::new(config.disturbances.clone(), config.rotor_faults.clone())
    }

    fn window_active(start: f64, end: Option<f64>, t: f64) -> bool {
        t >= start && end.map_or(true, |e| t < e)
    }

    /// Sum of all disturbance forces active at time `t`.
    pub fn disturbance_at(&self, t: f64) -> Vector3<f64> {
        self.disturbances
            .iter()
            .filter(|w| Self::window_active(w.start, w.end, t))
            .fold(Vector3::zeros(), |acc, w| {
                acc + Vector3::from_column_slice(&w.force)
            })
    }

    /// Measured rotor speeds at time `t`: the commanded speeds with every
    /// active fault's degradation factor applied.
    pub fn measured_speeds_at(&self, t: f64, commanded: &RotorCommand) -> RotorCommand {
        let mut measured = commanded.clone();
        for fault in &self.faults {
            if Self::window_active(fault.start, fault.end, t) && fault.rotor < measured.len() {
                measured[fault.rotor] *= fault.speed_scale;
            }
        }
        measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;

    const EPS: f64 = 1e-12;

    #[test]
    fn default_config_is_valid_and_matches_reference_run() {
        let config = ScenarioConfig::default();
        config.validate().unwrap();
        assert_abs_diff_eq!(config.simulation.total_time, 2.0, epsilon = EPS);
        assert_abs_diff_eq!(config.simulation.dt, 0.01, epsilon = EPS);
        assert_abs_diff_eq!(config.vehicle.mass, 6.0, epsilon = EPS);
        assert_abs_diff_eq!(config.desired_thrust(), 2400.0, epsilon = EPS);
        assert_eq!(config.observer.gain_matrix(), Matrix3::identity());
    }

    #[test]
    fn demo_scenario_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets/scenarios/hover_wind_fault.toml");
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.disturbances.len(), 1);
        assert_eq!(config.rotor_faults.len(), 1);
        assert_eq!(config.rotor_faults[0].rotor, 3);
    }

    #[test]
    fn missing_scenario_file_is_reported() {
        let err = ScenarioConfig::load(Path::new("no/such/scenario.toml")).unwrap_err();
        assert!(matches!(err, ScenarioError::NotFound(_)));
    }

    #[test]
    fn validation_rejects_bad_scenarios() {
        let mut config = ScenarioConfig::default();
        config.simulation.dt = 0.0;
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.rotor_faults.push(RotorFault {
            rotor: 6,
            start: 0.0,
            end: None,
            speed_scale: 0.5,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn disturbance_window_edges() {
        let script = ScenarioScript::new(
            vec![DisturbanceWindow {
                start: 1.0,
                end: Some(1.5),
                force: [0.5, 0.3, 0.0],
            }],
            vec![],
        );
        assert_abs_diff_eq!(script.disturbance_at(0.99), Vector3::zeros(), epsilon = EPS);
        // Inclusive at start, exclusive at end.
        assert_abs_diff_eq!(
            script.disturbance_at(1.0),
            Vector3::new(0.5, 0.3, 0.0),
            epsilon = EPS
        );
        assert_abs_diff_eq!(script.disturbance_at(1.5), Vector3::zeros(), epsilon = EPS);
    }

    #[test]
    fn open_ended_disturbances_overlap_additively() {
        let script = ScenarioScript::new(
            vec![
                DisturbanceWindow {
                    start: 0.0,
                    end: None,
                    force: [1.0, 0.0, 0.0],
                },
                DisturbanceWindow {
                    start: 1.0,
                    end: None,
                    force: [0.0, 2.0, 0.0],
                },
            ],
            vec![],
        );
        assert_abs_diff_eq!(
            script.disturbance_at(5.0),
            Vector3::new(1.0, 2.0, 0.0),
            epsilon = EPS
        );
    }

    #[test]
    fn fault_scales_only_its_rotor_inside_the_window() {
        let script = ScenarioScript::new(
            vec![],
            vec![RotorFault {
                rotor: 2,
                start: 0.5,
                end: None,
                speed_scale: 0.8,
            }],
        );
        let commanded = DVector::from_element(6, 400.0);

        let before = script.measured_speeds_at(0.4, &commanded);
        assert_eq!(before, commanded);

        let after = script.measured_speeds_at(0.5, &commanded);
        assert_abs_diff_eq!(after[2], 320.0, epsilon = EPS);
        assert_abs_diff_eq!(after[0], 400.0, epsilon = EPS);
    }
}
