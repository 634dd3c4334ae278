// hexrotor_sim/src/driver.rs

//! The fixed-timestep simulation loop.
//!
//! Owns one independent instance of each core component and runs the strict
//! per-tick sequence: script lookup -> fault detection/compensation ->
//! integrate -> thrust geometry -> observer update -> record. Single-threaded
//! and fully deterministic given its inputs; any core error aborts the run.

use hexrotor_core::error::CoreError;
use hexrotor_core::prelude::{
    DisturbanceEstimate, DisturbanceObserver, FaultDetector, RigidBodyModel, RotorCommand,
    RotorHealth, VehicleState,
};
use nalgebra::{DVector, Vector3};
use thiserror::Error;
use tracing::{debug, info};

use crate::scenario::{ScenarioConfig, ScenarioScript};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("tick {tick} (t = {time:.3} s) failed: {source}")]
    Tick {
        tick: usize,
        time: f64,
        source: CoreError,
    },
}

/// One row of the output series. Field order is the positional contract
/// downstream consumers rely on.
#[derive(Debug, Clone)]
pub struct TickRecord {
    pub time: f64,
    pub state: VehicleState,
    pub disturbance_estimate: DisturbanceEstimate,
    pub rotor_health: RotorHealth,
}

/// The collected time series of one run.
#[derive(Debug, Clone)]
pub struct SimulationHistory {
    pub dt: f64,
    pub num_rotors: usize,
    pub records: Vec<TickRecord>,
}

/// Owns the model, observer and fault detector for one run.
///
/// Parameter sweeps that parallelize runs must construct one driver per run;
/// nothing here is shared.
pub struct SimulationDriver {
    model: RigidBodyModel,
    observer: DisturbanceObserver,
    fdi: FaultDetector,
    script: ScenarioScript,
    base_command: RotorCommand,
    desired_thrust: f64,
    total_time: f64,
    dt: f64,
}

impl SimulationDriver {
    /// Builds a driver from a validated scenario configuration.
    pub fn from_config(config: &ScenarioConfig) -> Self {
        let vehicle = &config.vehicle;

        let mut model = RigidBodyModel::new(
            vehicle.mass,
            vehicle.gravity,
            Vector3::from_column_slice(&vehicle.air_resistance),
            vehicle.thrust_const,
            vehicle.num_rotors,
        );
        model.set_attitude(vehicle.attitude);
        model.set_state(VehicleState::from_column_slice(&vehicle.initial_state));

        let observer = DisturbanceObserver::with_gain(
            vehicle.mass,
            vehicle.gravity,
            config.observer.gain_matrix(),
        );
        let fdi = FaultDetector::new(vehicle.num_rotors, config.fdi.threshold);

        Self {
            model,
            observer,
            fdi,
            script: ScenarioScript::from_config(config),
            base_command: DVector::from_element(vehicle.num_rotors, vehicle.base_rotor_speed),
            desired_thrust: config.desired_thrust(),
            total_time: config.simulation.total_time,
            dt: config.simulation.dt,
        }
    }

    /// Runs the full tick loop and returns the collected series.
    pub fn run(&mut self) -> Result<SimulationHistory, DriverError> {
        let steps = (self.total_time / self.dt).round() as usize;
        info!(
            steps,
            dt = self.dt,
            total_time = self.total_time,
            "starting simulation run"
        );

        let mut records = Vec::with_capacity(steps);
        for tick in 0..steps {
            let time = tick as f64 * self.dt;
            let record = self
                .step(tick, time)
                .map_err(|source| DriverError::Tick { tick, time, source })?;
            records.push(record);
        }

        if let Some(last) = records.last() {
            info!(
                "run complete: final position ({:.3}, {:.3}, {:.3}) m, \
                 disturbance estimate ({:.3}, {:.3}, {:.3})",
                last.state[0],
                last.state[1],
                last.state[2],
                last.disturbance_estimate[0],
                last.disturbance_estimate[1],
                last.disturbance_estimate[2],
            );
        }

        Ok(SimulationHistory {
            dt: self.dt,
            num_rotors: self.model.num_rotors(),
            records,
        })
    }

    fn step(&mut self, tick: usize, time: f64) -> Result<TickRecord, CoreError> {
        // 1. Scripted injection for this tick.
        let disturbance = self.script.disturbance_at(time);
        let measured = self.script.measured_speeds_at(time, &self.base_command);

        // 2. FDI: classify rotors, then reallocate the desired thrust. The
        //    compensated command is the model's rotor-speed input.
        let health = self.fdi.detect_faults(&measured, &self.base_command)?;
        let command = self.fdi.compensate_thrust(self.desired_thrust, &health)?;

        // 3. Advance the dynamics.
        let state = self.model.integrate(&command, self.dt, &disturbance)?;

        // 4. Thrust geometry recomputed post-step, then the observer folds in
        //    this tick's evidence.
        let thrust_direction = self.model.thrust_direction();
        let total_thrust = self.model.total_thrust(&command)?;
        let disturbance_estimate =
            self.observer
                .update(&state, &thrust_direction, total_thrust, self.dt)?;

        debug!(tick, time, ?disturbance, "tick complete");

        Ok(TickRecord {
            time,
            state,
            disturbance_estimate,
            rotor_health: health,
        })
    }
}
