// hexrotor_core/src/fdi.rs

use crate::error::{CoreError, CoreResult};
use crate::types::{RotorCommand, RotorHealth};
use nalgebra::DVector;

/// Fault detection, isolation and thrust compensation for the rotor set.
///
/// Detection classifies each rotor from its speed-tracking error against a
/// fixed threshold; compensation redistributes a desired thrust equally
/// across the rotors currently classified healthy. Both calls are stateless
/// transforms of their inputs; the stored health vector is a convenience
/// cache of the last detection, not required for correctness of either call.
#[derive(Debug, Clone)]
pub struct FaultDetector {
    num_rotors: usize,
    threshold: f64,
    health: RotorHealth,
}

impl FaultDetector {
    /// Creates a detector with all rotors initially healthy.
    pub fn new(num_rotors: usize, threshold: f64) -> Self {
        Self {
            num_rotors,
            threshold,
            health: DVector::from_element(num_rotors, 1.0),
        }
    }

    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Health flags from the last detection, copied out.
    pub fn health(&self) -> RotorHealth {
        self.health.clone()
    }

    /// Classifies each rotor from `|measured − expected|` against the
    /// threshold and overwrites the stored health vector with the result.
    ///
    /// The comparison is strict less-than: an error exactly at the threshold
    /// marks the rotor faulty.
    pub fn detect_faults(
        &mut self,
        measured: &RotorCommand,
        expected: &RotorCommand,
    ) -> CoreResult<RotorHealth> {
        if measured.len() != expected.len() {
            return Err(CoreError::SpeedLengthMismatch {
                measured: measured.len(),
                expected: expected.len(),
            });
        }
        if measured.len() != self.num_rotors {
            return Err(CoreError::RotorCountMismatch {
                expected: self.num_rotors,
                got: measured.len(),
            });
        }

        self.health = measured.zip_map(expected, |m, e| {
            if (m - e).abs() < self.threshold {
                1.0
            } else {
                0.0
            }
        });
        Ok(self.health.clone())
    }

    /// Splits `desired_thrust` equally across healthy rotors; faulty rotors
    /// get zero. With no healthy rotors left the whole command is zero
    /// (total-failure policy), which is a defined outcome, not an error.
    ///
    /// The split value is used directly as a per-rotor speed, with no
    /// inversion through the square-law thrust relation.
    pub fn compensate_thrust(
        &self,
        desired_thrust: f64,
        health: &RotorHealth,
    ) -> CoreResult<RotorCommand> {
        if health.len() != self.num_rotors {
            return Err(CoreError::RotorCountMismatch {
                expected: self.num_rotors,
                got: health.len(),
            });
        }

        let healthy_count = health.sum();
        if healthy_count == 0.0 {
            return Ok(RotorCommand::zeros(self.num_rotors));
        }

        // Health flags are exactly 1.0/0.0, so scaling them assigns the
        // per-rotor share to healthy rotors and zero to the rest.
        Ok(health * (desired_thrust / healthy_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPS: f64 = 1e-12;

    #[test]
    fn all_rotors_start_healthy() {
        let fdi = FaultDetector::new(6, 0.1);
        assert_eq!(fdi.num_rotors(), 6);
        assert_abs_diff_eq!(fdi.threshold(), 0.1, epsilon = EPS);
        assert_eq!(fdi.health(), DVector::from_element(6, 1.0));
    }

    #[test]
    fn detection_flags_only_deviating_rotors() {
        let mut fdi = FaultDetector::new(6, 0.1);
        let expected = DVector::from_element(6, 400.0);
        let mut measured = expected.clone();
        measured[2] = 350.0;

        let health = fdi.detect_faults(&measured, &expected).unwrap();
        assert_eq!(
            health.as_slice(),
            &[1.0, 1.0, 0.0, 1.0, 1.0, 1.0][..]
        );
        // Detection overwrites the cached state.
        assert_eq!(fdi.health(), health);
    }

    #[test]
    fn error_exactly_at_threshold_is_faulty() {
        let mut fdi = FaultDetector::new(3, 0.1);
        // Errors of exactly 0.0, 0.1 (the threshold, bit-exact) and 0.05.
        let expected = DVector::zeros(3);
        let measured = DVector::from_column_slice(&[0.0, 0.1, 0.05]);

        let health = fdi.detect_faults(&measured, &expected).unwrap();
        assert_eq!(health.as_slice(), &[1.0, 0.0, 1.0][..]);
    }

    #[test]
    fn detection_rejects_mismatched_inputs() {
        let mut fdi = FaultDetector::new(6, 0.1);
        let err = fdi
            .detect_faults(&DVector::zeros(6), &DVector::zeros(5))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::SpeedLengthMismatch {
                measured: 6,
                expected: 5
            }
        );

        let err = fdi
            .detect_faults(&DVector::zeros(4), &DVector::zeros(4))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::RotorCountMismatch {
                expected: 6,
                got: 4
            }
        );
    }

    #[test]
    fn equal_split_across_healthy_rotors() {
        let fdi = FaultDetector::new(6, 0.1);
        let health = DVector::from_column_slice(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        let command = fdi.compensate_thrust(300.0, &health).unwrap();
        assert_abs_diff_eq!(
            command,
            DVector::from_column_slice(&[100.0, 100.0, 100.0, 0.0, 0.0, 0.0]),
            epsilon = EPS
        );
    }

    #[test]
    fn all_faulty_yields_zero_command() {
        let fdi = FaultDetector::new(6, 0.1);
        let command = fdi.compensate_thrust(300.0, &DVector::zeros(6)).unwrap();
        assert_eq!(command, DVector::zeros(6));
    }

    #[test]
    fn compensation_rejects_wrong_health_length() {
        let fdi = FaultDetector::new(6, 0.1);
        let err = fdi
            .compensate_thrust(300.0, &DVector::zeros(3))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::RotorCountMismatch {
                expected: 6,
                got: 3
            }
        );
    }
}
