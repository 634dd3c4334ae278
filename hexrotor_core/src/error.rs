// hexrotor_core/src/error.rs

use thiserror::Error;

/// Errors raised by the core numeric components.
///
/// Every variant is a caller contract violation. The core fails fast on all
/// of them: inputs are never truncated or padded to fit, and no retry or
/// recovery logic exists anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("rotor command is empty")]
    EmptyRotorCommand,

    #[error("rotor vector has {got} entries, component expects {expected}")]
    RotorCountMismatch { expected: usize, got: usize },

    #[error("measured speeds have {measured} entries, expected speeds have {expected}")]
    SpeedLengthMismatch { measured: usize, expected: usize },

    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
}

pub type CoreResult<T> = Result<T, CoreError>;
