//! Error types for the density-matrix backend.

use tempo_ir::IrError;
use thiserror::Error;

/// Errors raised while executing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DmError {
    /// A circuit was registered under a reserved control keyword.
    #[error("'{0}' is a protected keyword")]
    ProtectedKeyword(String),

    /// No circuit registered under this name.
    #[error("Unknown circuit '{0}'")]
    UnknownCircuit(String),

    /// A measurement has no readout sampler.
    #[error("Measurement of '{qubit}' has no readout sampler")]
    MissingSampler {
        /// The measured qubit.
        qubit: String,
    },

    /// The state would exceed the dense-matrix limit.
    #[error("Requested {requested} qubits, the dense backend supports at most {max}")]
    TooManyQubits {
        /// Requested qubit count.
        requested: usize,
        /// Backend limit.
        max: usize,
    },

    /// A circuit names a bit the state does not hold.
    #[error("Bit '{0}' is not part of the simulated state")]
    UnknownBit(String),

    /// Projection onto an outcome with vanishing probability.
    #[error("Cannot project '{qubit}' onto |{outcome}>: probability is zero")]
    Normalization {
        /// The projected qubit.
        qubit: String,
        /// The requested outcome.
        outcome: u8,
    },

    /// An adjustable-gate index does not name a single-angle rotation.
    #[error("Operation {index} of circuit '{circuit}' has no adjustable angle")]
    NotAdjustable {
        /// The circuit name.
        circuit: String,
        /// The rejected operation index.
        index: usize,
    },

    /// A parametrized run supplied the wrong number of angles.
    #[error("Circuit '{circuit}' has {expected} adjustable gates, got {got} angles")]
    AdjustableMismatch {
        /// The circuit name.
        circuit: String,
        /// Registered adjustable gates.
        expected: usize,
        /// Supplied angles.
        got: usize,
    },

    /// IR error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for backend operations.
pub type DmResult<T> = Result<T, DmError>;
