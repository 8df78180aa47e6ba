//! Error types for circuit assembly.

use tempo_ir::IrError;
use thiserror::Error;

/// Errors that can occur while configuring or driving a builder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// No template registered under this name.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// The gate exists but has no instance on these qubits.
    #[error("Gate '{gate}' is not defined on qubits [{}]", .qubits.join(", "))]
    UnknownInstance {
        /// Gate alias.
        gate: String,
        /// Requested qubits.
        qubits: Vec<String>,
    },

    /// Only one- and two-qubit templates can be materialized.
    #[error("Gate '{gate}' has unsupported arity {arity}")]
    UnsupportedArity {
        /// Gate alias.
        gate: String,
        /// Declared arity.
        arity: usize,
    },

    /// A request could not be matched to the gate's declared arguments.
    #[error("Malformed request for '{gate}': {reason}")]
    MalformedRequest {
        /// Gate alias, or the raw request when no gate could be read.
        gate: String,
        /// What was wrong.
        reason: String,
    },

    /// A parameter needed to schedule or insert the gate is unset.
    #[error("Gate '{gate}' is missing parameter '{param}'")]
    MissingParameter {
        /// Gate alias.
        gate: String,
        /// Missing parameter or argument name.
        param: String,
    },

    /// Quasistatic flux on a two-qubit gate needs a high-frequency first qubit.
    #[error("Quasistatic flux on '{qubit}' requires it to be a high-frequency qubit")]
    FluxRequiresHighFrequency {
        /// First qubit of the gate.
        qubit: String,
    },

    /// The qubit is not in the roster or is classical.
    #[error("Unknown qubit '{0}'")]
    UnknownQubit(String),

    /// No update rule registered under this name.
    #[error("Unknown update rule '{0}'")]
    UnknownUpdateRule(String),

    /// Configuration values out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IR error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Reading or writing a persisted setup failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;

impl BuildError {
    pub(crate) fn malformed(gate: impl Into<String>, reason: impl Into<String>) -> Self {
        BuildError::MalformedRequest {
            gate: gate.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(gate: impl Into<String>, param: impl Into<String>) -> Self {
        BuildError::MissingParameter {
            gate: gate.into(),
            param: param.into(),
        }
    }
}
