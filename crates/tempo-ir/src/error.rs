//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Bit not registered in the circuit.
    #[error("Bit '{bit}' not found in circuit{}", format_op_context(.operation))]
    BitNotFound {
        /// The bit that was not found.
        bit: String,
        /// Optional operation name for context.
        operation: Option<String>,
    },

    /// A bit with this name is already registered.
    #[error("Bit '{0}' is already registered")]
    DuplicateBit(String),

    /// A quantum operation was applied to a classical bit.
    #[error("Bit '{bit}' is classical and cannot be used by '{operation}'")]
    NotAQubit {
        /// The classical bit.
        bit: String,
        /// Operation that tried to use it.
        operation: String,
    },

    /// Operation applied to the wrong number of qubits.
    #[error("Operation '{operation}' acts on {expected} qubits, got {got}")]
    ArityMismatch {
        /// Name of the operation.
        operation: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// A readout sampler was used before a random source was attached.
    #[error("Readout sampler has no random source attached")]
    DetachedSampler,
}

/// Formats optional operation context for error messages.
fn format_op_context(operation: &Option<String>) -> String {
    match operation {
        Some(name) => format!(" (operation: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
