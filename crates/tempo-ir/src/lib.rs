//! Tempo Timed Circuit Representation
//!
//! This crate provides the data structures shared between the circuit
//! builder and simulator backends: qubit parameter records, native timed
//! operations, and the circuit container that backends execute.
//!
//! # Core Components
//!
//! - **Qubits**: [`Qubit`] and [`QubitRoster`] with typed [`QubitParams`]
//!   keyed by the closed [`ParamKey`] set
//! - **Values**: [`Value`] for parameters and gate arguments
//! - **Operations**: [`Operation`] placed on the timeline as [`ScheduledOp`]
//! - **Circuit**: [`Circuit`] with waiting-gate insertion and ordering
//! - **DAG**: [`TimedDag`] wire-dependency graph used for topological order
//! - **Sampling**: [`ReadoutSampler`] over a caller-seeded [`SharedRng`]
//! - **Backends**: the [`Backend`] trait implemented by simulators
//!
//! # Example
//!
//! ```rust
//! use tempo_ir::{Circuit, Operation, ScheduledOp};
//!
//! let mut circuit = Circuit::new("bell");
//! circuit.add_qubit("a", f64::INFINITY, f64::INFINITY).unwrap();
//! circuit.add_qubit("b", f64::INFINITY, f64::INFINITY).unwrap();
//!
//! let cz = Operation::CPhase { angle: std::f64::consts::PI, dephase_var: 0.0 };
//! circuit.add_operation(ScheduledOp::new(cz, vec!["a".into(), "b".into()], 20.0)).unwrap();
//!
//! circuit.add_waiting_gates(0.0, 40.0);
//! circuit.order().unwrap();
//! assert_eq!(circuit.num_ops(), 5);
//! ```

pub mod backend;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod operation;
pub mod param;
pub mod qubit;
pub mod sampler;
pub mod value;

pub use backend::Backend;
pub use circuit::Circuit;
pub use dag::TimedDag;
pub use error::{IrError, IrResult};
pub use operation::{Operation, ScheduledOp};
pub use param::{ParamKey, QubitParams};
pub use qubit::{Bit, BitKind, Qubit, QubitRoster};
pub use sampler::{Outcome, ReadoutSampler, SharedRng, seeded_rng};
pub use value::Value;
