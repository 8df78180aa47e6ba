//! Tempo Reference Density-Matrix Backend
//!
//! A small exact simulator for timed circuits built with `tempo-build`. It
//! keeps a dense `2^n x 2^n` density matrix, so it is meant for tests and
//! few-qubit experiments, not for scale.
//!
//! # Features
//!
//! - **Native operations**: rotations, controlled phase, partial iSWAP
//! - **Noise channels**: T1/T2 decay during idles, rotation dephasing,
//!   flux-noise dephasing, butterfly excitation/decay, reset
//! - **Measurement**: projective readout through the circuit's
//!   [`ReadoutSampler`](tempo_ir::ReadoutSampler)
//! - **Controller**: named circuits on one state with recorded outcomes
//!
//! # Memory
//!
//! | Qubits | Matrix size |
//! |--------|-------------|
//! | 4 | 4 KB |
//! | 8 | 1 MB |
//! | 10 | 16 MB |
//!
//! # Example
//!
//! ```rust
//! use tempo_adapter_dm::DensityMatrixBackend;
//! use tempo_ir::{Backend, Circuit, Operation, ScheduledOp};
//!
//! let mut circuit = Circuit::new("flip");
//! circuit.add_qubit("q", f64::INFINITY, f64::INFINITY).unwrap();
//! let flip = Operation::RotateX { angle: std::f64::consts::PI, dephasing_axis: 0.0, dephasing_angle: 0.0 };
//! circuit.add_operation(ScheduledOp::new(flip, vec!["q".into()], 10.0)).unwrap();
//!
//! let backend = DensityMatrixBackend::new();
//! let mut state = backend.prepare(&circuit).unwrap();
//! backend.apply(&circuit, &mut state).unwrap();
//! assert!((state.diagonal()[1] - 1.0).abs() < 1e-12);
//! ```

pub mod backend;
pub mod channels;
pub mod controller;
pub mod density;
pub mod error;

pub use backend::{DensityMatrixBackend, MAX_QUBITS, SimState};
pub use controller::{ControlOp, Controller, MultinomialSampler, OutcomeSampler, RECORD};
pub use density::DensityMatrix;
pub use error::{DmError, DmResult};
