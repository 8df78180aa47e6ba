//! Tempo Timed Circuit Builder
//!
//! This crate turns symbolic gate requests (`"CZ" on (cp, swap)`) into timed
//! noisy circuits for a density-matrix simulator. Every qubit carries a
//! logical clock; each gate is placed after the latest clock of its qubits
//! and advances them by its duration.
//!
//! # Architecture
//!
//! ```text
//! QubitConfig ──► quick_setup ──► Setup ──► Builder ──► finalize ──► Circuit
//!                                   │          │
//!                  TemplateRegistry ┤          ├── add_gate / add_lines
//!                  GateSet ─────────┘          └── update (flux redraw)
//! ```
//!
//! - [`TemplateRegistry`]: alias → [`GateTemplate`], each with its own
//!   [`Insertion`] strategy
//! - [`GateSet`]: `(gate, qubits)` instances with parameters resolved from
//!   the qubits' records
//! - [`Builder`]: clocks, scheduling, the request log and update rules
//! - [`Finalizer`]: idle padding and execution ordering
//!
//! # Example: Bell state
//!
//! ```rust
//! use tempo_build::{Builder, FinalizeOptions, Lifetimes, QubitConfig, quick_setup};
//! use tempo_ir::seeded_rng;
//!
//! let setup = quick_setup(&["swap", "cp"], None, &QubitConfig::noiseless(), seeded_rng(42)).unwrap();
//! let mut builder = Builder::new(setup).unwrap();
//! builder.begin_circuit("bell", Lifetimes::default()).unwrap();
//!
//! builder
//!     .add_lines([
//!         "Ry 1.5707963267948966 swap",
//!         "Ry 1.5707963267948966 cp",
//!         "CZ cp swap",
//!         "Ry -1.5707963267948966 cp",
//!     ])
//!     .unwrap();
//!
//! let duration = builder.finalize(FinalizeOptions::default()).unwrap();
//! assert_eq!(duration, 80.0);
//! assert_eq!(builder.log().len(), 4);
//! ```

pub mod args;
pub mod builder;
pub mod connectivity;
pub mod error;
pub mod finalize;
pub mod gate_set;
pub mod gates;
pub mod presets;
pub mod registry;
pub mod request;
pub mod setup;
pub mod template;
pub mod update;

pub use args::{ArgName, ArgSource, GateArgs};
pub use builder::{Builder, Lifetimes};
pub use connectivity::Connectivity;
pub use error::{BuildError, BuildResult};
pub use finalize::{FinalizeOptions, Finalized, Finalizer};
pub use gate_set::{BuilderArgs, GateKey, GateSet, GateSetEntry, GateSetRecord};
pub use gates::{LIBRARY_NAMES, library_template};
pub use presets::{QubitConfig, asymmetric_setup, depolarizing_setup, quick_setup};
pub use registry::{DEPOLARIZING_ALIASES, TRANSMON_ALIASES, TemplateRegistry};
pub use request::{GateRequest, RequestItem};
pub use setup::Setup;
pub use template::{GateCall, GateTemplate, Insertion};
pub use update::{QuasistaticFluxUpdate, UpdateRule, rule_by_name};
