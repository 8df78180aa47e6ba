//! Closing a built circuit for simulation.

use rustc_hash::FxHashMap;
use tempo_ir::Circuit;
use tracing::{debug, info, instrument};

use crate::error::BuildResult;

/// How a circuit is closed. The default is a stable time sort without
/// padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinalizeOptions {
    /// Order operations along the wire DAG instead of a plain time sort.
    pub topological_order: bool,
    /// Extra idle time after the last qubit is free.
    pub padding: f64,
}

impl FinalizeOptions {
    /// Order along the wire DAG, earliest ready operation first.
    #[must_use]
    pub fn topological(mut self) -> Self {
        self.topological_order = true;
        self
    }

    /// Sort by timestamp only.
    #[must_use]
    pub fn time_sorted(mut self) -> Self {
        self.topological_order = false;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

/// Outcome of [`Finalizer::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    /// Latest clock plus padding.
    pub duration: f64,
    /// Entry `i` is the pre-finalization index of the operation now at `i`.
    /// Indices past the original operation count belong to inserted idles.
    pub order: Vec<usize>,
}

/// Pads every qubit with idles up to the circuit duration and orders the
/// operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Finalizer {
    options: FinalizeOptions,
}

impl Finalizer {
    pub fn new(options: FinalizeOptions) -> Self {
        Self { options }
    }

    #[instrument(skip_all, fields(title = circuit.title()))]
    pub fn run(
        &self,
        circuit: &mut Circuit,
        clocks: &FxHashMap<String, f64>,
    ) -> BuildResult<Finalized> {
        let duration = clocks.values().copied().fold(0.0, f64::max) + self.options.padding;
        let idles = circuit.add_waiting_gates(0.0, duration);
        debug!("Inserted {} idle operations", idles);

        let order = if self.options.topological_order {
            circuit.order()?
        } else {
            circuit.sort_by_time()
        };

        info!(
            "Finalized circuit with {} operations over {:.3}",
            circuit.num_ops(),
            duration
        );
        Ok(Finalized { duration, order })
    }
}
