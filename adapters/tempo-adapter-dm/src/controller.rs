//! Experiment controller running named circuits on one shared state.

use std::collections::BTreeMap;
use std::sync::PoisonError;

use rand::Rng;
use tempo_ir::{Backend, Circuit, SharedRng};
use tracing::{debug, info};

use crate::backend::{DensityMatrixBackend, SimState};
use crate::error::{DmError, DmResult};

/// Reserved name of the control operation that records measurement bits.
pub const RECORD: &str = "record";

/// One step of an experiment.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOp {
    /// Run the named circuit on the current state.
    Run(String),
    /// Rebind the circuit's adjustable gates to these angles, in
    /// registration order, then run it. The angles stay bound afterwards.
    RunWith(String, Vec<f64>),
    /// Copy the controller's measurement bits into the output.
    Record,
}

impl From<&str> for ControlOp {
    fn from(name: &str) -> Self {
        if name == RECORD {
            ControlOp::Record
        } else {
            ControlOp::Run(name.to_string())
        }
    }
}

/// Draws repeated outcomes from a distribution, e.g. a readout-crosstalk
/// model.
pub trait OutcomeSampler {
    /// Draw `repetitions` outcomes from `(outcome, probability)` pairs.
    fn sample(&mut self, distribution: &[(Vec<u8>, f64)], repetitions: usize) -> Vec<Vec<u8>>;
}

/// Independent draws from the exact distribution.
#[derive(Debug, Clone)]
pub struct MultinomialSampler {
    rng: SharedRng,
}

impl MultinomialSampler {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }
}

impl OutcomeSampler for MultinomialSampler {
    fn sample(&mut self, distribution: &[(Vec<u8>, f64)], repetitions: usize) -> Vec<Vec<u8>> {
        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (0..repetitions)
            .filter_map(|_| {
                let r: f64 = rng.r#gen::<f64>() * total;
                let mut cumulative = 0.0;
                distribution
                    .iter()
                    .find(|(_, p)| {
                        cumulative += p;
                        r < cumulative
                    })
                    .or_else(|| distribution.last())
                    .map(|(outcome, _)| outcome.clone())
            })
            .collect()
    }
}

/// Runs named circuits against one density-matrix state.
#[derive(Debug)]
pub struct Controller {
    qubits: Vec<String>,
    mbits: Vec<String>,
    circuits: BTreeMap<String, Circuit>,
    /// Per circuit, the operation indices whose angles runs may rebind.
    adjustable: BTreeMap<String, Vec<usize>>,
    backend: DensityMatrixBackend,
    state: SimState,
}

impl Controller {
    /// Create a controller. No circuit may be named [`RECORD`].
    pub fn new(
        qubits: Vec<String>,
        mbits: Vec<String>,
        circuits: BTreeMap<String, Circuit>,
    ) -> DmResult<Self> {
        if circuits.contains_key(RECORD) {
            return Err(DmError::ProtectedKeyword(RECORD.to_string()));
        }
        let backend = DensityMatrixBackend::new();
        let state = backend.state_for(&qubits, &mbits)?;
        Ok(Self {
            qubits,
            mbits,
            circuits,
            adjustable: BTreeMap::new(),
            backend,
            state,
        })
    }

    /// Mark operations of `circuit` as adjustable. Each index must name a
    /// single-angle rotation; see [`Operation::angle_mut`].
    ///
    /// [`Operation::angle_mut`]: tempo_ir::Operation::angle_mut
    pub fn with_adjustable_gates(mut self, circuit: &str, indices: Vec<usize>) -> DmResult<Self> {
        let ops = self
            .circuits
            .get_mut(circuit)
            .ok_or_else(|| DmError::UnknownCircuit(circuit.to_string()))?
            .operations_mut();
        for &index in &indices {
            let adjustable = ops
                .get_mut(index)
                .is_some_and(|op| op.operation.angle_mut().is_some());
            if !adjustable {
                return Err(DmError::NotAdjustable {
                    circuit: circuit.to_string(),
                    index,
                });
            }
        }
        debug!("Circuit '{}' has {} adjustable gates", circuit, indices.len());
        self.adjustable.insert(circuit.to_string(), indices);
        Ok(self)
    }

    /// Rebind the adjustable gates of `circuit` to `angles`.
    pub fn set_angles(&mut self, circuit: &str, angles: &[f64]) -> DmResult<()> {
        let indices = self.adjustable.get(circuit).map_or(&[][..], Vec::as_slice);
        if indices.len() != angles.len() {
            return Err(DmError::AdjustableMismatch {
                circuit: circuit.to_string(),
                expected: indices.len(),
                got: angles.len(),
            });
        }
        let ops = self
            .circuits
            .get_mut(circuit)
            .ok_or_else(|| DmError::UnknownCircuit(circuit.to_string()))?
            .operations_mut();
        for (&index, &value) in indices.iter().zip(angles) {
            if let Some(angle) = ops.get_mut(index).and_then(|op| op.operation.angle_mut()) {
                *angle = value;
            }
        }
        Ok(())
    }

    pub fn circuit(&self, name: &str) -> Option<&Circuit> {
        self.circuits.get(name)
    }

    /// Return to the all-zero state.
    pub fn reset_state(&mut self) -> DmResult<()> {
        self.state = self.backend.state_for(&self.qubits, &self.mbits)?;
        Ok(())
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Run one named circuit on the current state.
    pub fn apply_circuit(&mut self, name: &str) -> DmResult<()> {
        let circuit = self
            .circuits
            .get(name)
            .ok_or_else(|| DmError::UnknownCircuit(name.to_string()))?;
        debug!("Running circuit '{}'", name);
        self.backend.apply(circuit, &mut self.state)
    }

    /// Run a sequence of control operations, returning one row of
    /// measurement bits (in `mbits` order) per [`ControlOp::Record`].
    pub fn apply_op_list(&mut self, ops: &[ControlOp]) -> DmResult<Vec<Vec<u8>>> {
        let mut records = Vec::new();
        for op in ops {
            match op {
                ControlOp::Run(name) => self.apply_circuit(name)?,
                ControlOp::RunWith(name, angles) => {
                    self.set_angles(name, angles)?;
                    self.apply_circuit(name)?;
                }
                ControlOp::Record => records.push(
                    self.mbits
                        .iter()
                        .map(|b| self.state.bit(b).unwrap_or(0))
                        .collect(),
                ),
            }
        }
        info!("Applied {} control operations, {} records", ops.len(), records.len());
        Ok(records)
    }

    /// Draw repeated outcomes of `qubits` from the current state.
    pub fn sample_outcomes(
        &self,
        sampler: &mut dyn OutcomeSampler,
        qubits: &[&str],
        repetitions: usize,
    ) -> DmResult<Vec<Vec<u8>>> {
        let distribution = self.state.probabilities(qubits)?;
        Ok(sampler.sample(&distribution, repetitions))
    }
}
