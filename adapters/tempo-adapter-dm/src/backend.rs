//! Circuit execution on a dense density matrix.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tempo_ir::{Backend, BitKind, Circuit, Operation, ScheduledOp};
use tracing::{debug, instrument};

use crate::channels;
use crate::density::DensityMatrix;
use crate::error::{DmError, DmResult};

/// Default limit on simulated qubits.
pub const MAX_QUBITS: usize = 10;

/// Density matrix plus classical registers, addressed by bit name.
#[derive(Debug, Clone)]
pub struct SimState {
    qubits: FxHashMap<String, usize>,
    order: Vec<String>,
    density: DensityMatrix,
    classical: BTreeMap<String, u8>,
}

impl SimState {
    /// Create the all-zero state over `qubits` with every classical bit 0.
    pub fn new<Q, C>(qubits: Q, classical: C) -> Self
    where
        Q: IntoIterator,
        Q::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let order: Vec<String> = qubits.into_iter().map(Into::into).collect();
        Self {
            qubits: order
                .iter()
                .enumerate()
                .map(|(i, q)| (q.clone(), i))
                .collect(),
            density: DensityMatrix::new(order.len()),
            order,
            classical: classical.into_iter().map(|c| (c.into(), 0)).collect(),
        }
    }

    /// Qubit names, most significant first.
    pub fn qubit_names(&self) -> &[String] {
        &self.order
    }

    pub fn qubit_index(&self, name: &str) -> DmResult<usize> {
        self.qubits
            .get(name)
            .copied()
            .ok_or_else(|| DmError::UnknownBit(name.to_string()))
    }

    pub fn density(&self) -> &DensityMatrix {
        &self.density
    }

    /// Populations of the computational basis, qubit order as in
    /// [`SimState::qubit_names`].
    pub fn diagonal(&self) -> Vec<f64> {
        self.density.diagonal()
    }

    pub fn classical(&self) -> &BTreeMap<String, u8> {
        &self.classical
    }

    pub fn bit(&self, name: &str) -> Option<u8> {
        self.classical.get(name).copied()
    }

    /// Outcome distribution over the named qubits, first name most
    /// significant.
    pub fn probabilities(&self, qubits: &[&str]) -> DmResult<Vec<(Vec<u8>, f64)>> {
        let indices = qubits
            .iter()
            .map(|q| self.qubit_index(q))
            .collect::<DmResult<Vec<_>>>()?;
        let width = indices.len();
        Ok(self
            .density
            .marginal(&indices)
            .into_iter()
            .enumerate()
            .map(|(outcome, p)| {
                let bits = (0..width)
                    .map(|k| u8::from((outcome >> (width - 1 - k)) & 1 == 1))
                    .collect();
                (bits, p)
            })
            .collect())
    }
}

/// Reference density-matrix backend.
#[derive(Debug, Clone)]
pub struct DensityMatrixBackend {
    max_qubits: usize,
}

impl Default for DensityMatrixBackend {
    fn default() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
        }
    }
}

impl DensityMatrixBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Create a state over explicit qubits and classical bits.
    pub fn state_for(&self, qubits: &[String], classical: &[String]) -> DmResult<SimState> {
        if qubits.len() > self.max_qubits {
            return Err(DmError::TooManyQubits {
                requested: qubits.len(),
                max: self.max_qubits,
            });
        }
        Ok(SimState::new(qubits.iter().cloned(), classical.iter().cloned()))
    }

    fn apply_op(&self, circuit: &Circuit, op: &ScheduledOp, state: &mut SimState) -> DmResult<()> {
        let targets = op
            .bits
            .iter()
            .map(|b| state.qubit_index(b))
            .collect::<DmResult<Vec<_>>>()?;
        let dm = &mut state.density;

        match &op.operation {
            Operation::RotateX {
                angle,
                dephasing_axis,
                dephasing_angle,
            } => {
                dm.apply_unitary(&targets, &channels::rotate_x(*angle));
                let p = dephasing_angle / 2.0;
                dm.apply_kraus(&targets, &channels::pauli_channel(*dephasing_axis, p, p));
            }
            Operation::RotateY {
                angle,
                dephasing_axis,
                dephasing_angle,
            } => {
                dm.apply_unitary(&targets, &channels::rotate_y(*angle));
                let p = dephasing_angle / 2.0;
                dm.apply_kraus(&targets, &channels::pauli_channel(p, *dephasing_axis, p));
            }
            Operation::RotateZ { angle, dephasing } => {
                dm.apply_unitary(&targets, &channels::rotate_z(*angle));
                if *dephasing > 0.0 {
                    dm.apply_kraus(&targets, &channels::pauli_channel(0.0, 0.0, *dephasing));
                }
            }
            Operation::RotateXY {
                phi,
                theta,
                dephasing_axis,
                dephasing_angle,
            } => {
                dm.apply_unitary(&targets, &channels::rotate_xy(*phi, *theta));
                let (sin2, cos2) = (phi.sin().powi(2), phi.cos().powi(2));
                let half = dephasing_angle / 2.0;
                let px = dephasing_axis * cos2 + half * sin2;
                let py = dephasing_axis * sin2 + half * cos2;
                dm.apply_kraus(&targets, &channels::pauli_channel(px, py, half));
            }
            Operation::RotateEuler { phi, theta, lamda } => {
                dm.apply_unitary(&targets, &channels::rotate_euler(*phi, *theta, *lamda));
            }
            Operation::CPhase { angle, dephase_var } => {
                dm.apply_unitary(&targets, &channels::cphase(*angle));
                if *dephase_var > 0.0 {
                    let factor = (-dephase_var / 2.0).exp();
                    dm.apply_kraus(&targets[..1], &channels::dephasing(factor));
                }
            }
            Operation::ISwap { angle, dephase_var } => {
                dm.apply_unitary(&targets, &channels::iswap(*angle));
                if *dephase_var > 0.0 {
                    let factor = (-dephase_var / 2.0).exp();
                    for t in &targets {
                        dm.apply_kraus(&[*t], &channels::dephasing(factor));
                    }
                }
            }
            Operation::Butterfly { p_exc, p_dec } => {
                dm.apply_kraus(&targets, &channels::butterfly(*p_exc, *p_dec));
            }
            Operation::Reset { population } => {
                dm.apply_kraus(&targets, &channels::reset(*population));
            }
            Operation::Depolarize { probability } => {
                dm.apply_kraus(&targets, &channels::depolarizing(*probability));
            }
            Operation::Idle { duration } => {
                let (t1, t2) = match circuit.bit(&op.bits[0]).map(|b| b.kind) {
                    Some(BitKind::Quantum { t1, t2 }) => (t1, t2),
                    _ => return Err(DmError::UnknownBit(op.bits[0].clone())),
                };
                dm.apply_kraus(&targets, &channels::decay(*duration, t1, t2));
            }
            Operation::Measure {
                output_bit,
                real_output_bit,
                sampler,
            } => {
                let qubit = &op.bits[0];
                let sampler = sampler.as_ref().ok_or_else(|| DmError::MissingSampler {
                    qubit: qubit.clone(),
                })?;
                let outcome = sampler.sample(dm.probability_one(targets[0]))?;
                if !dm.project(targets[0], outcome.projected) {
                    return Err(DmError::Normalization {
                        qubit: qubit.clone(),
                        outcome: outcome.projected,
                    });
                }
                debug!(
                    "Measured {} -> {} (projected {})",
                    qubit, outcome.declared, outcome.projected
                );
                state.classical.insert(output_bit.clone(), outcome.declared);
                if let Some(real) = real_output_bit {
                    state.classical.insert(real.clone(), outcome.projected);
                }
            }
        }
        Ok(())
    }
}

impl Backend for DensityMatrixBackend {
    type State = SimState;
    type Error = DmError;

    fn name(&self) -> &str {
        "density_matrix"
    }

    fn prepare(&self, circuit: &Circuit) -> DmResult<SimState> {
        let qubits: Vec<String> = circuit.qubit_names().map(String::from).collect();
        let classical: Vec<String> = circuit.classical_names().map(String::from).collect();
        self.state_for(&qubits, &classical)
    }

    #[instrument(skip_all, fields(circuit = circuit.title(), ops = circuit.num_ops()))]
    fn apply(&self, circuit: &Circuit, state: &mut SimState) -> DmResult<()> {
        for op in circuit.operations() {
            self.apply_op(circuit, op, state)?;
        }
        debug!("Applied {} operations", circuit.num_ops());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_ir::{ReadoutSampler, seeded_rng};

    fn one_qubit(name: &str) -> Circuit {
        let mut circuit = Circuit::new("test");
        circuit.add_qubit(name, f64::INFINITY, f64::INFINITY).unwrap();
        circuit
    }

    #[test]
    fn test_too_many_qubits() {
        let mut circuit = Circuit::new("wide");
        for q in 0..3 {
            circuit.add_qubit(format!("q{q}"), 1.0, 1.0).unwrap();
        }
        let backend = DensityMatrixBackend::new().with_max_qubits(2);
        assert!(matches!(
            backend.prepare(&circuit),
            Err(DmError::TooManyQubits { requested: 3, max: 2 })
        ));
    }

    #[test]
    fn test_measurement_writes_bits() {
        let mut circuit = one_qubit("q");
        circuit.add_classical_bit("m").unwrap();
        circuit.add_classical_bit("m_real").unwrap();
        circuit
            .add_operation(ScheduledOp::new(
                Operation::RotateX {
                    angle: std::f64::consts::PI,
                    dephasing_axis: 0.0,
                    dephasing_angle: 0.0,
                },
                vec!["q".into()],
                1.0,
            ))
            .unwrap();
        circuit
            .add_operation(ScheduledOp::new(
                Operation::Measure {
                    output_bit: "m".into(),
                    real_output_bit: Some("m_real".into()),
                    sampler: Some(ReadoutSampler::new(1.0, seeded_rng(5))),
                },
                vec!["q".into()],
                2.0,
            ))
            .unwrap();

        let backend = DensityMatrixBackend::new();
        let mut state = backend.prepare(&circuit).unwrap();
        backend.apply(&circuit, &mut state).unwrap();

        assert_eq!(state.bit("m_real"), Some(1));
        assert_eq!(state.bit("m"), Some(0));
    }

    #[test]
    fn test_measurement_requires_sampler() {
        let mut circuit = one_qubit("q");
        circuit.add_classical_bit("m").unwrap();
        circuit
            .add_operation(ScheduledOp::new(
                Operation::Measure {
                    output_bit: "m".into(),
                    real_output_bit: None,
                    sampler: None,
                },
                vec!["q".into()],
                0.0,
            ))
            .unwrap();

        let backend = DensityMatrixBackend::new();
        let mut state = backend.prepare(&circuit).unwrap();
        assert!(matches!(
            backend.apply(&circuit, &mut state),
            Err(DmError::MissingSampler { .. })
        ));
    }

    #[test]
    fn test_probabilities_labels() {
        let state = SimState::new(["a", "b"], Vec::<String>::new());
        let probs = state.probabilities(&["b", "a"]).unwrap();
        assert_eq!(probs[0], (vec![0, 0], 1.0));
        assert_eq!(probs[3].0, vec![1, 1]);
        assert!(state.probabilities(&["c"]).is_err());
    }
}
