//! Timed circuit container.

use rustc_hash::FxHashMap;

use crate::dag::TimedDag;
use crate::error::{IrError, IrResult};
use crate::operation::{Operation, ScheduledOp};
use crate::qubit::{Bit, BitKind};

/// A circuit of timed native operations over named bits.
///
/// # Example
///
/// ```rust
/// use tempo_ir::{Circuit, Operation, ScheduledOp};
///
/// let mut circuit = Circuit::new("ramsey");
/// circuit.add_qubit("q0", 30_000.0, 30_000.0).unwrap();
///
/// let half_pi = Operation::RotateY { angle: std::f64::consts::FRAC_PI_2, dephasing_axis: 0.0, dephasing_angle: 0.0 };
/// circuit.add_operation(ScheduledOp::new(half_pi.clone(), vec!["q0".into()], 10.0)).unwrap();
/// circuit.add_operation(ScheduledOp::new(half_pi, vec!["q0".into()], 510.0)).unwrap();
///
/// // Idles fill [0, 10], [10, 510] and [510, 520].
/// assert_eq!(circuit.add_waiting_gates(0.0, 520.0), 3);
/// circuit.sort_by_time();
/// assert_eq!(circuit.num_ops(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    title: String,
    bits: Vec<Bit>,
    index: FxHashMap<String, usize>,
    ops: Vec<ScheduledOp>,
}

impl Circuit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Register a qubit with its lifetimes. Infinite lifetimes disable decay.
    pub fn add_qubit(&mut self, name: impl Into<String>, t1: f64, t2: f64) -> IrResult<()> {
        self.add_bit(Bit {
            name: name.into(),
            kind: BitKind::Quantum { t1, t2 },
        })
    }

    /// Register a classical outcome bit.
    pub fn add_classical_bit(&mut self, name: impl Into<String>) -> IrResult<()> {
        self.add_bit(Bit {
            name: name.into(),
            kind: BitKind::Classical,
        })
    }

    fn add_bit(&mut self, bit: Bit) -> IrResult<()> {
        if self.index.contains_key(&bit.name) {
            return Err(IrError::DuplicateBit(bit.name));
        }
        self.index.insert(bit.name.clone(), self.bits.len());
        self.bits.push(bit);
        Ok(())
    }

    pub fn has_bit(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn bit(&self, name: &str) -> Option<&Bit> {
        self.index.get(name).map(|&i| &self.bits[i])
    }

    /// All bits in registration order.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Names of the quantum bits in registration order.
    pub fn qubit_names(&self) -> impl Iterator<Item = &str> {
        self.bits
            .iter()
            .filter(|b| b.is_quantum())
            .map(|b| b.name.as_str())
    }

    /// Names of the classical bits in registration order.
    pub fn classical_names(&self) -> impl Iterator<Item = &str> {
        self.bits
            .iter()
            .filter(|b| !b.is_quantum())
            .map(|b| b.name.as_str())
    }

    /// Append an operation, returning its index.
    ///
    /// Every quantum bit must be a registered qubit and every classical
    /// output a registered classical bit.
    pub fn add_operation(&mut self, op: ScheduledOp) -> IrResult<usize> {
        let name = op.operation.name();
        if op.bits.len() != op.operation.num_qubits() {
            return Err(IrError::ArityMismatch {
                operation: name.to_string(),
                expected: op.operation.num_qubits(),
                got: op.bits.len(),
            });
        }
        for bit in &op.bits {
            match self.bit(bit) {
                None => {
                    return Err(IrError::BitNotFound {
                        bit: bit.clone(),
                        operation: Some(name.to_string()),
                    });
                }
                Some(b) if !b.is_quantum() => {
                    return Err(IrError::NotAQubit {
                        bit: bit.clone(),
                        operation: name.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        for output in op.operation.classical_outputs() {
            if !self.has_bit(output) {
                return Err(IrError::BitNotFound {
                    bit: output.to_string(),
                    operation: Some(name.to_string()),
                });
            }
        }

        self.ops.push(op);
        Ok(self.ops.len() - 1)
    }

    pub fn operations(&self) -> &[ScheduledOp] {
        &self.ops
    }

    /// Mutable access for parameter rebinding. Bits and times should not be
    /// changed through this.
    pub fn operations_mut(&mut self) -> &mut [ScheduledOp] {
        &mut self.ops
    }

    pub fn operation(&self, index: usize) -> Option<&ScheduledOp> {
        self.ops.get(index)
    }

    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Latest operation timestamp, or 0 for an empty circuit.
    pub fn last_time(&self) -> f64 {
        self.ops.iter().map(|op| op.time).fold(0.0, f64::max)
    }

    /// Insert idle operations so that every quantum bit is covered over
    /// `[tmin, tmax]`.
    ///
    /// For each qubit the time points `tmin`, its operation timestamps inside
    /// the window, and `tmax` are sorted; each positive gap gets an
    /// [`Operation::Idle`] of the gap's length at the gap's midpoint.
    /// Returns the number of idles inserted. Calling this twice inserts a
    /// second set of idles.
    pub fn add_waiting_gates(&mut self, tmin: f64, tmax: f64) -> usize {
        let mut idles = Vec::new();

        for bit in self.bits.iter().filter(|b| b.is_quantum()) {
            let mut points: Vec<f64> = self
                .ops
                .iter()
                .filter(|op| op.acts_on(&bit.name))
                .map(|op| op.time)
                .filter(|t| (tmin..=tmax).contains(t))
                .collect();
            points.sort_by(f64::total_cmp);

            let mut last = tmin;
            for t in points.into_iter().chain(std::iter::once(tmax)) {
                if t > last {
                    idles.push(ScheduledOp::new(
                        Operation::Idle { duration: t - last },
                        vec![bit.name.clone()],
                        (last + t) / 2.0,
                    ));
                    last = t;
                }
            }
        }

        let inserted = idles.len();
        self.ops.extend(idles);
        inserted
    }

    /// Stable sort of the operations by timestamp.
    ///
    /// Returns the applied permutation: entry `i` is the former index of the
    /// operation now at position `i`.
    pub fn sort_by_time(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.ops.len()).collect();
        order.sort_by(|&a, &b| self.ops[a].time.total_cmp(&self.ops[b].time));
        self.permute(&order);
        order
    }

    /// Reorder the operations along a topological order of their wire DAG.
    ///
    /// Returns the applied permutation, as [`Circuit::sort_by_time`] does.
    pub fn order(&mut self) -> IrResult<Vec<usize>> {
        let order = TimedDag::from_operations(&self.ops).execution_order()?;
        self.permute(&order);
        Ok(order)
    }

    fn permute(&mut self, order: &[usize]) {
        let mut slots: Vec<Option<ScheduledOp>> = self.ops.drain(..).map(Some).collect();
        self.ops = order
            .iter()
            .filter_map(|&idx| slots[idx].take())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rx(bit: &str, time: f64) -> ScheduledOp {
        ScheduledOp::new(
            Operation::RotateX {
                angle: 1.0,
                dephasing_axis: 0.0,
                dephasing_angle: 0.0,
            },
            vec![bit.into()],
            time,
        )
    }

    fn two_qubit_circuit() -> Circuit {
        let mut circuit = Circuit::new("test");
        circuit.add_qubit("a", f64::INFINITY, f64::INFINITY).unwrap();
        circuit.add_qubit("b", 100.0, 50.0).unwrap();
        circuit
    }

    #[test]
    fn test_duplicate_bits() {
        let mut circuit = two_qubit_circuit();
        assert!(matches!(
            circuit.add_classical_bit("a"),
            Err(IrError::DuplicateBit(_))
        ));
    }

    #[test]
    fn test_operation_validation() {
        let mut circuit = two_qubit_circuit();
        circuit.add_classical_bit("m").unwrap();

        assert!(matches!(
            circuit.add_operation(rx("z", 0.0)),
            Err(IrError::BitNotFound { .. })
        ));
        assert!(matches!(
            circuit.add_operation(rx("m", 0.0)),
            Err(IrError::NotAQubit { .. })
        ));

        let cz = ScheduledOp::new(
            Operation::CPhase {
                angle: std::f64::consts::PI,
                dephase_var: 0.0,
            },
            vec!["a".into()],
            0.0,
        );
        assert!(matches!(
            circuit.add_operation(cz),
            Err(IrError::ArityMismatch { expected: 2, got: 1, .. })
        ));

        let measure = ScheduledOp::new(
            Operation::Measure {
                output_bit: "missing".into(),
                real_output_bit: None,
                sampler: None,
            },
            vec!["a".into()],
            0.0,
        );
        assert!(circuit.add_operation(measure).is_err());
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_waiting_gates_cover_timeline() {
        let mut circuit = two_qubit_circuit();
        circuit.add_operation(rx("a", 10.0)).unwrap();
        circuit.add_operation(rx("a", 30.0)).unwrap();

        // a: [0,10], [10,30], [30,40]; b: [0,40]
        assert_eq!(circuit.add_waiting_gates(0.0, 40.0), 4);

        let total_idle = |bit: &str| -> f64 {
            circuit
                .operations()
                .iter()
                .filter(|op| op.acts_on(bit))
                .filter_map(|op| match op.operation {
                    Operation::Idle { duration } => Some(duration),
                    _ => None,
                })
                .sum()
        };
        assert!((total_idle("a") - 40.0).abs() < 1e-12);
        assert!((total_idle("b") - 40.0).abs() < 1e-12);

        let idle_b = circuit.operations().iter().find(|op| op.acts_on("b")).unwrap();
        assert_eq!(idle_b.time, 20.0);
    }

    #[test]
    fn test_waiting_gates_skip_zero_gaps() {
        let mut circuit = two_qubit_circuit();
        circuit.add_operation(rx("a", 0.0)).unwrap();
        circuit.add_operation(rx("b", 5.0)).unwrap();
        // a: [0,5]; b: [0,5]
        assert_eq!(circuit.add_waiting_gates(0.0, 5.0), 2);
    }

    #[test]
    fn test_double_insertion() {
        let mut circuit = two_qubit_circuit();
        circuit.add_waiting_gates(0.0, 10.0);
        circuit.add_waiting_gates(0.0, 10.0);
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_sort_and_order_agree() {
        let mut sorted = two_qubit_circuit();
        sorted.add_operation(rx("a", 30.0)).unwrap();
        sorted.add_operation(rx("b", 20.0)).unwrap();
        sorted.add_operation(rx("a", 10.0)).unwrap();
        sorted.add_waiting_gates(0.0, 40.0);
        let mut ordered = sorted.clone();

        sorted.sort_by_time();
        ordered.order().unwrap();

        let times = |c: &Circuit| c.operations().iter().map(|op| op.time).collect::<Vec<_>>();
        assert_eq!(times(&sorted), times(&ordered));
        assert!(times(&sorted).windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_reports_permutation() {
        let mut circuit = two_qubit_circuit();
        circuit.add_operation(rx("a", 30.0)).unwrap();
        circuit.add_operation(rx("b", 20.0)).unwrap();
        circuit.add_operation(rx("a", 10.0)).unwrap();
        let before = circuit.clone();

        let order = circuit.sort_by_time();
        assert_eq!(order, [2, 1, 0]);
        for (new, &old) in order.iter().enumerate() {
            assert_eq!(circuit.operations()[new], before.operations()[old]);
        }
    }

    #[test]
    fn test_last_time() {
        let mut circuit = two_qubit_circuit();
        assert_eq!(circuit.last_time(), 0.0);
        circuit.add_operation(rx("b", 12.5)).unwrap();
        assert_eq!(circuit.last_time(), 12.5);
    }
}
