//! Timed circuit builder.

use std::sync::Arc;

use rand::RngCore;
use rustc_hash::FxHashMap;
use tempo_ir::{Circuit, IrError, ParamKey, QubitRoster, ScheduledOp, Value};
use tracing::{debug, info};

use crate::args::GateArgs;
use crate::error::{BuildError, BuildResult};
use crate::finalize::{FinalizeOptions, Finalizer};
use crate::gate_set::{GateKey, GateSet};
use crate::registry::TemplateRegistry;
use crate::request::{GateRequest, RequestItem};
use crate::setup::Setup;
use crate::template::GateCall;
use crate::update::{UpdateRule, rule_by_name};

/// Call-site lifetimes for qubits that do not define their own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lifetimes {
    pub t1: Option<f64>,
    pub t2: Option<f64>,
}

impl Lifetimes {
    pub fn new(t1: f64, t2: f64) -> Self {
        Self {
            t1: Some(t1),
            t2: Some(t2),
        }
    }
}

/// Assembles timed circuits from symbolic gate requests.
///
/// Each quantum qubit has a logical clock: the earliest time it is free. A
/// gate occupies the window `[start, start + gate_time]` with `start` the
/// latest clock among its qubits, and its operation is placed at
/// `start + exec_time` or, without an `exec_time`, at the window midpoint.
///
/// # Example
///
/// ```rust
/// use std::f64::consts::FRAC_PI_2;
/// use tempo_build::{ArgName, Builder, GateArgs, Lifetimes, QubitConfig, quick_setup};
/// use tempo_ir::seeded_rng;
///
/// let setup = quick_setup(&["q0", "q1"], None, &QubitConfig::noiseless(), seeded_rng(1)).unwrap();
/// let mut builder = Builder::new(setup).unwrap();
/// builder.begin_circuit("demo", Lifetimes::default()).unwrap();
///
/// builder.add_gate("RY", &["q0"], GateArgs::new().with(ArgName::Angle, FRAC_PI_2)).unwrap();
/// builder.add_gate("CZ", &["q0", "q1"], GateArgs::new()).unwrap();
/// assert_eq!(builder.clock("q1"), Some(60.0));
///
/// let duration = builder.finalize(Default::default()).unwrap();
/// assert_eq!(duration, 60.0);
/// ```
#[derive(Debug)]
pub struct Builder {
    qubits: QubitRoster,
    registry: TemplateRegistry,
    gate_set: GateSet,
    update_rules: Vec<Arc<dyn UpdateRule>>,
    circuit: Circuit,
    clock: FxHashMap<String, f64>,
    log: Vec<GateRequest>,
    depth: usize,
    /// Build-time operation index to position after the last finalize.
    positions: Option<Vec<usize>>,
}

impl Builder {
    /// Create a builder from a setup and open an untitled session.
    pub fn new(setup: Setup) -> BuildResult<Self> {
        let Setup {
            registry,
            update_rules,
            qubits,
            gate_set,
        } = setup;
        Self::from_parts(qubits, registry, gate_set, &update_rules)
    }

    /// Create a builder from its parts, resolving update rules by name.
    pub fn from_parts(
        qubits: QubitRoster,
        registry: TemplateRegistry,
        gate_set: GateSet,
        update_rules: &[String],
    ) -> BuildResult<Self> {
        let update_rules = update_rules
            .iter()
            .map(|name| rule_by_name(name))
            .collect::<BuildResult<Vec<_>>>()?;

        let mut builder = Self {
            qubits,
            registry,
            gate_set,
            update_rules,
            circuit: Circuit::default(),
            clock: FxHashMap::default(),
            log: Vec::new(),
            depth: 0,
            positions: None,
        };
        builder.begin_circuit("New Circuit", Lifetimes::default())?;
        Ok(builder)
    }

    /// Start an independent session: fresh circuit, clocks at zero, empty log.
    ///
    /// Qubits without their own `t1`/`t2` use `lifetimes`, then infinity.
    pub fn begin_circuit(&mut self, title: &str, lifetimes: Lifetimes) -> BuildResult<()> {
        let mut circuit = Circuit::new(title);
        let mut clock = FxHashMap::default();

        for qubit in self.qubits.iter() {
            if qubit.classical {
                circuit.add_classical_bit(&qubit.name)?;
                continue;
            }
            let t1 = qubit.params.t1.or(lifetimes.t1).unwrap_or(f64::INFINITY);
            let t2 = qubit.params.t2.or(lifetimes.t2).unwrap_or(f64::INFINITY);
            circuit.add_qubit(&qubit.name, t1, t2)?;
            clock.insert(qubit.name.clone(), 0.0);
        }

        info!(
            "Starting circuit '{}' with {} qubits and {} gate instances",
            title,
            clock.len(),
            self.gate_set.len()
        );
        self.circuit = circuit;
        self.clock = clock;
        self.log.clear();
        self.positions = None;
        Ok(())
    }

    /// Schedule one gate.
    ///
    /// `overrides` replace the instance's circuit arguments and supply the
    /// template's user arguments. Resolution errors leave clocks, log and
    /// circuit untouched. Returns the indices of the operations this request
    /// inserted.
    pub fn add_gate(
        &mut self,
        gate: &str,
        qubits: &[&str],
        overrides: GateArgs,
    ) -> BuildResult<Vec<usize>> {
        let template = Arc::clone(self.registry.lookup(gate)?);
        let key = GateKey::new(gate, qubits);
        let entry = self
            .gate_set
            .get(&key)
            .ok_or_else(|| BuildError::UnknownInstance {
                gate: gate.to_string(),
                qubits: key.qubits().to_vec(),
            })?;

        if let Some(name) = overrides.keys().find(|name| !template.accepts(*name)) {
            return Err(BuildError::malformed(
                gate,
                format!("'{name}' is not an argument of this gate"),
            ));
        }
        let args = entry.circuit_args.merged_with(&overrides);
        let user_values = template
            .user_args()
            .iter()
            .map(|name| {
                args.get(*name)
                    .filter(|v| !v.is_unset())
                    .cloned()
                    .ok_or_else(|| BuildError::malformed(gate, format!("missing argument '{name}'")))
            })
            .collect::<BuildResult<Vec<Value>>>()?;

        let gate_time = entry
            .builder_args
            .gate_time
            .ok_or_else(|| BuildError::missing(gate, "gate_time"))?;
        let start = qubits.iter().try_fold(0.0f64, |acc, q| {
            self.clock
                .get(*q)
                .map(|t| acc.max(*t))
                .ok_or_else(|| BuildError::UnknownQubit(q.to_string()))
        })?;
        let time = match entry.builder_args.exec_time {
            Some(offset) => start + offset,
            None => start + gate_time / 2.0,
        };

        debug!(
            "Scheduling {} on [{}] at {:.3} (window {:.3}..{:.3})",
            gate,
            qubits.join(", "),
            time,
            start,
            start + gate_time
        );

        let call = GateCall {
            gate: gate.to_string(),
            qubits: key.qubits().to_vec(),
            time,
            args,
        };
        let first_op = self.circuit.num_ops();
        self.depth += 1;
        let inserted = template.insertion().insert(self, &call);
        self.depth -= 1;
        inserted?;

        for q in qubits {
            if let Some(clock) = self.clock.get_mut(*q) {
                *clock = clock.max(start + gate_time);
            }
        }
        if self.depth == 0 {
            self.log.push(GateRequest {
                gate: gate.to_string(),
                qubits: call.qubits,
                args: user_values,
            });
        }
        Ok((first_op..self.circuit.num_ops()).collect())
    }

    /// Schedule a request with positional user arguments.
    pub fn add_request(&mut self, request: &GateRequest) -> BuildResult<Vec<usize>> {
        let template = Arc::clone(self.registry.lookup(&request.gate)?);
        let args = request.named_args(&template)?;
        let qubits: Vec<&str> = request.qubits.iter().map(String::as_str).collect();
        self.add_gate(&request.gate, &qubits, args)
    }

    /// Schedule requests in order, stopping at the first failure.
    pub fn add_operation_sequence(&mut self, requests: &[GateRequest]) -> BuildResult<()> {
        for request in requests {
            self.add_request(request)?;
        }
        Ok(())
    }

    /// Schedule a flat `(gate, q0, [q1], args...)` request.
    pub fn add_flat(&mut self, items: &[RequestItem]) -> BuildResult<Vec<usize>> {
        let request = GateRequest::from_flat(items, &self.registry)?;
        self.add_request(&request)
    }

    /// Schedule text lines such as `Ry 1.5708 q0` or `measure q0 -> c0;`.
    /// Blank lines are skipped.
    pub fn add_lines<I, S>(&mut self, lines: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let request = GateRequest::parse_line(line, &self.registry)?;
            self.add_request(&request)?;
        }
        Ok(())
    }

    /// Start a new session and re-issue logged requests.
    pub fn replay(&mut self, title: &str, lifetimes: Lifetimes, log: &[GateRequest]) -> BuildResult<()> {
        self.begin_circuit(title, lifetimes)?;
        self.add_operation_sequence(log)
    }

    /// Apply every registered update rule.
    pub fn update(&mut self, rng: &mut dyn RngCore) -> BuildResult<()> {
        for rule in self.update_rules.clone() {
            debug!("Applying update rule {}", rule.name());
            rule.apply(self, rng)?;
        }
        Ok(())
    }

    /// Close the timeline with idles and order the circuit. Returns the
    /// circuit duration.
    pub fn finalize(&mut self, options: FinalizeOptions) -> BuildResult<f64> {
        let built = self.circuit.num_ops();
        let finalized = Finalizer::new(options).run(&mut self.circuit, &self.clock)?;

        let mut inverse = vec![0; finalized.order.len()];
        for (new, &old) in finalized.order.iter().enumerate() {
            inverse[old] = new;
        }
        let positions = self.positions.get_or_insert_with(|| (0..built).collect());
        for position in positions.iter_mut() {
            *position = inverse[*position];
        }
        Ok(finalized.duration)
    }

    /// Map indices returned by [`Builder::add_gate`] to positions in the
    /// finalized circuit. Before any finalize the indices are unchanged.
    /// Returns `None` if an index was never emitted.
    pub fn finalized_indices(&self, indices: &[usize]) -> Option<Vec<usize>> {
        match &self.positions {
            Some(positions) => indices.iter().map(|&i| positions.get(i).copied()).collect(),
            None => {
                let num_ops = self.circuit.num_ops();
                indices.iter().map(|&i| (i < num_ops).then_some(i)).collect()
            }
        }
    }

    /// Append an operation to the circuit.
    pub fn emit(&mut self, op: ScheduledOp) -> BuildResult<usize> {
        debug!("  emit {}", op);
        Ok(self.circuit.add_operation(op)?)
    }

    /// Register a classical bit unless it already exists.
    pub fn ensure_classical_bit(&mut self, name: &str) -> BuildResult<()> {
        match self.circuit.bit(name) {
            None => Ok(self.circuit.add_classical_bit(name)?),
            Some(bit) if bit.is_quantum() => Err(IrError::DuplicateBit(name.to_string()).into()),
            Some(_) => Ok(()),
        }
    }

    /// Re-resolve gate-set arguments inherited from `param`.
    pub fn refresh_inherited(&mut self, param: ParamKey) -> BuildResult<()> {
        self.gate_set
            .refresh_inherited(&self.qubits, &self.registry, param)
    }

    /// Current clock of a quantum qubit.
    pub fn clock(&self, qubit: &str) -> Option<f64> {
        self.clock.get(qubit).copied()
    }

    pub fn clocks(&self) -> &FxHashMap<String, f64> {
        &self.clock
    }

    /// Top-level requests of the current session.
    pub fn log(&self) -> &[GateRequest] {
        &self.log
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// Take the circuit, leaving an empty one.
    pub fn take_circuit(&mut self) -> Circuit {
        std::mem::take(&mut self.circuit)
    }

    pub fn gate_set(&self) -> &GateSet {
        &self.gate_set
    }

    pub fn gate_set_mut(&mut self) -> &mut GateSet {
        &mut self.gate_set
    }

    pub fn qubits(&self) -> &QubitRoster {
        &self.qubits
    }

    pub fn qubits_mut(&mut self) -> &mut QubitRoster {
        &mut self.qubits
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Snapshot of the configuration, e.g. for persisting after updates.
    pub fn setup(&self) -> Setup {
        Setup {
            registry: self.registry.clone(),
            update_rules: self.update_rules.iter().map(|r| r.name().to_string()).collect(),
            qubits: self.qubits.clone(),
            gate_set: self.gate_set.clone(),
        }
    }
}
