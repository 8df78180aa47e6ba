//! Concrete gate instances and their resolved parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tempo_ir::{ParamKey, Qubit, QubitRoster, Value};
use tracing::debug;

use crate::args::{ArgName, GateArgs};
use crate::connectivity::Connectivity;
use crate::error::{BuildError, BuildResult};
use crate::registry::TemplateRegistry;
use crate::template::GateTemplate;

/// A gate alias on an ordered qubit tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateKey {
    gate: String,
    qubits: Vec<String>,
}

impl GateKey {
    pub fn new(gate: impl Into<String>, qubits: &[&str]) -> Self {
        Self {
            gate: gate.into(),
            qubits: qubits.iter().map(|q| q.to_string()).collect(),
        }
    }

    pub fn gate(&self) -> &str {
        &self.gate
    }

    pub fn qubits(&self) -> &[String] {
        &self.qubits
    }
}

impl fmt::Display for GateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.gate, self.qubits.join(", "))
    }
}

// Persisted as a flat list `[gate, q0, q1]`.
impl Serialize for GateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flat: Vec<&str> = std::iter::once(self.gate.as_str())
            .chain(self.qubits.iter().map(String::as_str))
            .collect();
        flat.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut flat = Vec::<String>::deserialize(deserializer)?.into_iter();
        let gate = flat
            .next()
            .ok_or_else(|| D::Error::custom("gate key must name a gate"))?;
        Ok(Self {
            gate,
            qubits: flat.collect(),
        })
    }
}

/// Scheduling arguments of a gate instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderArgs {
    /// Window length the gate occupies on its qubits.
    #[serde(default)]
    pub gate_time: Option<f64>,
    /// Offset of the operation from the window start. Unset means the
    /// window midpoint.
    #[serde(default)]
    pub exec_time: Option<f64>,
}

/// Resolved parameters of one gate instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(GateArgs, BuilderArgs)", into = "(GateArgs, BuilderArgs)")]
pub struct GateSetEntry {
    pub circuit_args: GateArgs,
    pub builder_args: BuilderArgs,
}

impl GateSetEntry {
    /// Resolve every template source against the first qubit's parameters.
    pub fn resolve(template: &GateTemplate, qubit: &Qubit) -> Self {
        let params = &qubit.params;
        Self {
            circuit_args: template
                .circuit_args()
                .iter()
                .map(|(name, source)| (*name, source.resolve(params)))
                .collect(),
            builder_args: BuilderArgs {
                gate_time: template.gate_time().resolve(params).as_f64(),
                exec_time: template.exec_time().and_then(|s| s.resolve(params).as_f64()),
            },
        }
    }

    /// Fill arguments that are not present yet. Present values are kept.
    fn backfill(&mut self, template: &GateTemplate, qubit: &Qubit) {
        let resolved = Self::resolve(template, qubit);
        for (name, value) in resolved.circuit_args.iter() {
            if !self.circuit_args.contains(name) {
                self.circuit_args.insert(name, value.clone());
            }
        }
        if self.builder_args.gate_time.is_none() {
            self.builder_args.gate_time = resolved.builder_args.gate_time;
        }
        if self.builder_args.exec_time.is_none() {
            self.builder_args.exec_time = resolved.builder_args.exec_time;
        }
    }
}

impl From<(GateArgs, BuilderArgs)> for GateSetEntry {
    fn from((circuit_args, builder_args): (GateArgs, BuilderArgs)) -> Self {
        Self {
            circuit_args,
            builder_args,
        }
    }
}

impl From<GateSetEntry> for (GateArgs, BuilderArgs) {
    fn from(entry: GateSetEntry) -> Self {
        (entry.circuit_args, entry.builder_args)
    }
}

/// Persisted form of one gate-set entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSetRecord {
    pub key: GateKey,
    pub val: GateSetEntry,
}

/// Every gate instance the builder may schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GateSetRecord>", into = "Vec<GateSetRecord>")]
pub struct GateSet {
    entries: BTreeMap<GateKey, GateSetEntry>,
}

impl GateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per registry alias per eligible qubit tuple.
    ///
    /// Classical qubits get no entries. Two-qubit gates are instantiated on
    /// every ordered pair of distinct quantum qubits, restricted to adjacent
    /// pairs when a connectivity is given; the first qubit's parameters
    /// govern the instance.
    pub fn materialize(
        qubits: &QubitRoster,
        registry: &TemplateRegistry,
        connectivity: Option<&Connectivity>,
    ) -> BuildResult<Self> {
        let mut set = Self::new();
        for qubit in qubits.quantum() {
            for (alias, template) in registry.iter() {
                match template.arity() {
                    1 => {
                        set.insert(
                            GateKey::new(alias, &[qubit.name.as_str()]),
                            GateSetEntry::resolve(template, qubit),
                        );
                    }
                    2 => {
                        for other in qubits.quantum().filter(|o| o.name != qubit.name) {
                            if connectivity.is_some_and(|c| !c.is_adjacent(&qubit.name, &other.name))
                            {
                                continue;
                            }
                            set.insert(
                                GateKey::new(alias, &[qubit.name.as_str(), other.name.as_str()]),
                                GateSetEntry::resolve(template, qubit),
                            );
                        }
                    }
                    arity => {
                        return Err(BuildError::UnsupportedArity {
                            gate: alias.to_string(),
                            arity,
                        });
                    }
                }
            }
        }
        debug!(
            "Materialized {} gate instances for {} qubits",
            set.len(),
            qubits.len()
        );
        Ok(set)
    }

    /// Back-fill missing arguments of the present entries from their first
    /// qubit. Values already in an entry always win.
    pub fn fill(&mut self, qubits: &QubitRoster, registry: &TemplateRegistry) -> BuildResult<()> {
        for (key, entry) in &mut self.entries {
            let template = registry.lookup(&key.gate)?;
            if key.qubits.len() != template.arity() {
                return Err(BuildError::malformed(
                    &key.gate,
                    format!("expected {} qubits, got {}", template.arity(), key.qubits.len()),
                ));
            }
            let qubit = first_quantum(qubits, key)?;
            entry.backfill(template, qubit);
        }
        Ok(())
    }

    /// Re-resolve every argument inherited from `param` on the present
    /// entries, e.g. after an update rule changed it.
    pub fn refresh_inherited(
        &mut self,
        qubits: &QubitRoster,
        registry: &TemplateRegistry,
        param: ParamKey,
    ) -> BuildResult<()> {
        for (key, entry) in &mut self.entries {
            let Ok(template) = registry.lookup(&key.gate) else {
                continue;
            };
            let qubit = first_quantum(qubits, key)?;
            for (name, source) in template.circuit_args() {
                if source.key() == Some(param) {
                    entry.circuit_args.insert(*name, qubit.params.get(param));
                }
            }
        }
        Ok(())
    }

    /// Replace sampler markers with the first qubit's live sampler.
    pub fn attach_samplers(&mut self, qubits: &QubitRoster) {
        for (key, entry) in &mut self.entries {
            let Some(value) = entry.circuit_args.get_mut(ArgName::Sampler) else {
                continue;
            };
            if value.as_sampler().is_some_and(|s| s.is_attached()) {
                continue;
            }
            let sampler = qubits
                .get(&key.qubits[0])
                .and_then(|q| q.params.sampler.clone());
            *value = Value::from(sampler);
        }
    }

    pub fn insert(&mut self, key: GateKey, entry: GateSetEntry) -> Option<GateSetEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, key: &GateKey) -> Option<&GateSetEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &GateKey) -> Option<&mut GateSetEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &GateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GateKey, &GateSetEntry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GateKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn first_quantum<'a>(qubits: &'a QubitRoster, key: &GateKey) -> BuildResult<&'a Qubit> {
    let name = key
        .qubits
        .first()
        .ok_or_else(|| BuildError::malformed(&key.gate, "gate key has no qubits"))?;
    qubits
        .get(name)
        .filter(|q| !q.classical)
        .ok_or_else(|| BuildError::UnknownQubit(name.clone()))
}

impl From<Vec<GateSetRecord>> for GateSet {
    fn from(records: Vec<GateSetRecord>) -> Self {
        Self {
            entries: records.into_iter().map(|r| (r.key, r.val)).collect(),
        }
    }
}

impl From<GateSet> for Vec<GateSetRecord> {
    fn from(set: GateSet) -> Self {
        set.entries
            .into_iter()
            .map(|(key, val)| GateSetRecord { key, val })
            .collect()
    }
}
