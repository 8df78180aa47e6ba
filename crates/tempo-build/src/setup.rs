//! Builder configuration and its persisted form.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempo_ir::{QubitRoster, ReadoutSampler, SharedRng};
use tracing::info;

use crate::connectivity::Connectivity;
use crate::error::BuildResult;
use crate::gate_set::GateSet;
use crate::registry::TemplateRegistry;
use crate::update::rule_by_name;

/// Everything a [`Builder`](crate::Builder) is configured from.
#[derive(Debug, Clone)]
pub struct Setup {
    pub registry: TemplateRegistry,
    /// Update-rule names, resolved with [`rule_by_name`].
    pub update_rules: Vec<String>,
    pub qubits: QubitRoster,
    pub gate_set: GateSet,
}

/// On-disk layout.
#[derive(Serialize, Deserialize)]
struct SetupRecord {
    gate_dic: BTreeMap<String, String>,
    update_rules: Vec<String>,
    qubit_dic: QubitRoster,
    gate_set: GateSet,
}

impl Setup {
    /// Materialize the gate set for `qubits`.
    pub fn new(
        registry: TemplateRegistry,
        update_rules: Vec<String>,
        qubits: QubitRoster,
        connectivity: Option<&Connectivity>,
    ) -> BuildResult<Self> {
        let gate_set = GateSet::materialize(&qubits, &registry, connectivity)?;
        Self::with_gate_set(registry, update_rules, qubits, gate_set)
    }

    /// Use an explicit gate set. Missing arguments of its entries are
    /// filled from the first qubit of each entry; explicit values are kept
    /// and no entries are added.
    pub fn with_gate_set(
        registry: TemplateRegistry,
        update_rules: Vec<String>,
        qubits: QubitRoster,
        mut gate_set: GateSet,
    ) -> BuildResult<Self> {
        for name in &update_rules {
            rule_by_name(name)?;
        }
        gate_set.fill(&qubits, &registry)?;
        Ok(Self {
            registry,
            update_rules,
            qubits,
            gate_set,
        })
    }

    /// Serialize to pretty JSON. Samplers are stored as markers.
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string_pretty(&self.record())?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> BuildResult<()> {
        serde_json::to_writer_pretty(writer, &self.record())?;
        Ok(())
    }

    /// Write the setup to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> BuildResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        info!("Saved setup with {} qubits to {}", self.qubits.len(), path.display());
        Ok(())
    }

    /// Load a setup from JSON.
    ///
    /// Templates are rebuilt from the library by name. Every qubit that had
    /// a sampler gets a new one with its stored `readout_error`, drawing
    /// from `rng`.
    pub fn from_json(json: &str, rng: SharedRng) -> BuildResult<Self> {
        Self::from_record(serde_json::from_str(json)?, rng)
    }

    pub fn from_reader<R: Read>(reader: R, rng: SharedRng) -> BuildResult<Self> {
        Self::from_record(serde_json::from_reader(reader)?, rng)
    }

    /// Read a setup from a JSON file.
    pub fn load(path: impl AsRef<Path>, rng: SharedRng) -> BuildResult<Self> {
        let path = path.as_ref();
        let setup = Self::from_reader(BufReader::new(File::open(path)?), rng)?;
        info!("Loaded setup with {} qubits from {}", setup.qubits.len(), path.display());
        Ok(setup)
    }

    fn record(&self) -> SetupRecord {
        SetupRecord {
            gate_dic: self.registry.library_names(),
            update_rules: self.update_rules.clone(),
            qubit_dic: self.qubits.clone(),
            gate_set: self.gate_set.clone(),
        }
    }

    fn from_record(record: SetupRecord, rng: SharedRng) -> BuildResult<Self> {
        let registry = TemplateRegistry::from_library_names(record.gate_dic)?;
        let mut qubits = record.qubit_dic;
        for qubit in qubits.iter_mut() {
            if qubit.params.sampler.is_some() {
                let readout_error = qubit.params.readout_error.unwrap_or(0.0);
                qubit.params.sampler = Some(ReadoutSampler::new(readout_error, rng.clone()));
            }
        }

        let mut setup = Self::with_gate_set(registry, record.update_rules, qubits, record.gate_set)?;
        setup.gate_set.attach_samplers(&setup.qubits);
        Ok(setup)
    }
}
