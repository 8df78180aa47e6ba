//! Alias-to-template registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{BuildError, BuildResult};
use crate::gates::library_template;
use crate::template::GateTemplate;

/// Aliases of the transmon preset, `(alias, library name)`.
pub const TRANSMON_ALIASES: [(&str, &str); 33] = [
    ("CZ", "CZ"),
    ("C-Phase", "CPhase"),
    ("CPhase", "CPhase"),
    ("RotateX", "RotateX"),
    ("RX", "RotateX"),
    ("Rx", "RotateX"),
    ("RotateY", "RotateY"),
    ("RY", "RotateY"),
    ("Ry", "RotateY"),
    ("RotateZ", "RotateZ"),
    ("RZ", "RotateZ"),
    ("Rz", "RotateZ"),
    ("RotateXY", "RotateXY"),
    ("RXY", "RotateXY"),
    ("Rxy", "RotateXY"),
    ("RotateEuler", "RotateEuler"),
    ("Measure", "Measure"),
    ("ISwap", "ISwap"),
    ("ISwapRotation", "ISwapRotation"),
    ("prepz", "PrepGate"),
    ("PrepGate", "PrepGate"),
    ("ResetGate", "ResetGate"),
    ("Reset", "ResetGate"),
    ("Had", "Had"),
    ("H", "Had"),
    ("CNOT", "CNOT"),
    ("CRX", "CRX"),
    ("X", "XGate"),
    ("Y", "YGate"),
    ("Z", "ZGate"),
    ("XGate", "XGate"),
    ("YGate", "YGate"),
    ("ZGate", "ZGate"),
];

/// Aliases of the depolarizing preset, `(alias, library name)`.
pub const DEPOLARIZING_ALIASES: [(&str, &str); 18] = [
    ("CZ", "DepolCZ"),
    ("CNOT", "DepolCNOT"),
    ("RotateX", "DepolRotateX"),
    ("RX", "DepolRotateX"),
    ("Rx", "DepolRotateX"),
    ("RotateY", "DepolRotateY"),
    ("RY", "DepolRotateY"),
    ("Ry", "DepolRotateY"),
    ("RotateZ", "DepolRotateZ"),
    ("RZ", "DepolRotateZ"),
    ("Rz", "DepolRotateZ"),
    ("Measure", "IdealMeasure"),
    ("ISwap", "DepolISwap"),
    ("Had", "DepolHadamard"),
    ("H", "DepolHadamard"),
    ("X", "DepolXGate"),
    ("Y", "DepolYGate"),
    ("Z", "DepolZGate"),
];

/// Maps gate aliases to templates.
///
/// Populated at configuration time and read-only afterwards; cloning shares
/// the templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<GateTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full transmon alias table.
    pub fn transmon() -> Self {
        Self::from_table(&TRANSMON_ALIASES)
    }

    /// Ideal gates with depolarizing noise.
    pub fn depolarizing() -> Self {
        Self::from_table(&DEPOLARIZING_ALIASES)
    }

    // Built-in tables only name library templates; the table tests pin this.
    fn from_table(table: &[(&str, &str)]) -> Self {
        let mut registry = Self::new();
        for (alias, name) in table {
            match library_template(name) {
                Some(template) => {
                    registry.templates.insert(alias.to_string(), template);
                }
                None => warn!("Alias {} names unknown template {}", alias, name),
            }
        }
        registry
    }

    /// Build a registry from `(alias, library name)` pairs.
    pub fn from_library_names<I>(aliases: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut registry = Self::new();
        for (alias, name) in aliases {
            registry.register_library(alias, &name)?;
        }
        Ok(registry)
    }

    /// Register `alias` for the library template `name`.
    pub fn register_library(&mut self, alias: impl Into<String>, name: &str) -> BuildResult<()> {
        let template =
            library_template(name).ok_or_else(|| BuildError::UnknownGate(name.to_string()))?;
        self.templates.insert(alias.into(), template);
        Ok(())
    }

    /// Register a custom template under `alias`.
    pub fn register(&mut self, alias: impl Into<String>, template: GateTemplate) {
        self.templates.insert(alias.into(), Arc::new(template));
    }

    pub fn lookup(&self, alias: &str) -> BuildResult<&Arc<GateTemplate>> {
        self.templates
            .get(alias)
            .ok_or_else(|| BuildError::UnknownGate(alias.to_string()))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.templates.contains_key(alias)
    }

    /// Aliases with their templates, in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<GateTemplate>)> {
        self.templates.iter().map(|(a, t)| (a.as_str(), t))
    }

    /// `alias -> library name` for every alias.
    pub fn library_names(&self) -> BTreeMap<String, String> {
        self.templates
            .iter()
            .map(|(alias, t)| (alias.clone(), t.name().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
