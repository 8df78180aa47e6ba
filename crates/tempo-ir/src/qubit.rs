//! Qubits, the qubit roster, and circuit bits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::param::QubitParams;

/// A named qubit with its parameter record.
///
/// Classical qubits only ever hold measurement outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qubit {
    /// Unique name.
    pub name: String,
    /// Whether this qubit only carries binary outcomes.
    #[serde(default)]
    pub classical: bool,
    /// Noise and timing parameters.
    #[serde(default)]
    pub params: QubitParams,
}

impl Qubit {
    /// Create a quantum qubit.
    pub fn quantum(name: impl Into<String>, params: QubitParams) -> Self {
        Self {
            name: name.into(),
            classical: false,
            params,
        }
    }

    /// Create a classical qubit.
    pub fn classical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classical: true,
            params: QubitParams::default(),
        }
    }
}

/// Ordered set of qubits with unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Qubit>", into = "Vec<Qubit>")]
pub struct QubitRoster {
    qubits: Vec<Qubit>,
}

impl QubitRoster {
    /// Create a roster, rejecting duplicate names.
    pub fn new(qubits: Vec<Qubit>) -> IrResult<Self> {
        let mut roster = Self::default();
        for qubit in qubits {
            roster.push(qubit)?;
        }
        Ok(roster)
    }

    /// Append a qubit.
    pub fn push(&mut self, qubit: Qubit) -> IrResult<()> {
        if self.contains(&qubit.name) {
            return Err(IrError::DuplicateBit(qubit.name));
        }
        self.qubits.push(qubit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Qubit> {
        self.qubits.iter().find(|q| q.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Qubit> {
        self.qubits.iter_mut().find(|q| q.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qubit> {
        self.qubits.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Qubit> {
        self.qubits.iter_mut()
    }

    /// Iterate over non-classical qubits.
    pub fn quantum(&self) -> impl Iterator<Item = &Qubit> {
        self.qubits.iter().filter(|q| !q.classical)
    }

    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }
}

impl TryFrom<Vec<Qubit>> for QubitRoster {
    type Error = IrError;

    fn try_from(qubits: Vec<Qubit>) -> IrResult<Self> {
        Self::new(qubits)
    }
}

impl From<QubitRoster> for Vec<Qubit> {
    fn from(roster: QubitRoster) -> Self {
        roster.qubits
    }
}

/// What a circuit bit carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BitKind {
    /// A qubit that decays with the given lifetimes between operations.
    Quantum { t1: f64, t2: f64 },
    /// A classical outcome register.
    Classical,
}

/// A bit registered in a [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, PartialEq)]
pub struct Bit {
    pub name: String,
    pub kind: BitKind,
}

impl Bit {
    pub fn is_quantum(&self) -> bool {
        matches!(self.kind, BitKind::Quantum { .. })
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BitKind::Quantum { t1, t2 } => write!(f, "{} (t1={t1}, t2={t2})", self.name),
            BitKind::Classical => write!(f, "{} (classical)", self.name),
        }
    }
}
