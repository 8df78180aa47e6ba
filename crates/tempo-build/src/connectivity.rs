//! Qubit connectivity for two-qubit gate materialization.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Which qubit pairs may host two-qubit gates.
///
/// Stored as neighbour lists; a pair is adjacent if either qubit lists the
/// other, so one-sided lists are enough to connect a pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connectivity {
    neighbours: FxHashMap<String, Vec<String>>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `b` to the neighbour list of `a`. Duplicates are ignored.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        let list = self.neighbours.entry(a).or_default();
        if !list.contains(&b) {
            list.push(b);
        }
    }

    /// Build from neighbour lists.
    pub fn from_neighbours<I, N>(lists: I) -> Self
    where
        I: IntoIterator<Item = (String, N)>,
        N: IntoIterator<Item = String>,
    {
        let mut map = Self::new();
        for (qubit, neighbours) in lists {
            map.neighbours.entry(qubit.clone()).or_default();
            for n in neighbours {
                map.add_edge(qubit.clone(), n);
            }
        }
        map
    }

    /// A chain `q0 - q1 - ... - qn`.
    pub fn linear(qubits: &[&str]) -> Self {
        let mut map = Self::new();
        for pair in qubits.windows(2) {
            map.add_edge(pair[0], pair[1]);
        }
        map
    }

    /// Whether `a` and `b` are connected in either direction.
    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        let lists = |x: &str, y: &str| {
            self.neighbours
                .get(x)
                .is_some_and(|list| list.iter().any(|n| n == y))
        };
        lists(a, b) || lists(b, a)
    }

    pub fn neighbours(&self, qubit: &str) -> &[String] {
        self.neighbours.get(qubit).map(Vec::as_slice).unwrap_or(&[])
    }
}
