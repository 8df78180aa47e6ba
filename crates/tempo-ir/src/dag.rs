//! Wire-dependency graph of a timed circuit.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};
use crate::operation::ScheduledOp;

/// Node index type for the timing DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// Dependency graph over scheduled operations.
///
/// Each node holds the index of an operation in the circuit's operation list.
/// Operations are chained per wire in time order (ties broken by insertion
/// order), so an edge `a -> b` means `a` must run before `b` because they
/// share a quantum or classical wire.
#[derive(Debug, Clone)]
pub struct TimedDag {
    graph: DiGraph<usize, String, u32>,
    times: Vec<f64>,
}

impl TimedDag {
    /// Build the dependency graph of `ops`.
    pub fn from_operations(ops: &[ScheduledOp]) -> Self {
        let mut graph = DiGraph::with_capacity(ops.len(), ops.len());
        let nodes: Vec<NodeIndex> = (0..ops.len()).map(|i| graph.add_node(i)).collect();

        let mut by_time: Vec<usize> = (0..ops.len()).collect();
        by_time.sort_by(|&a, &b| ops[a].time.total_cmp(&ops[b].time).then(a.cmp(&b)));

        let mut last_on_wire: FxHashMap<&str, NodeIndex> = FxHashMap::default();
        for idx in by_time {
            let node = nodes[idx];
            for wire in ops[idx].wires() {
                if let Some(prev) = last_on_wire.insert(wire, node) {
                    if prev != node {
                        graph.add_edge(prev, node, wire.to_string());
                    }
                }
            }
        }

        Self {
            graph,
            times: ops.iter().map(|op| op.time).collect(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Operation indices that must run directly before `op`.
    pub fn predecessors(&self, op: usize) -> Vec<usize> {
        let mut preds: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(op), Direction::Incoming)
            .map(|n| self.graph[n])
            .collect();
        preds.sort_unstable();
        preds.dedup();
        preds
    }

    /// A topological order of operation indices.
    ///
    /// Among operations whose dependencies are satisfied, the earliest
    /// timestamp runs first, then the lowest insertion index.
    pub fn execution_order(&self) -> IrResult<Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<ReadyOp>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(idx, _)| Reverse(self.ready(idx)))
            .collect();

        let mut order = Vec::with_capacity(self.num_nodes());
        while let Some(Reverse(next)) = ready.pop() {
            order.push(next.index);
            for succ in self
                .graph
                .neighbors_directed(NodeIndex::new(next.index), Direction::Outgoing)
            {
                let idx = self.graph[succ];
                in_degree[idx] -= 1;
                if in_degree[idx] == 0 {
                    ready.push(Reverse(self.ready(idx)));
                }
            }
        }

        if order.len() != self.num_nodes() {
            return Err(IrError::InvalidDag(format!(
                "cycle detected: ordered {} of {} operations",
                order.len(),
                self.num_nodes()
            )));
        }
        Ok(order)
    }

    fn ready(&self, index: usize) -> ReadyOp {
        ReadyOp {
            time: self.times[index],
            index,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ReadyOp {
    time: f64,
    index: usize,
}

impl Ord for ReadyOp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for ReadyOp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReadyOp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReadyOp {}
