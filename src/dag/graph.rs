// src/dag/graph.rs

//! Graph helpers over the operation DAG.
//!
//! Edges mean "must run before": producer → consumer, and every other
//! consumer of a handle → the operation deleting it.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;

use crate::dag::registry::Registry;
use crate::types::NodeId;

/// DAG of operation nodes.
pub type OperationGraph = DiGraphMap<NodeId, ()>;

pub(crate) fn has_parents(graph: &OperationGraph, node: NodeId) -> bool {
    graph
        .neighbors_directed(node, Direction::Incoming)
        .next()
        .is_some()
}

/// Nodes without parents.
pub(crate) fn roots(graph: &OperationGraph) -> BTreeSet<NodeId> {
    graph.nodes().filter(|n| !has_parents(graph, *n)).collect()
}

/// Re-derive the dependency graph of *all* registered operations from the
/// handle bookkeeping, as if none had executed yet.
pub(crate) fn build_full_dag<T>(
    nodes: impl Iterator<Item = NodeId>,
    registry: &Registry<T>,
) -> OperationGraph {
    let mut graph = OperationGraph::new();
    for node in nodes {
        graph.add_node(node);
    }

    for (handle, consumers) in registry.consumers.iter() {
        if let Some(producer) = registry.producer(*handle) {
            for consumer in consumers {
                graph.add_edge(producer, *consumer, ());
            }
        }
        if let Some(deleter) = registry.deleter(*handle) {
            for consumer in consumers.iter().filter(|c| **c != deleter) {
                graph.add_edge(*consumer, deleter, ());
            }
        }
    }

    graph
}

/// Whether giving a new node the parents `preds` and the children `succs`
/// would close a cycle: some child already reaches some parent.
pub(crate) fn would_close_cycle(
    graph: &OperationGraph,
    preds: &BTreeSet<NodeId>,
    succs: &BTreeSet<NodeId>,
) -> bool {
    succs.iter().any(|succ| {
        preds.iter().any(|pred| {
            succ == pred
                || (graph.contains_node(*succ)
                    && graph.contains_node(*pred)
                    && has_path_connecting(graph, *succ, *pred, None))
        })
    })
}
