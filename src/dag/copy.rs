// src/dag/copy.rs

//! Deep copy of a schedule.
//!
//! Sources are copied first. Operations are then re-registered in a
//! topological order of the full DAG, so that every argument already exists
//! in the copy when the operation reading it is registered. Handle ids and
//! node ids are kept, and each node is live in the copy exactly when it is
//! live in the original.

use tracing::{debug, warn};

use crate::dag::registry::Registry;
use crate::dag::schedule::Schedule;
use crate::dag::graph::OperationGraph;
use crate::types::NodeId;

impl<T: Clone> Clone for Schedule<T> {
    fn clone(&self) -> Self {
        let mut copy = Schedule {
            dag: OperationGraph::new(),
            operations: Default::default(),
            registry: Registry::new(),
            next_node: self.next_node,
            options: self.options,
        };

        for id in self.registry.sources() {
            if let Some(handle) = self.registry.tables.get(&id) {
                copy.registry.register(handle.clone(), None);
            }
        }

        let order: Vec<NodeId> = match self.topological_order() {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "full DAG is not acyclic; copying in insertion order");
                self.operations.keys().copied().collect()
            }
        };

        for node in order {
            let Some(op) = self.operations.get(&node) else {
                continue;
            };
            let live = self.dag.contains_node(node);
            copy.register_operation(node, op.clone(), Some(op.results().to_vec()), live);

            for result in op.results() {
                let table = self.registry.tables.get(result).and_then(|h| h.table());
                if let (Some(table), Some(handle)) = (table, copy.registry.tables.get_mut(result)) {
                    handle.set_table(table.clone());
                }
            }
        }

        debug!(
            operations = copy.operations.len(),
            live = copy.dag.node_count(),
            handles = copy.registry.tables.len(),
            "copied schedule"
        );
        copy
    }
}
