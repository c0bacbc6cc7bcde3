// src/dag/execution.rs

//! Caller-side helpers for running scheduled operations.
//!
//! The split between [`Schedule::compute`] (shared borrow) and
//! [`Schedule::complete`] (exclusive borrow) lets a caller run several
//! available operations on worker threads and then apply their results one
//! at a time on the coordinating thread.

use std::sync::PoisonError;

use tracing::debug;

use crate::dag::graph;
use crate::dag::schedule::Schedule;
use crate::errors::{Result, TableschedError};
use crate::ops::{OperationCost, OperationKind};
use crate::types::{NodeId, Variable};

impl<T> Schedule<T> {
    /// Run the callable of an available operation on its inputs and return
    /// the tables it produces, in result order. Nothing is stored.
    pub fn compute(&self, node: NodeId) -> Result<Vec<T>> {
        let op = self.operation(node)?;
        if op.is_executed() {
            return Err(TableschedError::OperationNotAllowed(format!(
                "operation {node} has already been executed"
            )));
        }
        if !self.dag.contains_node(node) || graph::has_parents(&self.dag, node) {
            return Err(TableschedError::UnavailableScheduleOperation(node));
        }

        let inputs = op
            .args()
            .iter()
            .map(|arg| self.table(*arg))
            .collect::<Result<Vec<&T>>>()?;

        Ok(op.compute(&inputs))
    }

    /// Store the results of `node`, release the tables it deletes (storage
    /// moves them into its container), mark it executed and advance the DAG.
    ///
    /// Returns the operations that became available.
    pub fn complete(&mut self, node: NodeId, results: Vec<T>) -> Result<Vec<NodeId>> {
        let checked = self.options.checked_updates;
        let op = self.operation(node)?;
        if op.is_executed() {
            return Err(TableschedError::OperationNotAllowed(format!(
                "operation {node} has already been executed"
            )));
        }
        if results.len() != op.results().len() {
            return Err(TableschedError::OperationNotAllowed(format!(
                "operation {node} produces {} tables, got {}",
                op.results().len(),
                results.len()
            )));
        }
        if checked && (!self.dag.contains_node(node) || graph::has_parents(&self.dag, node)) {
            return Err(TableschedError::UnavailableScheduleOperation(node));
        }

        let result_ids = op.results().to_vec();
        let deleted = if op.implies_deletion() {
            op.args().to_vec()
        } else {
            Vec::new()
        };
        let container = match op.kind() {
            OperationKind::Storage { container } => Some(container.clone()),
            _ => None,
        };

        for (id, table) in result_ids.iter().zip(results) {
            if let Some(handle) = self.registry.tables.get_mut(id) {
                handle.set_table(table);
            }
        }

        for arg in &deleted {
            let released = self
                .registry
                .tables
                .get_mut(arg)
                .and_then(|handle| handle.take_table());
            if let (Some(table), Some(container)) = (released, container.as_ref()) {
                container
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(table);
            }
        }

        if let Some(op) = self.operations.get_mut(&node) {
            op.set_executed();
        }
        debug!(%node, released = deleted.len(), "operation completed");

        self.update_after_execution(node, checked)
    }

    /// [`compute`](Self::compute) followed by [`complete`](Self::complete).
    pub fn execute(&mut self, node: NodeId) -> Result<Vec<NodeId>> {
        let results = self.compute(node)?;
        self.complete(node, results)
    }

    /// Flag an operation as executed without touching any table, for callers
    /// that keep the actual tables outside the schedule. The DAG is advanced
    /// separately with [`update_after_execution`](Self::update_after_execution).
    pub fn mark_executed(&mut self, node: NodeId) -> Result<()> {
        let op = self
            .operations
            .get_mut(&node)
            .ok_or_else(|| TableschedError::UnknownScheduleOperation(node.to_string()))?;
        op.set_executed();
        Ok(())
    }

    /// Estimated work and memory of an operation, from its arguments' shapes.
    pub fn operation_cost(&self, node: NodeId) -> Result<OperationCost> {
        let op = self.operation(node)?;
        let arg_vars = op
            .args()
            .iter()
            .map(|arg| self.schedule_multi_dim(*arg).map(|h| h.variables()))
            .collect::<Result<Vec<&[Variable]>>>()?;
        Ok(op.kind().cost(&arg_vars, op.implies_deletion()))
    }
}
