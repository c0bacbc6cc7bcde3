// src/dag/schedule.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::Direction;
use tracing::{debug, warn};

use crate::config::{ConfigFile, ScheduleSection};
use crate::dag::graph::{self, OperationGraph};
use crate::dag::registry::{Location, Registry};
use crate::errors::{Result, TableschedError};
use crate::ops::{CombineFn, ProjectFn, ScheduleOperation, TableSink};
use crate::table::ScheduleMultiDim;
use crate::types::{HandleId, NodeId, Variable};

/// Behaviour switches for a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Precondition checks performed by `complete` / `execute` when they
    /// advance the DAG.
    pub checked_updates: bool,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            checked_updates: true,
        }
    }
}

impl From<ScheduleSection> for ScheduleOptions {
    fn from(section: ScheduleSection) -> Self {
        Self {
            checked_updates: section.checked_updates,
        }
    }
}

impl From<&ConfigFile> for ScheduleOptions {
    fn from(cfg: &ConfigFile) -> Self {
        cfg.schedule.into()
    }
}

/// Deferred-execution schedule of table operations.
///
/// The schedule owns:
/// - every registered handle (sources and operation results),
/// - every inserted operation, keyed by [`NodeId`],
/// - the *live* DAG: operations not yet executed, with "must run before"
///   edges derived from data and deletion dependencies.
///
/// It never runs anything on its own. Callers ask for
/// [`available_operations`](Schedule::available_operations), run them (possibly
/// in parallel), and report back through
/// [`update_after_execution`](Schedule::update_after_execution).
#[derive(Debug)]
pub struct Schedule<T> {
    pub(crate) dag: OperationGraph,
    pub(crate) operations: BTreeMap<NodeId, ScheduleOperation<T>>,
    pub(crate) registry: Registry<T>,
    pub(crate) next_node: u64,
    pub(crate) options: ScheduleOptions,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self::with_options(ScheduleOptions::default())
    }

    pub fn with_options(options: ScheduleOptions) -> Self {
        Self {
            dag: OperationGraph::new(),
            operations: BTreeMap::new(),
            registry: Registry::new(),
            next_node: 0,
            options,
        }
    }

    /// Build an empty schedule configured from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::with_options(cfg.into())
    }

    pub fn options(&self) -> ScheduleOptions {
        self.options
    }

    // ----------------------------------------------------------------------
    // Sources
    // ----------------------------------------------------------------------

    /// Register `table` as a source over `variables`.
    ///
    /// The schedule takes ownership of the table. If `id` is given it is used
    /// as the handle id and must not be registered yet.
    pub fn insert_table(
        &mut self,
        table: T,
        variables: Vec<Variable>,
        id: Option<HandleId>,
    ) -> Result<HandleId> {
        let id = id.unwrap_or_else(HandleId::fresh);
        self.insert_schedule_multi_dim(ScheduleMultiDim::with_id(id, variables, Some(table)))
    }

    /// Register a caller-built handle as a source.
    pub fn insert_schedule_multi_dim(&mut self, handle: ScheduleMultiDim<T>) -> Result<HandleId> {
        let id = handle.id();
        if handle.is_abstract() {
            warn!(handle = %id, "refusing to register an abstract handle as a source");
            return Err(TableschedError::AbstractScheduleMultiDim(id));
        }
        if self.registry.contains(id) {
            warn!(handle = %id, "handle already registered");
            return Err(TableschedError::DuplicateScheduleMultiDim(id));
        }

        debug!(handle = %id, vars = handle.variables().len(), "registered source table");
        self.registry.register(handle, None);
        Ok(id)
    }

    // ----------------------------------------------------------------------
    // Operations
    // ----------------------------------------------------------------------

    /// Insert a copy of `prototype` and return its node id.
    ///
    /// Fails without touching the schedule if an argument is unknown, if the
    /// operation would read or delete an already deleted table, delete a
    /// table another operation deletes, delete a table that still has
    /// pending readers while being already executed, or close a dependency
    /// cycle.
    pub fn insert_operation(&mut self, prototype: &ScheduleOperation<T>) -> Result<NodeId> {
        self.validate_insertion(prototype)?;

        let node = NodeId::new(self.next_node);
        self.next_node += 1;
        let live = !prototype.is_executed();
        self.register_operation(node, prototype.clone(), None, live);
        Ok(node)
    }

    pub fn emplace_binary_combination(
        &mut self,
        a: HandleId,
        b: HandleId,
        combine: CombineFn<T>,
        delete_args: bool,
    ) -> Result<NodeId> {
        let mut op = ScheduleOperation::binary_combination(a, b, combine);
        if delete_args {
            op = op.deleting_args();
        }
        self.insert_operation(&op)
    }

    pub fn emplace_projection(
        &mut self,
        a: HandleId,
        eliminated: impl IntoIterator<Item = Variable>,
        project: ProjectFn<T>,
        delete_args: bool,
    ) -> Result<NodeId> {
        let mut op = ScheduleOperation::projection(a, eliminated, project);
        if delete_args {
            op = op.deleting_args();
        }
        self.insert_operation(&op)
    }

    pub fn emplace_deletion(&mut self, a: HandleId) -> Result<NodeId> {
        self.insert_operation(&ScheduleOperation::deletion(a))
    }

    pub fn emplace_storage(&mut self, a: HandleId, container: TableSink<T>) -> Result<NodeId> {
        self.insert_operation(&ScheduleOperation::storage(a, container))
    }

    /// All checks of `insert_operation`, performed before any mutation.
    fn validate_insertion(&self, op: &ScheduleOperation<T>) -> Result<()> {
        for arg in op.args() {
            if !self.registry.contains(*arg) {
                warn!(handle = %arg, kind = op.kind().name(), "operation argument not registered");
                return Err(TableschedError::UnknownScheduleMultiDim(*arg));
            }
        }

        for arg in op.args() {
            if let Some(deleter) = self.registry.deleter(*arg) {
                let deleter_executed = self
                    .operations
                    .get(&deleter)
                    .is_some_and(|d| d.is_executed());
                if deleter_executed {
                    warn!(handle = %arg, %deleter, "argument already deleted");
                    return Err(TableschedError::OperationNotAllowed(format!(
                        "table {arg} has already been deleted by operation {deleter}"
                    )));
                }
                if op.implies_deletion() {
                    warn!(handle = %arg, %deleter, "argument would be deleted twice");
                    return Err(TableschedError::OperationNotAllowed(format!(
                        "table {arg} is already deleted by operation {deleter}"
                    )));
                }
            }
        }

        if op.is_executed() && op.implies_deletion() {
            for arg in op.args() {
                if let Some(consumer) = self.pending_consumers(*arg).next() {
                    warn!(handle = %arg, %consumer, "executed deletion with pending readers");
                    return Err(TableschedError::OperationNotAllowed(format!(
                        "table {arg} is deleted by an executed operation but operation {consumer} still reads it"
                    )));
                }
            }
        }

        let preds: BTreeSet<NodeId> = op
            .args()
            .iter()
            .filter_map(|arg| self.registry.producer(*arg))
            .collect();
        let succs: BTreeSet<NodeId> = op
            .args()
            .iter()
            .filter_map(|arg| self.registry.deleter(*arg))
            .collect();
        if !preds.is_empty()
            && !succs.is_empty()
            && graph::would_close_cycle(&self.full_dag(), &preds, &succs)
        {
            warn!(kind = op.kind().name(), "insertion would close a dependency cycle");
            return Err(TableschedError::OperationNotAllowed(
                "operation reads a table whose deleter must run before one of its producers"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Bookkeeping shared by insertion and copying: create result handles,
    /// record consumers/deleters and, for a live node, wire its DAG edges.
    ///
    /// `result_ids` forces the ids of the result handles (copies keep them).
    pub(crate) fn register_operation(
        &mut self,
        node: NodeId,
        mut op: ScheduleOperation<T>,
        result_ids: Option<Vec<HandleId>>,
        live: bool,
    ) {
        let result_vars = {
            let arg_vars: Vec<&[Variable]> = op
                .args()
                .iter()
                .map(|arg| {
                    self.registry
                        .tables
                        .get(arg)
                        .map(|h| h.variables())
                        .unwrap_or(&[])
                })
                .collect();
            op.kind().result_variables(&arg_vars)
        };

        let ids: Vec<HandleId> = match result_ids {
            Some(ids) => ids,
            None => result_vars.iter().map(|_| HandleId::fresh()).collect(),
        };

        for arg in op.args() {
            self.registry.consumers.entry(*arg).or_default().insert(node);
            if op.implies_deletion() {
                self.registry.deleters.insert(*arg, node);
            }
        }

        for (index, (id, vars)) in ids.iter().zip(result_vars).enumerate() {
            let location: Location = Some((node, index));
            self.registry
                .register(ScheduleMultiDim::with_id(*id, vars, None), location);
        }
        op.set_results(ids);

        if live {
            self.dag.add_node(node);
            for arg in op.args() {
                if let Some(producer) = self.registry.producer(*arg) {
                    if self.dag.contains_node(producer) {
                        self.dag.add_edge(producer, node, ());
                    }
                }
                if let Some(deleter) = self.registry.deleter(*arg) {
                    if deleter != node && self.dag.contains_node(deleter) {
                        self.dag.add_edge(node, deleter, ());
                    }
                }
                if op.implies_deletion() {
                    let readers: Vec<NodeId> = self
                        .registry
                        .consumers
                        .get(arg)
                        .into_iter()
                        .flatten()
                        .copied()
                        .filter(|c| *c != node && self.dag.contains_node(*c))
                        .collect();
                    for reader in readers {
                        self.dag.add_edge(reader, node, ());
                    }
                }
            }
        }

        debug!(
            %node,
            kind = op.kind().name(),
            args = ?op.args(),
            results = ?op.results(),
            implies_deletion = op.implies_deletion(),
            live,
            "registered operation"
        );
        self.operations.insert(node, op);
    }

    /// Consumers of `handle` that have not been executed yet.
    fn pending_consumers(&self, handle: HandleId) -> impl Iterator<Item = NodeId> + '_ {
        self.registry
            .consumers
            .get(&handle)
            .into_iter()
            .flatten()
            .copied()
            .filter(|c| self.operations.get(c).is_some_and(|op| !op.is_executed()))
    }

    // ----------------------------------------------------------------------
    // Availability and progress
    // ----------------------------------------------------------------------

    /// Operations that can run now: live nodes without parents.
    pub fn available_operations(&self) -> BTreeSet<NodeId> {
        graph::roots(&self.dag)
    }

    /// Remove an executed node from the live DAG and return the children
    /// that became available.
    ///
    /// With `checked`, the node must be live, available and marked executed.
    /// Without it, an unknown node is a no-op.
    pub fn update_after_execution(&mut self, node: NodeId, checked: bool) -> Result<Vec<NodeId>> {
        if checked {
            if !self.dag.contains_node(node) {
                return Err(TableschedError::UnknownScheduleOperation(format!(
                    "{node} is not in the schedule's DAG"
                )));
            }
            if graph::has_parents(&self.dag, node) {
                return Err(TableschedError::UnavailableScheduleOperation(node));
            }
            if !self.operations.get(&node).is_some_and(|op| op.is_executed()) {
                return Err(TableschedError::UnexecutedScheduleOperation(node));
            }
        } else if !self.dag.contains_node(node) {
            return Ok(Vec::new());
        }

        let children: Vec<NodeId> = self
            .dag
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        self.dag.remove_node(node);

        let mut newly_available: Vec<NodeId> = children
            .into_iter()
            .filter(|child| !graph::has_parents(&self.dag, *child))
            .collect();
        newly_available.sort();

        debug!(%node, ?newly_available, "operation removed from DAG");
        Ok(newly_available)
    }

    /// [`update_after_execution`](Self::update_after_execution) addressed by
    /// operation instead of node id (see [`node_id`](Self::node_id)).
    pub fn update_after_operation(
        &mut self,
        op: &ScheduleOperation<T>,
        checked: bool,
    ) -> Result<Vec<NodeId>> {
        let node = self.node_id(op)?;
        self.update_after_execution(node, checked)
    }

    // ----------------------------------------------------------------------
    // Introspection
    // ----------------------------------------------------------------------

    /// The live DAG.
    pub fn dag(&self) -> &OperationGraph {
        &self.dag
    }

    /// The DAG of all registered operations, executed ones included.
    pub fn full_dag(&self) -> OperationGraph {
        if self.dag.node_count() == self.operations.len() {
            return self.dag.clone();
        }
        graph::build_full_dag(self.operations.keys().copied(), &self.registry)
    }

    /// A topological order of the full DAG.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        petgraph::algo::toposort(&self.full_dag(), None).map_err(|cycle| {
            TableschedError::OperationNotAllowed(format!(
                "dependency cycle through operation {}",
                cycle.node_id()
            ))
        })
    }

    pub fn operation(&self, node: NodeId) -> Result<&ScheduleOperation<T>> {
        self.operations
            .get(&node)
            .ok_or_else(|| TableschedError::UnknownScheduleOperation(node.to_string()))
    }

    /// Node id of an operation of this schedule.
    ///
    /// `op` may be the schedule's own operation or a clone of it: result
    /// handles are unique to one operation, and an operation without results
    /// deletes its argument, which no other operation may do.
    pub fn node_id(&self, op: &ScheduleOperation<T>) -> Result<NodeId> {
        self.operations
            .iter()
            .find(|(_, owned)| {
                owned.results() == op.results()
                    && owned.args() == op.args()
                    && owned.is_same_operation(op)
            })
            .map(|(node, _)| *node)
            .ok_or_else(|| {
                TableschedError::UnknownScheduleOperation(
                    "operation is not owned by this schedule".to_string(),
                )
            })
    }

    /// All operations, executed ones included, in node order.
    pub fn operations(&self) -> impl Iterator<Item = (NodeId, &ScheduleOperation<T>)> {
        self.operations.iter().map(|(node, op)| (*node, op))
    }

    pub fn nb_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn schedule_multi_dim(&self, id: HandleId) -> Result<&ScheduleMultiDim<T>> {
        self.registry
            .tables
            .get(&id)
            .ok_or(TableschedError::UnknownScheduleMultiDim(id))
    }

    pub fn schedule_multi_dim_id(&self, handle: &ScheduleMultiDim<T>) -> Result<HandleId> {
        let id = handle.id();
        if self.registry.contains(id) {
            Ok(id)
        } else {
            Err(TableschedError::UnknownScheduleMultiDim(id))
        }
    }

    pub fn nb_schedule_multi_dims(&self) -> usize {
        self.registry.tables.len()
    }

    /// The materialized table behind `id`.
    pub fn table(&self, id: HandleId) -> Result<&T> {
        self.schedule_multi_dim(id)?
            .table()
            .ok_or(TableschedError::AbstractScheduleMultiDim(id))
    }

    /// Producing operation and result index of `id`; `None` for a source.
    pub fn location(&self, id: HandleId) -> Result<Location> {
        self.registry
            .location(id)
            .ok_or(TableschedError::UnknownScheduleMultiDim(id))
    }

    pub fn consumers(&self, id: HandleId) -> Result<&BTreeSet<NodeId>> {
        self.registry
            .consumers
            .get(&id)
            .ok_or(TableschedError::UnknownScheduleMultiDim(id))
    }

    pub fn deleter(&self, id: HandleId) -> Result<Option<NodeId>> {
        if !self.registry.contains(id) {
            return Err(TableschedError::UnknownScheduleMultiDim(id));
        }
        Ok(self.registry.deleter(id))
    }

    /// Ids of the source handles.
    pub fn sources(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.registry.sources()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.registry.tables.is_empty()
    }

    /// Drop every handle and operation and reset the DAG. Safe to call
    /// repeatedly.
    pub fn clear(&mut self) {
        debug!(
            operations = self.operations.len(),
            handles = self.registry.tables.len(),
            "clearing schedule"
        );
        self.dag = OperationGraph::new();
        self.operations.clear();
        self.registry.clear();
        self.next_node = 0;
    }
}
