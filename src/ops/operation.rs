// src/ops/operation.rs

use std::collections::BTreeSet;

use crate::ops::kind::{CombineFn, OperationKind, ProjectFn, TableSink};
use crate::types::{HandleId, Variable};

/// A unit of work over an ordered list of table handles.
///
/// Operations are built by callers as *prototypes* whose arguments name
/// handles already registered in a schedule. Inserting a prototype stores a
/// clone of it; the schedule then fills in the result handles. An operation
/// never touches tables by itself: it only describes what the caller will run.
pub struct ScheduleOperation<T> {
    kind: OperationKind<T>,
    args: Vec<HandleId>,
    results: Vec<HandleId>,
    implies_deletion: bool,
    executed: bool,
}

impl<T> ScheduleOperation<T> {
    fn new(kind: OperationKind<T>, args: Vec<HandleId>, implies_deletion: bool) -> Self {
        Self {
            kind,
            args,
            results: Vec::new(),
            implies_deletion,
            executed: false,
        }
    }

    /// `combine(a, b)`. Keeps its arguments unless [`Self::deleting_args`] is
    /// applied.
    pub fn binary_combination(a: HandleId, b: HandleId, combine: CombineFn<T>) -> Self {
        Self::new(OperationKind::Combination { combine }, vec![a, b], false)
    }

    /// `project(a, eliminated)`.
    pub fn projection(
        a: HandleId,
        eliminated: impl IntoIterator<Item = Variable>,
        project: ProjectFn<T>,
    ) -> Self {
        let eliminated: BTreeSet<Variable> = eliminated.into_iter().collect();
        Self::new(
            OperationKind::Projection {
                eliminated,
                project,
            },
            vec![a],
            false,
        )
    }

    /// Release the table behind `a`.
    pub fn deletion(a: HandleId) -> Self {
        Self::new(OperationKind::Deletion, vec![a], true)
    }

    /// Move the table behind `a` into `container`. The handle is left
    /// abstract, so storage counts as a deletion.
    pub fn storage(a: HandleId, container: TableSink<T>) -> Self {
        Self::new(OperationKind::Storage { container }, vec![a], true)
    }

    /// Make a combination or projection free its arguments once executed.
    /// Deletions and storages always do.
    pub fn deleting_args(mut self) -> Self {
        self.implies_deletion = true;
        self
    }

    /// Mark the prototype as already executed. Such operations are recorded by
    /// the schedule but never enter its live DAG.
    pub fn already_executed(mut self) -> Self {
        self.executed = true;
        self
    }

    pub fn kind(&self) -> &OperationKind<T> {
        &self.kind
    }

    pub fn args(&self) -> &[HandleId] {
        &self.args
    }

    /// Result handles; empty for a prototype that was never inserted.
    pub fn results(&self) -> &[HandleId] {
        &self.results
    }

    pub fn implies_deletion(&self) -> bool {
        self.implies_deletion
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Compare kind, configuration and deletion behaviour. Arguments are not
    /// compared here; the schedule matches those with its own handle logic.
    pub fn is_same_operation(&self, other: &Self) -> bool {
        self.implies_deletion == other.implies_deletion && self.kind.is_same_kind(&other.kind)
    }

    pub(crate) fn set_results(&mut self, results: Vec<HandleId>) {
        self.results = results;
    }

    pub(crate) fn set_executed(&mut self) {
        self.executed = true;
    }

    /// Run the operation's callable on materialized inputs (in argument
    /// order). Deletions and storages produce nothing here; the schedule
    /// releases or moves their arguments when the operation is completed.
    pub(crate) fn compute(&self, inputs: &[&T]) -> Vec<T> {
        match (&self.kind, inputs) {
            (OperationKind::Combination { combine }, [a, b]) => vec![combine(*a, *b)],
            (
                OperationKind::Projection {
                    eliminated,
                    project,
                },
                [a],
            ) => vec![project(*a, eliminated)],
            _ => Vec::new(),
        }
    }
}

impl<T> Clone for ScheduleOperation<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            args: self.args.clone(),
            results: self.results.clone(),
            implies_deletion: self.implies_deletion,
            executed: self.executed,
        }
    }
}

impl<T> std::fmt::Debug for ScheduleOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleOperation")
            .field("kind", &self.kind)
            .field("args", &self.args)
            .field("results", &self.results)
            .field("implies_deletion", &self.implies_deletion)
            .field("executed", &self.executed)
            .finish()
    }
}
