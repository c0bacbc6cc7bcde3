// src/ops/kind.rs

//! The closed set of operation kinds and the callables they carry.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::types::Variable;

/// Binary combination of two tables into a new one.
pub type CombineFn<T> = Arc<dyn Fn(&T, &T) -> T + Send + Sync>;

/// Projection of a table: the set holds the variables to eliminate.
pub type ProjectFn<T> = Arc<dyn Fn(&T, &BTreeSet<Variable>) -> T + Send + Sync>;

/// External container receiving tables moved out by storage operations.
pub type TableSink<T> = Arc<Mutex<Vec<T>>>;

/// What an operation does. Callables and containers are opaque: they are
/// compared by pointer identity and only ever invoked on behalf of the caller.
pub enum OperationKind<T> {
    Combination { combine: CombineFn<T> },
    Projection {
        eliminated: BTreeSet<Variable>,
        project: ProjectFn<T>,
    },
    Deletion,
    Storage { container: TableSink<T> },
}

impl<T> OperationKind<T> {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Combination { .. } => "combination",
            OperationKind::Projection { .. } => "projection",
            OperationKind::Deletion => "deletion",
            OperationKind::Storage { .. } => "storage",
        }
    }

    /// Same kind and same configuration.
    pub fn is_same_kind(&self, other: &Self) -> bool {
        match (self, other) {
            (
                OperationKind::Combination { combine: f1 },
                OperationKind::Combination { combine: f2 },
            ) => Arc::ptr_eq(f1, f2),
            (
                OperationKind::Projection {
                    eliminated: e1,
                    project: p1,
                },
                OperationKind::Projection {
                    eliminated: e2,
                    project: p2,
                },
            ) => e1 == e2 && Arc::ptr_eq(p1, p2),
            (OperationKind::Deletion, OperationKind::Deletion) => true,
            (
                OperationKind::Storage { container: c1 },
                OperationKind::Storage { container: c2 },
            ) => Arc::ptr_eq(c1, c2),
            _ => false,
        }
    }

    /// Variables of the tables this kind produces, given its arguments'.
    pub fn result_variables(&self, args: &[&[Variable]]) -> Vec<Vec<Variable>> {
        match self {
            OperationKind::Combination { .. } => {
                let mut vars: Vec<Variable> = Vec::new();
                for v in args.iter().flat_map(|a| a.iter()) {
                    if !vars.contains(v) {
                        vars.push(v.clone());
                    }
                }
                vec![vars]
            }
            OperationKind::Projection { eliminated, .. } => {
                let vars: Vec<Variable> = args
                    .first()
                    .map(|a| {
                        a.iter()
                            .filter(|v| !eliminated.contains(*v))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                vec![vars]
            }
            OperationKind::Deletion | OperationKind::Storage { .. } => Vec::new(),
        }
    }
}

impl<T> Clone for OperationKind<T> {
    fn clone(&self) -> Self {
        match self {
            OperationKind::Combination { combine } => OperationKind::Combination {
                combine: Arc::clone(combine),
            },
            OperationKind::Projection {
                eliminated,
                project,
            } => OperationKind::Projection {
                eliminated: eliminated.clone(),
                project: Arc::clone(project),
            },
            OperationKind::Deletion => OperationKind::Deletion,
            OperationKind::Storage { container } => OperationKind::Storage {
                container: Arc::clone(container),
            },
        }
    }
}

impl<T> fmt::Debug for OperationKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Projection { eliminated, .. } => f
                .debug_struct("Projection")
                .field("eliminated", eliminated)
                .finish_non_exhaustive(),
            other => f.write_str(other.name()),
        }
    }
}
