// src/ops/cost.rs

//! Rough size/work estimates, in table cells.

use crate::ops::kind::OperationKind;
use crate::types::{Variable, domain_size};

/// Estimated cost of running one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationCost {
    /// Elementary operations (one per visited cell).
    pub operations: u64,
    /// Cells allocated while the operation runs.
    pub peak_memory: u64,
    /// Cells released once it has run (deleted or moved-out arguments).
    pub released_memory: u64,
}

impl<T> OperationKind<T> {
    /// Estimate the cost of this kind over arguments with the given
    /// variables. `implies_deletion` adds the arguments to the released
    /// memory.
    pub fn cost(&self, args: &[&[Variable]], implies_deletion: bool) -> OperationCost {
        let results = self.result_variables(args);
        let result_cells: u64 = results.iter().map(|r| domain_size(r)).sum();
        let arg_cells: u64 = args.iter().map(|a| domain_size(a)).sum();

        let operations = match self {
            OperationKind::Combination { .. } => result_cells,
            OperationKind::Projection { .. } => arg_cells,
            OperationKind::Deletion | OperationKind::Storage { .. } => 1,
        };

        OperationCost {
            operations,
            peak_memory: result_cells,
            released_memory: if implies_deletion { arg_cells } else { 0 },
        }
    }
}
