// src/ops/mod.rs

//! Operations a schedule orders.
//!
//! - [`kind`] is the closed set of operation kinds and their callables.
//! - [`operation`] wraps a kind with its argument/result handles.
//! - [`cost`] estimates work and memory per operation.

pub mod cost;
pub mod kind;
pub mod operation;

pub use cost::OperationCost;
pub use kind::{CombineFn, OperationKind, ProjectFn, TableSink};
pub use operation::ScheduleOperation;
