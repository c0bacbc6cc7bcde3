// src/lib.rs

//! Deferred-execution scheduling of table operations.
//!
//! Callers register source tables and operations (combination, projection,
//! deletion, storage) in a [`Schedule`]. The schedule derives a DAG of
//! "must run before" constraints from data and deletion dependencies, tells
//! which operations can run now, and is advanced as the caller reports
//! executed operations. It never computes tables by itself.
//!
//! ```
//! use std::sync::Arc;
//! use tablesched::{Schedule, Variable};
//!
//! let x = Variable::new("x", 2);
//! let y = Variable::new("y", 2);
//!
//! let mut schedule: Schedule<Vec<f64>> = Schedule::new();
//! let a = schedule.insert_table(vec![0.5; 2], vec![x.clone()], None)?;
//! let b = schedule.insert_table(vec![0.25; 2], vec![y.clone()], None)?;
//!
//! let combine: tablesched::CombineFn<Vec<f64>> = Arc::new(|l: &Vec<f64>, r: &Vec<f64>| {
//!     l.iter().flat_map(|lv| r.iter().map(move |rv| lv * rv)).collect()
//! });
//! let node = schedule.emplace_binary_combination(a, b, combine, false)?;
//!
//! assert!(schedule.available_operations().contains(&node));
//! let newly_available = schedule.execute(node)?;
//! assert!(newly_available.is_empty());
//!
//! let result = schedule.operation(node)?.results()[0];
//! assert_eq!(schedule.table(result)?.len(), 4);
//! # Ok::<(), tablesched::errors::TableschedError>(())
//! ```

pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod ops;
pub mod table;
pub mod types;

pub use dag::{Location, OperationGraph, Schedule, ScheduleOptions};
pub use errors::{Result, TableschedError};
pub use ops::{CombineFn, OperationCost, OperationKind, ProjectFn, ScheduleOperation, TableSink};
pub use table::ScheduleMultiDim;
pub use types::{HandleId, LogLevel, NodeId, Variable};
