// src/dag/mod.rs

//! The schedule and its DAG algorithms.
//!
//! - [`schedule`] owns handles, operations and the live DAG; insertion,
//!   availability and post-execution updates live there.
//! - [`graph`] holds the petgraph-backed helpers (roots, full DAG rebuild,
//!   cycle checks).
//! - [`registry`] keeps per-handle bookkeeping (location, consumers, deleter).
//! - [`copy`] and [`compare`] implement `Clone` and `PartialEq`.
//! - [`execution`] has the caller-side helpers that run an operation and feed
//!   its results back.

pub mod compare;
pub mod copy;
pub mod execution;
pub mod graph;
pub mod registry;
pub mod schedule;

pub use graph::OperationGraph;
pub use registry::Location;
pub use schedule::{Schedule, ScheduleOptions};
