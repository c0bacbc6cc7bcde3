#![allow(dead_code)]

#[allow(unused_imports)]
pub use tablesched_test_utils::{builders, init_tracing, potential};

use tablesched::{HandleId, NodeId, Schedule};

use crate::common::potential::Potential;

/// First result handle of an operation.
pub fn result_of(schedule: &Schedule<Potential>, node: NodeId) -> HandleId {
    schedule.operation(node).expect("unknown node").results()[0]
}
