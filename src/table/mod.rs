// src/table/mod.rs

//! Table handles: identity-bearing references to tables a schedule works on.

pub mod multidim;

pub use multidim::ScheduleMultiDim;
