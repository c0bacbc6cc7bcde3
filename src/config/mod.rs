// src/config/mod.rs

//! Configuration for hosts embedding the scheduler.
//!
//! - TOML-backed data model (`model.rs`).
//! - Loading from disk or memory (`loader.rs`).
//! - Validation into a [`ConfigFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, RawConfigFile, RawLoggingSection, ScheduleSection};
