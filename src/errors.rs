// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::{HandleId, NodeId};

#[derive(Error, Debug)]
pub enum TableschedError {
    #[error("Unknown schedule multidim: {0}")]
    UnknownScheduleMultiDim(HandleId),

    #[error("Duplicate schedule multidim: {0}")]
    DuplicateScheduleMultiDim(HandleId),

    #[error("Abstract schedule multidim {0} has no materialized table")]
    AbstractScheduleMultiDim(HandleId),

    #[error("Operation not allowed: {0}")]
    OperationNotAllowed(String),

    #[error("Unknown schedule operation: {0}")]
    UnknownScheduleOperation(String),

    #[error("Schedule operation {0} is not available for execution")]
    UnavailableScheduleOperation(NodeId),

    #[error("Schedule operation {0} has not been executed")]
    UnexecutedScheduleOperation(NodeId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TableschedError>;
