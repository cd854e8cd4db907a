//! Domain errors for the resource directory and lifecycle operations.

use crate::lifecycle::Action;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Resource details could not be loaded. No ID provided.")]
    MissingId,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Duplicate resource id: {0}")]
    DuplicateId(String),

    #[error("{action} is not available while the resource is {status}")]
    ActionNotPermitted { action: Action, status: String },

    #[error("An operation is already in progress for {0}")]
    OperationInFlight(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
