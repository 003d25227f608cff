//! Core error types.

use thiserror::Error;

use crate::domain::Operation;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while interpreting gateway requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request body carried no `operation` discriminant.
    #[error("Missing operation. Allowed: {}", Operation::allowed_list())]
    MissingOperation,

    /// The `operation` discriminant is not one of the known operations.
    #[error("Invalid operation: {0}. Allowed: {}", Operation::allowed_list())]
    InvalidOperation(String),
}
