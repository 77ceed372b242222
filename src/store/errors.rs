//! Store error types.

use thiserror::Error;

use crate::index::IndexError;
use crate::validate::ValidationError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {id}")]
    NotFound { id: String },

    #[error("duplicate record id: {id}")]
    DuplicateId { id: String },

    #[error("id sequence exhausted: ids are limited to 10 characters")]
    IdOverflow,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
