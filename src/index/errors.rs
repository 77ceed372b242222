//! Index error types.
//!
//! A key that is absent from the tree is a normal outcome and is reported as
//! an empty result, never as an error. Errors here are caller mistakes,
//! surfaced synchronously at the offending call.

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// insert/update was handed a field value that folds to the empty
    /// string; an empty key cannot be stored or found again.
    #[error("cannot index an empty value for field '{field}'")]
    EmptyKey { field: &'static str },
}
