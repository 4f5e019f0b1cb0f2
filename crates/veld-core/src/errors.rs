//! Cross-cutting error types for Veld.
//!
//! Validation failures are not errors at this level: they are data
//! (`FieldErrors`) owned by the form controller. Errors here cover misuse of
//! the data model itself.

use thiserror::Error;

/// Errors that can be raised by the core data model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A validated output could not be converted into the caller's type.
    #[error("Output conversion failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}
