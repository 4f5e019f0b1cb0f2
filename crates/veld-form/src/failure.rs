//! Failures reported to the caller's error callback.

use thiserror::Error;
use veld_core::FieldErrors;
use veld_schema::ValidationError;

/// Everything that can end a submit cycle without success.
///
/// Only `Rejected` is also reflected in the controller's error map.
#[derive(Debug, Error)]
pub enum FormFailure {
    /// The schema rejected the form.
    #[error("Form rejected: {} invalid field(s)", .0.field_count())]
    Rejected(FieldErrors),

    /// Validation could not complete.
    #[error("Form validation failed: {0:#}")]
    Validation(anyhow::Error),

    /// The submit callback failed.
    #[error("Submit handler failed: {0:#}")]
    Submit(anyhow::Error),
}

impl FormFailure {
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected(errors) => Some(errors),
            Self::Validation(_) | Self::Submit(_) => None,
        }
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<ValidationError> for FormFailure {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::Rejected(errors) => Self::Rejected(errors),
            ValidationError::Thrown(error) => Self::Validation(error),
        }
    }
}
