//! Validation error types.

use thiserror::Error;
use veld_core::FieldErrors;

/// Why a schema did not produce an output.
///
/// Only `Rejected` carries user-facing messages. `Thrown` covers every other
/// failure raised while validating (a transform that errored, a refinement
/// that could not be evaluated, an output that does not fit the target type)
/// and must never be folded into field messages.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The schema rejected the snapshot with per-field messages.
    #[error("Validation failed for {} field(s)", .0.field_count())]
    Rejected(FieldErrors),

    /// Validation could not complete.
    #[error(transparent)]
    Thrown(#[from] anyhow::Error),
}

impl ValidationError {
    /// Field messages, if this is a structured rejection.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected(errors) => Some(errors),
            Self::Thrown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rejections_expose_field_errors() {
        let errors: FieldErrors = [("age", "Минимум 18 лет")].into_iter().collect();
        let rejected = ValidationError::Rejected(errors.clone());
        assert_eq!(rejected.field_errors(), Some(&errors));
        assert_eq!(rejected.to_string(), "Validation failed for 1 field(s)");

        let thrown = ValidationError::from(anyhow::anyhow!("boom"));
        assert!(thrown.field_errors().is_none());
    }
}
