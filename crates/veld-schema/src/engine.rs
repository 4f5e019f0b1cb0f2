//! Validation engine.
//!
//! `FormSchema` is the contract every validator fulfils: run against a full
//! snapshot and either produce a typed output or fail with a
//! [`ValidationError`]. The engine itself never touches form state.

use std::future::Future;

use futures::FutureExt;
use veld_core::{FieldErrors, RawFormSnapshot};

use crate::error::ValidationError;
use crate::introspect::Introspectable;

/// A schema that validates whole form snapshots.
pub trait FormSchema: Introspectable + Send + Sync {
    /// Typed result of a successful validation.
    type Output: Send + Sync + 'static;

    /// Validate `snapshot`. Fields missing from the snapshot are absent.
    fn parse(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Result<Self::Output, ValidationError>> + Send;

    /// Validate `snapshot`, keeping the output when every rejected field
    /// still produced a value and only failed its value checks.
    ///
    /// Refinement layers use this to evaluate cross-field rules alongside
    /// field checks. Schemas that cannot tell the two cases apart keep the
    /// default, which never reports [`Parsed::Dirty`].
    fn parse_partial(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Parsed<Self::Output>> + Send {
        self.parse(snapshot).map(Parsed::from)
    }
}

/// Result of [`FormSchema::parse_partial`].
#[derive(Debug)]
pub enum Parsed<T> {
    Valid(T),
    /// Some fields failed value checks, but every field has a value.
    /// `output` includes the values that were rejected.
    Dirty { output: T, errors: FieldErrors },
    /// A field was missing or mistyped, or validation could not complete.
    Failed(ValidationError),
}

impl<T> Parsed<T> {
    /// Collapse into the plain validation result; `Dirty` becomes a rejection.
    ///
    /// # Errors
    ///
    /// Returns the rejection or failure this parse ended with.
    pub fn into_result(self) -> Result<T, ValidationError> {
        match self {
            Self::Valid(output) => Ok(output),
            Self::Dirty { errors, .. } => Err(ValidationError::Rejected(errors)),
            Self::Failed(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for Parsed<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(output) => Self::Valid(output),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Run `schema` against `snapshot`.
///
/// # Errors
///
/// Returns `ValidationError::Rejected` with per-field messages when the
/// snapshot is invalid, or `ValidationError::Thrown` when validation itself
/// failed.
pub async fn validate<S: FormSchema>(
    schema: &S,
    snapshot: &RawFormSnapshot,
) -> Result<S::Output, ValidationError> {
    tracing::debug!(fields = snapshot.len(), "validating form snapshot");
    let result = schema.parse(snapshot).await;
    match &result {
        Ok(_) => tracing::debug!("form snapshot is valid"),
        Err(error) => match error.field_errors() {
            Some(errors) => tracing::debug!(
                invalid_fields = errors.field_count(),
                "form snapshot rejected"
            ),
            None => tracing::debug!(%error, "form validation failed unexpectedly"),
        },
    }
    result
}
