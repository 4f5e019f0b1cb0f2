//! Shape-map schemas: a set of named fields validated together.

use std::future::Future;

use veld_core::{FieldErrors, FieldName, RawFormSnapshot, ValidatedOutput};

use crate::engine::{FormSchema, Parsed};
use crate::error::ValidationError;
use crate::field::{FieldFailure, FieldSchema};
use crate::introspect::{FieldShape, Introspectable, SchemaLayer};
use crate::refine::Refined;

/// Named fields in declaration order.
///
/// Validation visits every declared field and collects all messages before
/// failing. Snapshot entries that are not declared are dropped from the
/// output.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(FieldName, FieldSchema)>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Declaring a name twice replaces the earlier schema.
    #[must_use]
    pub fn field(mut self, name: impl Into<FieldName>, schema: FieldSchema) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(existing, _)| existing.as_str() == name)
            .map(|(_, schema)| schema)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (name, schema))
    }

    /// Wrap this shape in a refinement layer with one rule attached to `path`.
    #[must_use]
    pub fn refine_at<F>(
        self,
        path: impl Into<FieldName>,
        predicate: F,
        message: impl Into<String>,
    ) -> Refined<Self>
    where
        F: Fn(&ValidatedOutput) -> bool + Send + Sync + 'static,
    {
        Refined::new(self).refine_at(path, predicate, message)
    }

    /// Wrap this shape in a refinement layer with one form-level rule.
    #[must_use]
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refined<Self>
    where
        F: Fn(&ValidatedOutput) -> bool + Send + Sync + 'static,
    {
        Refined::new(self).refine(predicate, message)
    }

    /// Validate every declared field of `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Thrown` on the first failing transform,
    /// otherwise `ValidationError::Rejected` if any field was rejected.
    pub fn validate_snapshot(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> Result<ValidatedOutput, ValidationError> {
        self.validate_partial(snapshot).into_result()
    }

    /// Like [`Self::validate_snapshot`], but reports [`Parsed::Dirty`] with
    /// the full output when every rejected field failed only its checks.
    #[must_use]
    pub fn validate_partial(&self, snapshot: &RawFormSnapshot) -> Parsed<ValidatedOutput> {
        let mut output = ValidatedOutput::new();
        let mut errors = FieldErrors::new();
        let mut aborted = false;

        for (name, schema) in &self.fields {
            match schema.validate(snapshot.get(name.as_str())) {
                Ok(Some(value)) => output.insert(name.clone(), value),
                Ok(None) => {}
                Err(FieldFailure::Invalid(message)) => {
                    tracing::trace!(
                        field = %name,
                        kind = schema.kind().as_str(),
                        coercion = schema.coercion().as_str(),
                        "field missing or mistyped"
                    );
                    aborted = true;
                    errors.push(name.clone(), message);
                }
                Err(FieldFailure::Checks { value, messages }) => {
                    output.insert(name.clone(), value);
                    for message in messages {
                        errors.push(name.clone(), message);
                    }
                }
                Err(FieldFailure::Thrown(error)) => {
                    return Parsed::Failed(ValidationError::Thrown(
                        error.context(format!("field '{name}' failed to transform")),
                    ));
                }
            }
        }

        if aborted {
            Parsed::Failed(ValidationError::Rejected(errors))
        } else if errors.is_empty() {
            Parsed::Valid(output)
        } else {
            Parsed::Dirty { output, errors }
        }
    }
}

impl FieldShape for ObjectSchema {
    fn is_optional(&self, field: &str) -> Option<bool> {
        self.get(field).map(FieldSchema::is_optional)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Introspectable for ObjectSchema {
    fn layer(&self) -> SchemaLayer<'_> {
        SchemaLayer::Shape(self)
    }
}

impl FormSchema for ObjectSchema {
    type Output = ValidatedOutput;

    fn parse(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Result<Self::Output, ValidationError>> + Send {
        std::future::ready(self.validate_snapshot(snapshot))
    }

    fn parse_partial(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Parsed<Self::Output>> + Send {
        std::future::ready(self.validate_partial(snapshot))
    }
}
