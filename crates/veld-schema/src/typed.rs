//! Conversion of a validated output into a caller-defined type.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use veld_core::{RawFormSnapshot, ValidatedOutput};

use crate::engine::FormSchema;
use crate::error::ValidationError;
use crate::introspect::{Introspectable, SchemaLayer};

/// Schema `S` whose output is deserialized into `T`.
///
/// Structurally transparent: introspection sees `S` itself.
pub struct Typed<S, T> {
    inner: S,
    _output: PhantomData<fn() -> T>,
}

impl<S, T> Typed<S, T>
where
    S: FormSchema<Output = ValidatedOutput>,
    T: DeserializeOwned + Send + Sync + 'static,
{
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            _output: PhantomData,
        }
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    async fn run(&self, snapshot: &RawFormSnapshot) -> Result<T, ValidationError> {
        let output = self.inner.parse(snapshot).await?;
        output
            .deserialize()
            .map_err(|error| ValidationError::Thrown(error.into()))
    }
}

impl<S: fmt::Debug, T> fmt::Debug for Typed<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("inner", &self.inner)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<S: Introspectable, T> Introspectable for Typed<S, T> {
    fn layer(&self) -> SchemaLayer<'_> {
        self.inner.layer()
    }
}

impl<S, T> FormSchema for Typed<S, T>
where
    S: FormSchema<Output = ValidatedOutput>,
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Output = T;

    fn parse(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Result<Self::Output, ValidationError>> + Send {
        self.run(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSchema;
    use crate::introspect::{FieldShape, is_required};
    use crate::object::ObjectSchema;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u8,
    }

    fn schema() -> Typed<ObjectSchema, Person> {
        Typed::new(
            ObjectSchema::new()
                .field("name", FieldSchema::string("name"))
                .field("age", FieldSchema::number("age")),
        )
    }

    #[tokio::test]
    async fn converts_output_into_target_type() {
        let snapshot = RawFormSnapshot::from_entries([("name", "Neo"), ("age", "42")]);
        let person = schema().parse(&snapshot).await.unwrap();
        assert_eq!(
            person,
            Person {
                name: "Neo".into(),
                age: 42,
            }
        );
    }

    #[tokio::test]
    async fn unfit_output_is_thrown() {
        let snapshot = RawFormSnapshot::from_entries([("name", "Neo"), ("age", "4.5")]);
        assert!(matches!(
            schema().parse(&snapshot).await,
            Err(ValidationError::Thrown(_))
        ));
    }

    #[test]
    fn introspection_is_transparent() {
        let schema = schema();
        assert!(is_required(&schema, "age"));
        assert_eq!(schema.inner().field_names(), vec!["name", "age"]);
    }
}
