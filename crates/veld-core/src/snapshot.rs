//! Raw form snapshots and validated outputs.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::CoreError;
use crate::field::FieldName;
use crate::value::{RawValue, Value};

/// Every control of a form captured at one instant.
///
/// Built once from form serialization and never mutated afterwards. Keys the
/// form did not submit (an unchecked checkbox, a control outside the form)
/// are simply missing and read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFormSnapshot {
    entries: BTreeMap<FieldName, RawValue>,
}

impl RawFormSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from serialized `(name, value)` entries.
    ///
    /// A name that occurs more than once keeps its last value, the same way
    /// converting form data entries into a flat object does.
    pub fn from_entries<N, V>(entries: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<FieldName>,
        V: Into<RawValue>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<FieldName>, V: Into<RawValue>> FromIterator<(N, V)> for RawFormSnapshot {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

/// Typed result of a successful validation.
///
/// Holds one value per declared field that produced one; optional fields
/// that stayed absent are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedOutput {
    values: BTreeMap<FieldName, Value>,
}

impl ValidatedOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<FieldName>, value: Value) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.values.iter()
    }

    /// Convert the output into a caller-defined serde type.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Deserialize` if the values do not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }
}

impl<N: Into<FieldName>> FromIterator<(N, Value)> for ValidatedOutput {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[test]
    fn repeated_names_keep_last_entry() {
        let snapshot = RawFormSnapshot::from_entries([("skill", "css"), ("skill", "js")]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("skill"), Some(&RawValue::from("js")));
    }

    #[test]
    fn missing_keys_read_as_absent() {
        let snapshot: RawFormSnapshot = [("login", "neo")].into_iter().collect();
        assert!(snapshot.contains("login"));
        assert!(snapshot.get("rememberMe").is_none());
    }

    #[test]
    fn output_deserializes_into_caller_type() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Signup {
            login: String,
            age: u8,
            remember_me: bool,
        }

        let output: ValidatedOutput = [
            ("login", Value::from("neo")),
            ("age", Value::Number(20.0)),
            ("rememberMe", Value::Bool(true)),
        ]
        .into_iter()
        .collect();

        let signup: Signup = output.deserialize().unwrap();
        assert_eq!(
            signup,
            Signup {
                login: "neo".into(),
                age: 20,
                remember_me: true,
            }
        );
    }

    #[test]
    fn output_conversion_failure_is_reported() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsAge {
            age: u8,
        }

        let output: ValidatedOutput = [("age", Value::from("old"))].into_iter().collect();
        let result = output.deserialize::<NeedsAge>();
        assert!(matches!(result, Err(CoreError::Deserialize(_))));
    }
}
