//! Per-field error map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field::FieldName;

/// Pseudo-field that collects failures not attributed to any field.
pub const FORM_ERRORS_KEY: &str = "_form";

/// Messages produced by one validation attempt, keyed by field.
///
/// An empty map means "no errors". The form controller replaces its map
/// wholesale on every attempt; entries are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<FieldName, Vec<String>>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field, creating its entry on first use.
    pub fn push(&mut self, field: impl Into<FieldName>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Append a message that belongs to the form as a whole.
    pub fn push_form(&mut self, message: impl Into<String>) {
        self.push(FORM_ERRORS_KEY, message);
    }

    /// Move every message from `other` into `self`, preserving order.
    pub fn extend(&mut self, other: Self) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn form_messages(&self) -> &[String] {
        self.messages(FORM_ERRORS_KEY)
    }

    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        !self.messages(field).is_empty()
    }

    /// Display text for a field: its messages joined by `separator`, or
    /// `None` when the field has no error.
    #[must_use]
    pub fn label(&self, field: &str, separator: &str) -> Option<String> {
        let messages = self.messages(field);
        (!messages.is_empty()).then(|| messages.join(separator))
    }

    /// Number of fields carrying at least one entry.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }
}

impl<N: Into<FieldName>, M: Into<String>> FromIterator<(N, M)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (N, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.push(field, message);
        }
        errors
    }
}
