//! Per-field schemas.
//!
//! A `FieldSchema` describes how one raw datum becomes a typed value: which
//! coercion rule prepares it, what type it must have, whether it may be left
//! out, and which checks and transforms run on the result.

use std::fmt;
use std::sync::Arc;

use veld_core::{RawValue, Value};

use crate::adapter::{Coercion, is_canonical_date};

type CheckFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type TransformFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// Type a field value must have once coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Any,
    Text,
    Number,
    Bool,
    /// Text holding a canonical date.
    Date,
    File,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::File => "file",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Text, Value::Text(_))
            | (Self::Number, Value::Number(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::File, Value::File(_)) => true,
            (Self::Date, Value::Text(text)) => is_canonical_date(text),
            _ => false,
        }
    }
}

#[derive(Clone)]
enum Step {
    Check { predicate: CheckFn, message: String },
    Transform(TransformFn),
}

/// Why one field was rejected.
#[derive(Debug)]
pub enum FieldFailure {
    /// Missing or of the wrong type, so no value exists.
    Invalid(String),
    /// A value was produced but failed checks. `value` is what the failing
    /// checks saw; later transforms did not run.
    Checks { value: Value, messages: Vec<String> },
    /// A transform failed.
    Thrown(anyhow::Error),
}

impl FieldFailure {
    /// User-facing messages, in check order. Empty for `Thrown`.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Invalid(message) => std::slice::from_ref(message),
            Self::Checks { messages, .. } => messages,
            Self::Thrown(_) => &[],
        }
    }
}

/// Schema of a single form field.
#[derive(Clone)]
pub struct FieldSchema {
    coercion: Coercion,
    kind: FieldKind,
    message: String,
    optional: bool,
    default: Option<Value>,
    steps: Vec<Step>,
}

impl FieldSchema {
    fn with(coercion: Coercion, kind: FieldKind, message: impl Into<String>) -> Self {
        Self {
            coercion,
            kind,
            message: message.into(),
            optional: false,
            default: None,
            steps: Vec::new(),
        }
    }

    /// Required text. Empty input counts as missing.
    ///
    /// `message` is reported when the value is missing or not text.
    #[must_use]
    pub fn string(message: impl Into<String>) -> Self {
        Self::with(Coercion::String, FieldKind::Text, message)
    }

    /// Required number parsed from text.
    #[must_use]
    pub fn number(message: impl Into<String>) -> Self {
        Self::with(Coercion::Number, FieldKind::Number, message)
    }

    /// Required date, normalized to canonical UTC text.
    ///
    /// `message` is reported when the date is missing or unparsable.
    #[must_use]
    pub fn date(message: impl Into<String>) -> Self {
        Self::with(Coercion::Date, FieldKind::Date, message)
    }

    /// Checkbox: checked is `true`, anything else `false`.
    ///
    /// Never missing, so it is optional unless [`Self::must_be_checked`] is used.
    #[must_use]
    pub fn checkbox() -> Self {
        let mut schema = Self::with(Coercion::Checkbox, FieldKind::Bool, "");
        schema.optional = true;
        schema
    }

    /// Required file.
    #[must_use]
    pub fn file(message: impl Into<String>) -> Self {
        Self::with(Coercion::Passthrough, FieldKind::File, message)
    }

    /// Required raw value of any kind, without coercion.
    #[must_use]
    pub fn any(message: impl Into<String>) -> Self {
        Self::with(Coercion::Passthrough, FieldKind::Any, message)
    }

    /// Allow the field to be missing; it is then omitted from the output.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Substitute `value` when the field is missing, then validate it as usual.
    ///
    /// A defaulted field counts as optional for introspection even when the
    /// default itself fails a later check: required-ness is read from flags
    /// and never runs the pipeline, so such a field shows no required marker.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Fail with `message` unless `predicate` holds.
    #[must_use]
    pub fn check<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.steps.push(Step::Check {
            predicate: Arc::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Numbers must be at least `min`.
    #[must_use]
    pub fn min(self, min: f64, message: impl Into<String>) -> Self {
        self.check(
            move |value| value.as_number().is_none_or(|number| number >= min),
            message,
        )
    }

    /// Numbers must be at most `max`.
    #[must_use]
    pub fn max(self, max: f64, message: impl Into<String>) -> Self {
        self.check(
            move |value| value.as_number().is_none_or(|number| number <= max),
            message,
        )
    }

    /// Text (in characters) or lists must have at least `min` entries.
    #[must_use]
    pub fn min_len(self, min: usize, message: impl Into<String>) -> Self {
        self.check(move |value| length(value).is_none_or(|len| len >= min), message)
    }

    /// Text (in characters) or lists must have at most `max` entries.
    #[must_use]
    pub fn max_len(self, max: usize, message: impl Into<String>) -> Self {
        self.check(move |value| length(value).is_none_or(|len| len <= max), message)
    }

    /// The checkbox must be checked; makes the field required.
    #[must_use]
    pub fn must_be_checked(mut self, message: impl Into<String>) -> Self {
        self.optional = false;
        self.check(|value| value.as_bool() == Some(true), message)
    }

    /// Replace the value. An error aborts validation of the whole form.
    #[must_use]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.steps.push(Step::Transform(Arc::new(transform)));
        self
    }

    /// Declared optionality. Reads flags only; no rule is evaluated.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub const fn coercion(&self) -> Coercion {
        self.coercion
    }

    /// Coerce and validate one raw datum.
    ///
    /// `Ok(None)` means an optional field was left out.
    ///
    /// # Errors
    ///
    /// Returns `FieldFailure::Invalid` when the value is missing or mistyped,
    /// `FieldFailure::Checks` when it fails a check and `FieldFailure::Thrown`
    /// when a transform fails.
    pub fn validate(&self, raw: Option<&RawValue>) -> Result<Option<Value>, FieldFailure> {
        let Some(mut value) = self
            .coercion
            .apply(raw)
            .or_else(|| self.default.clone())
        else {
            return if self.optional {
                Ok(None)
            } else {
                Err(FieldFailure::Invalid(self.message.clone()))
            };
        };

        if !self.kind.accepts(&value) {
            return Err(FieldFailure::Invalid(self.message.clone()));
        }

        let mut messages = Vec::new();
        for step in &self.steps {
            match step {
                Step::Check { predicate, message } => {
                    if !predicate(&value) {
                        messages.push(message.clone());
                    }
                }
                Step::Transform(transform) => {
                    if !messages.is_empty() {
                        break;
                    }
                    value = transform(value).map_err(FieldFailure::Thrown)?;
                }
            }
        }

        if messages.is_empty() {
            Ok(Some(value))
        } else {
            Err(FieldFailure::Checks { value, messages })
        }
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Text(text) => Some(text.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("coercion", &self.coercion)
            .field("kind", &self.kind)
            .field("optional", &self.is_optional())
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}
