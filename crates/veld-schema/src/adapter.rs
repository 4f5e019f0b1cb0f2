//! Coercion rules applied to raw form data before validation.
//!
//! Form serialization only produces text and files. Each rule turns one raw
//! datum into a typed candidate, or into the absent sentinel (`None`) when the
//! datum carries no usable value. Rules are total: they never fail and never
//! panic, so a malformed input surfaces later as a validation message.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use veld_core::{RawValue, Value};

/// Marker emitted by [`Coercion::Date`] for text that is not a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Naive date-time layouts accepted in addition to RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A named coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Raw text stays text, files stay files.
    #[default]
    Passthrough,
    /// Empty text becomes absent; other text is kept as is.
    String,
    /// Text parsed as a finite number; anything else becomes absent.
    ///
    /// Blank text is absent, not zero, so a blank required number reports its
    /// required message rather than a range message. Numeric coercion in
    /// browsers reads `""` as `0`; this rule deliberately does not.
    Number,
    /// Text parsed as a date and re-emitted in canonical UTC form.
    Date,
    /// Exactly `"on"` is checked; everything else, absence included, is not.
    Checkbox,
}

impl Coercion {
    /// Apply the rule to one raw datum (`None` when the key was missing).
    #[must_use]
    pub fn apply(self, raw: Option<&RawValue>) -> Option<Value> {
        match self {
            Self::Passthrough => raw.map(passthrough),
            Self::String => coerce_string(raw),
            Self::Number => coerce_number(raw),
            Self::Date => coerce_date(raw),
            Self::Checkbox => Some(coerce_checkbox(raw)),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
        }
    }
}

fn passthrough(raw: &RawValue) -> Value {
    match raw {
        RawValue::Text(text) => Value::Text(text.clone()),
        RawValue::File(file) => Value::File(file.clone()),
    }
}

fn coerce_string(raw: Option<&RawValue>) -> Option<Value> {
    match raw? {
        RawValue::Text(text) if text.is_empty() => None,
        other => Some(passthrough(other)),
    }
}

fn coerce_number(raw: Option<&RawValue>) -> Option<Value> {
    let text = raw?.as_text()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(Value::Number)
}

fn coerce_date(raw: Option<&RawValue>) -> Option<Value> {
    let text = raw?.as_text()?.trim();
    if text.is_empty() {
        return None;
    }
    let canonical = parse_date(text).map_or_else(
        || INVALID_DATE.to_string(),
        |date| date.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    Some(Value::Text(canonical))
}

fn coerce_checkbox(raw: Option<&RawValue>) -> Value {
    Value::Bool(raw.and_then(RawValue::as_text) == Some("on"))
}

/// Parse the date layouts a date or datetime control can submit.
///
/// Inputs without an offset are read as UTC.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// `true` if `text` is a canonical date produced by [`Coercion::Date`].
#[must_use]
pub fn is_canonical_date(text: &str) -> bool {
    text != INVALID_DATE && DateTime::parse_from_rfc3339(text).is_ok()
}
