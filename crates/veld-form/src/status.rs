//! Render state of one field.

use serde::Serialize;

/// What a field renderer shows: the required marker, the invalid style and
/// the message line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldStatus {
    pub required: bool,
    pub invalid: bool,
    /// Joined error messages; `None` when the field is valid.
    pub message: Option<String>,
}
