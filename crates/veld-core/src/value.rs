//! Raw and typed field values.
//!
//! `RawValue` is what form serialization produces: every control yields
//! either text or a file. `Value` is what coercion and validation produce.
//! The "absent" sentinel is `Option::<Value>::None`; it never appears inside
//! a `Value`.

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

/// A binary file selected in a file control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    /// MIME type reported by the control (e.g. `image/png`).
    pub content_type: String,
    pub size: u64,
    bytes: Arc<[u8]>,
}

impl FileHandle {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// The empty file a native form submits when no file was chosen.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("", "application/octet-stream", Vec::new())
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Serialize for FileHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileHandle", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("content_type", &self.content_type)?;
        state.serialize_field("size", &self.size)?;
        state.end()
    }
}

/// One raw datum from form serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    File(FileHandle),
}

impl RawValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<FileHandle> for RawValue {
    fn from(file: FileHandle) -> Self {
        Self::File(file)
    }
}

/// A coerced, typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    File(FileHandle),
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in type-mismatch diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::File(_) => "file",
            Self::List(_) => "list",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness as seen by field registration defaults: empty text, zero,
    /// NaN and `false` are falsy, everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Bool(flag) => *flag,
            Self::File(_) | Self::List(_) => true,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<FileHandle> for Value {
    fn from(file: FileHandle) -> Self {
        Self::File(file)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Integral numbers within `i64` range render without a fractional part.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn as_integral(number: f64) -> Option<i64> {
    let in_range = number.is_finite()
        && number.fract() == 0.0
        && number >= i64::MIN as f64
        && number <= i64::MAX as f64;
    in_range.then_some(number as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => match as_integral(*number) {
                Some(integral) => write!(f, "{integral}"),
                None => write!(f, "{number}"),
            },
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::File(file) => f.write_str(&file.name),
            Self::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(number) => match as_integral(*number) {
                Some(integral) => serializer.serialize_i64(integral),
                None => serializer.serialize_f64(*number),
            },
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::File(file) => file.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
