//! # veld-core
//!
//! Core data model shared by every Veld crate.
//!
//! This crate provides:
//! - `FieldName`: the identifier of one field within a form schema
//! - `RawValue` / `FileHandle`: raw data as produced by form serialization
//! - `RawFormSnapshot`: an immutable capture of every control in a form
//! - `Value` / `ValidatedOutput`: coerced, typed values after validation
//! - `FieldErrors`: the per-field error map owned by the form controller
//! - `CoreError`: cross-cutting errors

pub mod errors;
pub mod field;
pub mod field_errors;
pub mod snapshot;
pub mod value;

pub use errors::CoreError;
pub use field::FieldName;
pub use field_errors::{FORM_ERRORS_KEY, FieldErrors};
pub use snapshot::{RawFormSnapshot, ValidatedOutput};
pub use value::{FileHandle, RawValue, Value};
