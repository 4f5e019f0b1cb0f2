//! # veld-schema
//!
//! Declarative form schemas for Veld.
//!
//! This crate provides:
//! - `Coercion`: rules turning raw form text and files into typed candidates
//! - `FieldSchema` / `ObjectSchema`: per-field rules and the field-shape map
//! - `Refined`: cross-field rules layered over a shape
//! - `Typed`: conversion of outputs into caller-defined serde types
//! - Introspection (`is_required`) over a schema's static shape
//! - `FormSchema` / `validate`: the validation engine contract
//! - JSON Schema export of a form's field shape
//!
//! ## Architecture
//!
//! Validation is a pipeline per field (coerce, absent handling, type check,
//! checks and transforms) followed by refinement rules over the whole output.
//! Refinement rules still run when fields failed only their value checks; a
//! missing or mistyped field stops them.
//! Introspection reads declared flags only and never runs that pipeline.

pub mod adapter;
pub mod engine;
pub mod error;
pub mod export;
pub mod field;
pub mod introspect;
pub mod object;
pub mod refine;
pub mod typed;

pub use adapter::{Coercion, INVALID_DATE};
pub use engine::{FormSchema, Parsed, validate};
pub use error::ValidationError;
pub use field::{FieldKind, FieldSchema};
pub use introspect::{FieldShape, Introspectable, SchemaLayer, is_required, required_fields};
pub use object::ObjectSchema;
pub use refine::Refined;
pub use typed::Typed;
