//! # veld-form
//!
//! Stateful form controller for Veld.
//!
//! A `FormController` binds a `FormSchema` to a form source and owns the only
//! mutable state of a form: the loading flag and the per-field error map.
//! View code reads that state (`is_loading`, `has_error`, `error_label`,
//! `field_status`, or the `watch` receivers) and forwards submit and change
//! events; it never writes the state directly.
//!
//! ## Lifecycle
//!
//! ```text
//! submit ─▶ snapshot ─▶ validate ─┬─ ok ───────▶ on_submit ─┬─ ok ──▶ clear errors
//!                                 │                         └─ err ─▶ on_error
//!                                 └─ rejected ─▶ replace errors ───▶ on_error
//!
//! change (only while errors exist) ─▶ snapshot ─▶ validate ─┬─ ok ───────▶ clear errors
//!                                                           └─ rejected ─▶ replace per policy
//! ```

pub mod binding;
pub mod config;
pub mod controller;
pub mod event;
pub mod failure;
pub mod status;

pub use binding::FieldBinding;
pub use config::{DefaultState, FormConfig};
pub use controller::{FormController, SubmitOutcome};
pub use event::{ChangeEvent, FormSource, MemoryForm, SubmitEvent};
pub use failure::FormFailure;
pub use status::FieldStatus;
pub use veld_config::{FormOptions, RevalidatePolicy};
