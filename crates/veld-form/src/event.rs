//! Form sources and the events that drive a controller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use veld_core::{FieldName, FileHandle, RawFormSnapshot, RawValue};

/// Anything that can serialize its controls into a snapshot.
pub trait FormSource: Send + Sync {
    /// Capture the current value of every submitted control.
    fn form_data(&self) -> RawFormSnapshot;
}

/// In-memory form controls, for headless callers and tests.
///
/// Follows native serialization: a checked checkbox submits `"on"`, an
/// unchecked one submits nothing.
#[derive(Debug, Default)]
pub struct MemoryForm {
    controls: Mutex<BTreeMap<FieldName, RawValue>>,
}

impl MemoryForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with text controls.
    pub fn with_text<'a>(controls: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let form = Self::new();
        for (name, value) in controls {
            form.set(name, value);
        }
        form
    }

    fn with_controls<R>(&self, f: impl FnOnce(&mut BTreeMap<FieldName, RawValue>) -> R) -> R {
        let mut controls = self.controls.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut controls)
    }

    /// Set a text control.
    pub fn set(&self, name: &str, value: &str) {
        self.with_controls(|controls| controls.insert(name.into(), RawValue::from(value)));
    }

    /// Select a file in a file control.
    pub fn attach(&self, name: &str, file: FileHandle) {
        self.with_controls(|controls| controls.insert(name.into(), RawValue::File(file)));
    }

    pub fn check(&self, name: &str) {
        self.set(name, "on");
    }

    pub fn uncheck(&self, name: &str) {
        self.remove(name);
    }

    /// Remove a control from serialization entirely.
    pub fn remove(&self, name: &str) {
        self.with_controls(|controls| controls.remove(name));
    }
}

impl FormSource for MemoryForm {
    fn form_data(&self) -> RawFormSnapshot {
        self.with_controls(|controls| {
            controls
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
    }
}

struct SubmitState {
    form: Arc<dyn FormSource>,
    default_prevented: AtomicBool,
}

/// A submit event on a form. Clones share the same event.
#[derive(Clone)]
pub struct SubmitEvent {
    state: Arc<SubmitState>,
}

impl SubmitEvent {
    #[must_use]
    pub fn new(form: Arc<dyn FormSource>) -> Self {
        Self {
            state: Arc::new(SubmitState {
                form,
                default_prevented: AtomicBool::new(false),
            }),
        }
    }

    /// Suppress the native submission of the form.
    pub fn prevent_default(&self) {
        self.state.default_prevented.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.state.default_prevented.load(Ordering::Relaxed)
    }

    /// Snapshot of the submitting form at the time of the call.
    #[must_use]
    pub fn form_data(&self) -> RawFormSnapshot {
        self.state.form.form_data()
    }
}

impl fmt::Debug for SubmitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitEvent")
            .field("default_prevented", &self.default_prevented())
            .finish_non_exhaustive()
    }
}

/// A change on one field. `form` is the field's owning form, if any.
#[derive(Clone)]
pub struct ChangeEvent {
    field: FieldName,
    form: Option<Arc<dyn FormSource>>,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(field: impl Into<FieldName>, form: Arc<dyn FormSource>) -> Self {
        Self {
            field: field.into(),
            form: Some(form),
        }
    }

    /// A change on a control that does not belong to any form.
    #[must_use]
    pub fn detached(field: impl Into<FieldName>) -> Self {
        Self {
            field: field.into(),
            form: None,
        }
    }

    #[must_use]
    pub const fn field(&self) -> &FieldName {
        &self.field
    }

    #[must_use]
    pub fn form(&self) -> Option<&dyn FormSource> {
        self.form.as_deref()
    }
}

impl fmt::Debug for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("field", &self.field)
            .field("has_form", &self.form.is_some())
            .finish()
    }
}
