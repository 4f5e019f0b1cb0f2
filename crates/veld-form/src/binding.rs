//! Per-field registration.

use std::fmt;
use std::sync::Arc;

use veld_core::FieldName;
use veld_schema::FormSchema;

use crate::controller::FormController;
use crate::event::{ChangeEvent, FormSource};

/// Everything an input needs to bind to a controller.
///
/// `default_value` and `default_checked` come from the controller's default
/// state; `required` comes from schema introspection.
pub struct FieldBinding<'a, S: FormSchema> {
    controller: &'a FormController<S>,
    pub name: FieldName,
    pub required: bool,
    pub default_value: Option<String>,
    pub default_checked: bool,
}

impl<'a, S: FormSchema> FieldBinding<'a, S> {
    pub(crate) fn new(controller: &'a FormController<S>, name: &str) -> Self {
        let default = controller
            .default_state()
            .get(name)
            .filter(|value| value.is_truthy());
        Self {
            controller,
            name: FieldName::from(name),
            required: controller.is_required(name),
            default_value: default.map(ToString::to_string),
            default_checked: default.is_some(),
        }
    }

    /// Change event for this field on `form`.
    #[must_use]
    pub fn change_event(&self, form: Arc<dyn FormSource>) -> ChangeEvent {
        ChangeEvent::new(self.name.clone(), form)
    }

    /// The field's change handler: revalidate `form` if it has errors.
    pub async fn on_change(&self, form: Arc<dyn FormSource>) {
        self.controller.on_change(&self.change_event(form)).await;
    }
}

impl<S: FormSchema> fmt::Debug for FieldBinding<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("default_checked", &self.default_checked)
            .finish_non_exhaustive()
    }
}
