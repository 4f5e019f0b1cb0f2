//! The form controller: submit and change lifecycles.

use std::fmt;

use tokio::sync::watch;
use veld_config::{FormOptions, RevalidatePolicy};
use veld_core::{FieldErrors, RawFormSnapshot};
use veld_schema::{FormSchema, ValidationError, is_required, validate};

use crate::binding::FieldBinding;
use crate::config::{DefaultState, ErrorFn, FormConfig, SubmitFn};
use crate::event::{ChangeEvent, SubmitEvent};
use crate::failure::FormFailure;
use crate::status::FieldStatus;

/// How a submit cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation and the submit callback succeeded.
    Submitted,
    /// The schema rejected the form; errors were published.
    Rejected,
    /// Validation or the submit callback failed unexpectedly.
    Failed,
    /// Another submit was in flight and resubmits are guarded.
    Ignored,
}

/// Clears the loading flag when a submit cycle ends, including when the
/// submit future is dropped before completion.
struct LoadingGuard<'a>(&'a watch::Sender<bool>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

/// Owns the state of one form: the loading flag and the error map.
///
/// Both are published through `watch` channels, so renderers may subscribe
/// but only the controller writes them.
pub struct FormController<S: FormSchema> {
    schema: S,
    on_submit: Option<SubmitFn<S::Output>>,
    on_error: Option<ErrorFn>,
    default_state: DefaultState,
    options: FormOptions,
    loading: watch::Sender<bool>,
    errors: watch::Sender<FieldErrors>,
}

impl<S: FormSchema> FormController<S> {
    #[must_use]
    pub fn new(config: FormConfig<S>) -> Self {
        let (loading, _) = watch::channel(false);
        let (errors, _) = watch::channel(FieldErrors::new());
        Self {
            schema: config.schema,
            on_submit: config.on_submit,
            on_error: config.on_error,
            default_state: config.default_state,
            options: config.options,
            loading,
            errors,
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &S {
        &self.schema
    }

    #[must_use]
    pub const fn options(&self) -> &FormOptions {
        &self.options
    }

    #[must_use]
    pub const fn default_state(&self) -> &DefaultState {
        &self.default_state
    }

    /// Handle a submit event.
    ///
    /// Prevents native submission, validates a fresh snapshot and hands the
    /// output to the submit callback. Every failure goes to the error
    /// callback; only schema rejections also replace the error map. The
    /// loading flag is set for the duration of the cycle.
    pub async fn submit(&self, event: &SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        if !self.begin_submit() {
            tracing::debug!("submit ignored: another submit is in flight");
            return SubmitOutcome::Ignored;
        }
        let _loading = LoadingGuard(&self.loading);

        let snapshot = event.form_data();
        let failure = match self.run_submit(&snapshot, event).await {
            Ok(()) => return SubmitOutcome::Submitted,
            Err(failure) => failure,
        };

        let outcome = match &failure {
            FormFailure::Rejected(errors) => {
                tracing::debug!(
                    invalid_fields = errors.field_count(),
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "submit rejected"
                );
                self.errors.send_replace(errors.clone());
                SubmitOutcome::Rejected
            }
            FormFailure::Validation(error) | FormFailure::Submit(error) => {
                tracing::warn!(error = %format!("{error:#}"), "submit failed");
                SubmitOutcome::Failed
            }
        };

        if let Some(on_error) = &self.on_error {
            on_error(&failure, event);
        }
        outcome
    }

    fn begin_submit(&self) -> bool {
        if self.options.guard_resubmit {
            self.loading.send_if_modified(|loading| {
                if *loading {
                    false
                } else {
                    *loading = true;
                    true
                }
            })
        } else {
            self.loading.send_replace(true);
            true
        }
    }

    async fn run_submit(
        &self,
        snapshot: &RawFormSnapshot,
        event: &SubmitEvent,
    ) -> Result<(), FormFailure> {
        let output = validate(&self.schema, snapshot).await?;

        if let Some(on_submit) = &self.on_submit {
            on_submit(output, event.clone())
                .await
                .map_err(FormFailure::Submit)?;
        }

        self.clear_errors();
        Ok(())
    }

    /// Handle a change on a registered field.
    ///
    /// Does nothing while the form has no errors. Otherwise revalidates the
    /// whole form: success clears every error, a rejection replaces the map
    /// according to the configured [`RevalidatePolicy`]. Unexpected failures
    /// leave the map untouched.
    pub async fn on_change(&self, event: &ChangeEvent) {
        let has_errors = !self.errors.borrow().is_empty();
        if !has_errors {
            return;
        }
        let Some(form) = event.form() else {
            tracing::debug!(field = %event.field(), "change outside a form ignored");
            return;
        };
        let snapshot = form.form_data();

        match validate(&self.schema, &snapshot).await {
            Ok(_) => {
                tracing::debug!(field = %event.field(), "form became valid");
                self.clear_errors();
            }
            Err(ValidationError::Rejected(next)) => {
                let policy = self.options.revalidate;
                self.errors.send_if_modified(|current| {
                    let changed = match policy {
                        RevalidatePolicy::FieldCount => current.field_count() != next.field_count(),
                        RevalidatePolicy::Exact => *current != next,
                    };
                    if changed {
                        *current = next;
                    }
                    changed
                });
            }
            Err(ValidationError::Thrown(error)) => {
                tracing::debug!(
                    field = %event.field(),
                    error = %format!("{error:#}"),
                    "revalidation failed; keeping current errors"
                );
            }
        }
    }

    fn clear_errors(&self) {
        self.errors.send_if_modified(|errors| {
            if errors.is_empty() {
                false
            } else {
                *errors = FieldErrors::new();
                true
            }
        });
    }

    /// Binding metadata for one input.
    #[must_use]
    pub fn register(&self, name: &str) -> FieldBinding<'_, S> {
        FieldBinding::new(self, name)
    }

    /// `true` strictly between the start and the end of a submit cycle.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    #[must_use]
    pub fn has_error(&self, name: &str) -> bool {
        self.errors.borrow().has_error(name)
    }

    /// Messages of `name` joined by the configured separator.
    #[must_use]
    pub fn error_label(&self, name: &str) -> Option<String> {
        self.errors
            .borrow()
            .label(name, &self.options.error_separator)
    }

    /// Whether the schema declares `name` as required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        is_required(&self.schema, name)
    }

    /// Copy of the current error map.
    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        self.errors.borrow().clone()
    }

    /// Everything a field renderer needs to draw `name`.
    #[must_use]
    pub fn field_status(&self, name: &str) -> FieldStatus {
        FieldStatus {
            required: self.is_required(name),
            invalid: self.has_error(name),
            message: self.error_label(name),
        }
    }

    /// Receive every published error map.
    #[must_use]
    pub fn subscribe_errors(&self) -> watch::Receiver<FieldErrors> {
        self.errors.subscribe()
    }

    /// Receive every loading flag transition.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}

impl<S: FormSchema + fmt::Debug> fmt::Debug for FormController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("loading", &self.is_loading())
            .field("errors", &*self.errors.borrow())
            .finish_non_exhaustive()
    }
}
