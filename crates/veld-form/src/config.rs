//! Controller configuration supplied by the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use veld_config::FormOptions;
use veld_core::{FieldName, Value};
use veld_schema::FormSchema;

use crate::controller::FormController;
use crate::event::SubmitEvent;
use crate::failure::FormFailure;

pub(crate) type SubmitFn<T> =
    Box<dyn Fn(T, SubmitEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;
pub(crate) type ErrorFn = Box<dyn Fn(&FormFailure, &SubmitEvent) + Send + Sync>;

/// Initial values shown by registered fields. Not used for validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultState {
    values: BTreeMap<FieldName, Value>,
}

impl DefaultState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl<N: Into<FieldName>> FromIterator<(N, Value)> for DefaultState {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Everything a controller is built from.
///
/// ```no_run
/// use veld_form::{FormConfig, DefaultState};
/// use veld_schema::{FieldSchema, ObjectSchema};
///
/// let schema = ObjectSchema::new()
///     .field("login", FieldSchema::string("Введите валидный логин"))
///     .field("rememberMe", FieldSchema::checkbox());
///
/// let form = FormConfig::new(schema)
///     .on_submit(|output, _event| async move {
///         println!("{output:?}");
///         Ok(())
///     })
///     .on_error(|failure, _event| eprintln!("{failure}"))
///     .default_state(DefaultState::new().with("rememberMe", true))
///     .build();
/// ```
pub struct FormConfig<S: FormSchema> {
    pub(crate) schema: S,
    pub(crate) on_submit: Option<SubmitFn<S::Output>>,
    pub(crate) on_error: Option<ErrorFn>,
    pub(crate) default_state: DefaultState,
    pub(crate) options: FormOptions,
}

impl<S: FormSchema> FormConfig<S> {
    #[must_use]
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            on_submit: None,
            on_error: None,
            default_state: DefaultState::default(),
            options: FormOptions::default(),
        }
    }

    /// Called with the validated output of every successful validation.
    #[must_use]
    pub fn on_submit<F, Fut>(mut self, on_submit: F) -> Self
    where
        F: Fn(S::Output, SubmitEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_submit = Some(Box::new(move |output, event| {
            on_submit(output, event).boxed()
        }));
        self
    }

    /// Called with every failure of a submit cycle.
    #[must_use]
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&FormFailure, &SubmitEvent) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    #[must_use]
    pub fn default_state(mut self, default_state: DefaultState) -> Self {
        self.default_state = default_state;
        self
    }

    #[must_use]
    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn build(self) -> FormController<S> {
        FormController::new(self)
    }
}

impl<S: FormSchema + fmt::Debug> fmt::Debug for FormConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("schema", &self.schema)
            .field("has_on_submit", &self.on_submit.is_some())
            .field("has_on_error", &self.on_error.is_some())
            .field("default_state", &self.default_state)
            .field("options", &self.options)
            .finish()
    }
}
