//! Refinement layer: cross-field rules on top of another schema.
//!
//! Rules run whenever the inner schema produced a value for every field, so
//! they can compare fields with each other (`password == repeatPassword`).
//! That includes outputs whose fields failed value checks such as a minimum:
//! rule messages are then merged with the field messages. A missing or
//! mistyped field stops the rules. A failing rule attaches its message to the
//! field it declares, or to the form-level pseudo-field when it declares none.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use veld_core::{FieldErrors, FieldName, RawFormSnapshot};

use crate::engine::{FormSchema, Parsed};
use crate::error::ValidationError;
use crate::introspect::{Introspectable, SchemaLayer};

type RuleFn<T> = Arc<dyn Fn(&T) -> BoxFuture<'static, anyhow::Result<bool>> + Send + Sync>;

struct Rule<T> {
    check: RuleFn<T>,
    message: String,
    path: Option<FieldName>,
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
            message: self.message.clone(),
            path: self.path.clone(),
        }
    }
}

/// A schema with cross-field rules layered on top of `S`.
pub struct Refined<S: FormSchema> {
    inner: S,
    rules: Vec<Rule<S::Output>>,
}

impl<S: FormSchema> Refined<S> {
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Add a form-level rule.
    #[must_use]
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&S::Output) -> bool + Send + Sync + 'static,
    {
        self.push_sync(None, predicate, message.into())
    }

    /// Add a rule whose failure is reported on `path`.
    #[must_use]
    pub fn refine_at<F>(
        self,
        path: impl Into<FieldName>,
        predicate: F,
        message: impl Into<String>,
    ) -> Self
    where
        F: Fn(&S::Output) -> bool + Send + Sync + 'static,
    {
        self.push_sync(Some(path.into()), predicate, message.into())
    }

    /// Add an asynchronous rule. The check receives the output by reference
    /// and must copy whatever its future needs.
    ///
    /// An `Err` from the check aborts validation as a thrown failure.
    #[must_use]
    pub fn refine_async<F, Fut>(
        mut self,
        path: Option<FieldName>,
        check: F,
        message: impl Into<String>,
    ) -> Self
    where
        F: Fn(&S::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        let rule: RuleFn<S::Output> = Arc::new(move |output: &S::Output| check(output).boxed());
        self.rules.push(Rule {
            check: rule,
            message: message.into(),
            path,
        });
        self
    }

    fn push_sync<F>(self, path: Option<FieldName>, predicate: F, message: String) -> Self
    where
        F: Fn(&S::Output) -> bool + Send + Sync + 'static,
    {
        self.refine_async(
            path,
            move |output| std::future::ready(Ok::<_, anyhow::Error>(predicate(output))),
            message,
        )
    }

    async fn run(&self, snapshot: &RawFormSnapshot) -> Parsed<S::Output> {
        let (output, mut errors) = match self.inner.parse_partial(snapshot).await {
            Parsed::Valid(output) => (output, FieldErrors::new()),
            Parsed::Dirty { output, errors } => (output, errors),
            Parsed::Failed(error) => return Parsed::Failed(error),
        };

        for rule in &self.rules {
            match (rule.check)(&output).await {
                Ok(true) => {}
                Ok(false) => match &rule.path {
                    Some(path) => errors.push(path.clone(), rule.message.clone()),
                    None => errors.push_form(rule.message.clone()),
                },
                Err(error) => return Parsed::Failed(ValidationError::Thrown(error)),
            }
        }

        if errors.is_empty() {
            Parsed::Valid(output)
        } else {
            Parsed::Dirty { output, errors }
        }
    }
}

impl<S: FormSchema + Clone> Clone for Refined<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<S: FormSchema + fmt::Debug> fmt::Debug for Refined<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refined")
            .field("inner", &self.inner)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<S: FormSchema> Introspectable for Refined<S> {
    fn layer(&self) -> SchemaLayer<'_> {
        SchemaLayer::Refinement(&self.inner)
    }
}

impl<S: FormSchema> FormSchema for Refined<S> {
    type Output = S::Output;

    fn parse(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Result<Self::Output, ValidationError>> + Send {
        self.run(snapshot).map(Parsed::into_result)
    }

    fn parse_partial(
        &self,
        snapshot: &RawFormSnapshot,
    ) -> impl Future<Output = Parsed<Self::Output>> + Send {
        self.run(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSchema;
    use crate::introspect::{FieldShape, is_required};
    use crate::object::ObjectSchema;
    use pretty_assertions::assert_eq;
    use veld_core::{FORM_ERRORS_KEY, ValidatedOutput};

    fn passwords() -> Refined<ObjectSchema> {
        ObjectSchema::new()
            .field("password", FieldSchema::string("Введите валидный пароль"))
            .field("repeatPassword", FieldSchema::string("Введите валидный пароль"))
            .field("hint", FieldSchema::string("x").optional())
            .refine_at(
                "repeatPassword",
                |output: &ValidatedOutput| output.get("password") == output.get("repeatPassword"),
                "Пароли должны совпадать",
            )
    }

    #[tokio::test]
    async fn mismatch_is_reported_on_declared_path() {
        let snapshot = RawFormSnapshot::from_entries([("password", "a"), ("repeatPassword", "b")]);
        let Err(ValidationError::Rejected(errors)) = passwords().parse(&snapshot).await else {
            panic!("expected rejection");
        };
        assert_eq!(errors.messages("repeatPassword"), ["Пароли должны совпадать"]);
        assert!(!errors.has_error(FORM_ERRORS_KEY));
        assert!(!errors.has_error("password"));
    }

    #[tokio::test]
    async fn pathless_rule_reports_on_form_key() {
        let schema = passwords().refine(|output| output.contains("hint"), "Нужна подсказка");
        let snapshot = RawFormSnapshot::from_entries([("password", "a"), ("repeatPassword", "a")]);
        let Err(ValidationError::Rejected(errors)) = schema.parse(&snapshot).await else {
            panic!("expected rejection");
        };
        assert_eq!(errors.form_messages(), ["Нужна подсказка"]);
        assert_eq!(errors.field_count(), 1);
    }

    #[tokio::test]
    async fn rules_run_alongside_failed_field_checks() {
        let schema = ObjectSchema::new()
            .field("password", FieldSchema::string("Введите валидный пароль"))
            .field(
                "repeatPassword",
                FieldSchema::string("Введите валидный пароль").min_len(3, "Слишком короткий"),
            )
            .refine_at(
                "repeatPassword",
                |output: &ValidatedOutput| output.get("password") == output.get("repeatPassword"),
                "Пароли должны совпадать",
            );
        let snapshot = RawFormSnapshot::from_entries([("password", "abc"), ("repeatPassword", "b")]);
        let Err(ValidationError::Rejected(errors)) = schema.parse(&snapshot).await else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors.messages("repeatPassword"),
            ["Слишком короткий", "Пароли должны совпадать"]
        );
    }

    #[tokio::test]
    async fn nested_layers_keep_collecting_rule_messages() {
        let schema = passwords().refine(|output| output.contains("hint"), "Нужна подсказка");
        let nested = Refined::new(schema).refine(|_| false, "Ещё одно правило");
        let snapshot = RawFormSnapshot::from_entries([("password", "a"), ("repeatPassword", "b")]);
        let Parsed::Dirty { errors, .. } = nested.parse_partial(&snapshot).await else {
            panic!("expected a dirty parse");
        };
        assert_eq!(errors.messages("repeatPassword"), ["Пароли должны совпадать"]);
        assert_eq!(errors.form_messages(), ["Нужна подсказка", "Ещё одно правило"]);
        assert_eq!(nested.inner().inner().field_names().len(), 3);
    }

    #[tokio::test]
    async fn rules_skip_when_a_field_is_missing() {
        let snapshot = RawFormSnapshot::from_entries([("password", "a")]);
        let Err(ValidationError::Rejected(errors)) = passwords().parse(&snapshot).await else {
            panic!("expected rejection");
        };
        assert_eq!(errors.messages("repeatPassword"), ["Введите валидный пароль"]);
    }

    #[tokio::test]
    async fn async_rule_error_is_thrown() {
        let schema = passwords().refine_async(
            None,
            |_| async { Err(anyhow::anyhow!("lookup unavailable")) },
            "never shown",
        );
        let snapshot = RawFormSnapshot::from_entries([("password", "a"), ("repeatPassword", "a")]);
        let result = schema.parse(&snapshot).await;
        assert!(matches!(result, Err(ValidationError::Thrown(_))));
    }

    #[test]
    fn introspection_sees_through_one_layer() {
        let schema = passwords();
        assert!(is_required(&schema, "password"));
        assert!(!is_required(&schema, "hint"));

        let nested = Refined::new(passwords());
        assert!(!is_required(&nested, "password"));
    }
}
