//! Validation and introspection of a complete registration form schema.

use pretty_assertions::assert_eq;
use veld_core::{FORM_ERRORS_KEY, FileHandle, RawFormSnapshot, RawValue, Value};
use veld_schema::{
    FieldSchema, FieldShape, FormSchema, ObjectSchema, Refined, ValidationError, is_required,
    validate,
};

fn parse_skills(value: Value) -> anyhow::Result<Value> {
    let raw = value.as_text().unwrap_or_default();
    let skills: Vec<String> = serde_json::from_str(raw)?;
    Ok(Value::from(skills))
}

fn shape() -> ObjectSchema {
    ObjectSchema::new()
        .field("login", FieldSchema::string("Введите валидный логин"))
        .field("password", FieldSchema::string("Введите валидный пароль"))
        .field("repeatPassword", FieldSchema::string("Введите валидный пароль"))
        .field(
            "age",
            FieldSchema::number("Обязательное поле")
                .min(18.0, "Минимум 18 лет")
                .max(60.0, "Максимум 60 лет"),
        )
        .field("rememberMe", FieldSchema::checkbox())
        .field(
            "skills",
            FieldSchema::string("Минимум 2 скилла")
                .default("[]")
                .transform(parse_skills)
                .min_len(2, "Минимум 2 скилла"),
        )
        .field("date", FieldSchema::date("Некорректная дата").optional())
        .field(
            "file",
            FieldSchema::file("Фото обязательное")
                .check(
                    |value| value.as_file().is_some_and(|file| !file.is_empty()),
                    "Фото обязательное",
                )
                .check(
                    |value| {
                        value
                            .as_file()
                            .is_some_and(|file| file.content_type.ends_with("png"))
                    },
                    "Фото должно быть в формате png",
                ),
        )
}

fn registration() -> Refined<ObjectSchema> {
    shape().refine_at(
        "repeatPassword",
        |output| output.get("password") == output.get("repeatPassword"),
        "Пароли должны совпадать",
    )
}

fn valid_entries() -> Vec<(&'static str, RawValue)> {
    vec![
        ("login", "neo".into()),
        ("password", "secret".into()),
        ("repeatPassword", "secret".into()),
        ("age", "42".into()),
        ("rememberMe", "on".into()),
        ("skills", r#"["css","js"]"#.into()),
        ("date", "1999-12-31".into()),
        (
            "file",
            FileHandle::new("avatar.png", "image/png", vec![0x89, 0x50]).into(),
        ),
    ]
}

fn snapshot_with(overrides: &[(&'static str, Option<&str>)]) -> RawFormSnapshot {
    let mut entries = valid_entries();
    for (name, value) in overrides {
        entries.retain(|(existing, _)| existing != name);
        if let Some(value) = value {
            entries.push((*name, RawValue::from(*value)));
        }
    }
    RawFormSnapshot::from_entries(entries)
}

async fn rejection(snapshot: &RawFormSnapshot) -> veld_core::FieldErrors {
    match validate(&registration(), snapshot).await {
        Err(ValidationError::Rejected(errors)) => errors,
        Err(ValidationError::Thrown(error)) => panic!("unexpected thrown failure: {error:#}"),
        Ok(output) => panic!("unexpected success: {output:?}"),
    }
}

#[test]
fn required_matches_declared_optionality_directly_and_wrapped() {
    let shape = shape();
    let wrapped = registration();
    for name in shape.field_names() {
        let declared = !shape.is_optional(name).unwrap();
        assert_eq!(is_required(&shape, name), declared, "direct: {name}");
        assert_eq!(is_required(&wrapped, name), declared, "wrapped: {name}");
    }
    assert!(is_required(&wrapped, "age"));
    assert!(!is_required(&wrapped, "date"));
    assert!(!is_required(&wrapped, "rememberMe"));
    assert!(!is_required(&wrapped, "skills"));
}

#[tokio::test]
async fn valid_snapshot_produces_typed_output() {
    let output = validate(&registration(), &snapshot_with(&[]))
        .await
        .expect("valid snapshot");

    assert_eq!(output.get("age"), Some(&Value::Number(42.0)));
    assert_eq!(output.get("rememberMe"), Some(&Value::Bool(true)));
    assert_eq!(output.get("skills"), Some(&Value::from(vec!["css", "js"])));
    assert_eq!(
        output.get("date"),
        Some(&Value::from("1999-12-31T00:00:00.000Z"))
    );
    assert_eq!(output.get("file").and_then(Value::as_file).map(|f| f.size), Some(2));
}

#[tokio::test]
async fn validating_twice_is_idempotent() {
    let snapshot = snapshot_with(&[]);
    let first = validate(&registration(), &snapshot).await.unwrap();
    let second = validate(&registration(), &snapshot).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_required_string_fails_with_message() {
    let errors = rejection(&snapshot_with(&[("login", Some(""))])).await;
    assert_eq!(errors.messages("login"), ["Введите валидный логин"]);
    assert_eq!(errors.field_count(), 1);
}

#[tokio::test]
async fn underage_is_rejected_on_age_only() {
    let errors = rejection(&snapshot_with(&[("age", Some("17"))])).await;
    assert_eq!(errors.messages("age"), ["Минимум 18 лет"]);
    assert_eq!(errors.field_count(), 1);
}

#[tokio::test]
async fn password_mismatch_lands_on_repeat_password() {
    let errors = rejection(&snapshot_with(&[
        ("password", Some("a")),
        ("repeatPassword", Some("b")),
    ]))
    .await;
    assert_eq!(errors.messages("repeatPassword"), ["Пароли должны совпадать"]);
    assert!(!errors.has_error(FORM_ERRORS_KEY));
    assert!(!errors.has_error("password"));
}

#[tokio::test]
async fn unchecked_checkbox_is_false() {
    let output = validate(&registration(), &snapshot_with(&[("rememberMe", None)]))
        .await
        .unwrap();
    assert_eq!(output.get("rememberMe"), Some(&Value::Bool(false)));
}

#[tokio::test]
async fn missing_skills_fall_back_to_default_and_fail() {
    let errors = rejection(&snapshot_with(&[("skills", None)])).await;
    assert_eq!(errors.messages("skills"), ["Минимум 2 скилла"]);
}

#[tokio::test]
async fn empty_file_reports_every_file_message() {
    let mut entries = valid_entries();
    entries.retain(|(name, _)| *name != "file");
    entries.push(("file", FileHandle::empty().into()));
    let errors = rejection(&RawFormSnapshot::from_entries(entries)).await;
    assert_eq!(
        errors.label("file", ". ").as_deref(),
        Some("Фото обязательное. Фото должно быть в формате png")
    );
}

#[tokio::test]
async fn optional_date_may_be_left_out() {
    let output = validate(&registration(), &snapshot_with(&[("date", Some(""))]))
        .await
        .unwrap();
    assert!(!output.contains("date"));
}

#[tokio::test]
async fn malformed_skills_payload_is_thrown() {
    let result = validate(&registration(), &snapshot_with(&[("skills", Some("css,js"))])).await;
    assert!(matches!(result, Err(ValidationError::Thrown(_))));
}

#[tokio::test]
async fn underage_and_mismatch_are_reported_together() {
    let errors = rejection(&snapshot_with(&[
        ("age", Some("17")),
        ("password", Some("a")),
        ("repeatPassword", Some("b")),
    ]))
    .await;
    assert_eq!(errors.messages("age"), ["Минимум 18 лет"]);
    assert_eq!(errors.messages("repeatPassword"), ["Пароли должны совпадать"]);
    assert_eq!(errors.field_count(), 2);
}

#[tokio::test]
async fn refinement_skipped_when_a_field_has_no_value() {
    let errors = rejection(&snapshot_with(&[
        ("age", Some("abc")),
        ("password", Some("a")),
        ("repeatPassword", Some("b")),
    ]))
    .await;
    assert_eq!(errors.messages("age"), ["Обязательное поле"]);
    assert!(!errors.has_error("repeatPassword"));
}

#[tokio::test]
async fn parse_and_validate_agree() {
    let schema = registration();
    let snapshot = snapshot_with(&[]);
    let direct = schema.parse(&snapshot).await.unwrap();
    let engine = validate(&schema, &snapshot).await.unwrap();
    assert_eq!(direct, engine);
}
