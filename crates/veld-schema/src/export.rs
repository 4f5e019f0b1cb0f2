//! JSON Schema rendering of a form's field shape.
//!
//! External tooling (API docs, editor plugins, server-side checks of the
//! same payload) can describe a form without linking Veld. Only static
//! structure is exported: kinds and required-ness, not checks.

use serde_json::{Map, Value as Json, json};

use crate::field::FieldKind;
use crate::introspect::required_fields;
use crate::object::ObjectSchema;

fn kind_schema(kind: FieldKind) -> Json {
    match kind {
        FieldKind::Any => json!({}),
        FieldKind::Text => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Bool => json!({"type": "boolean"}),
        FieldKind::Date => json!({"type": "string", "format": "date-time"}),
        FieldKind::File => json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "content_type": {"type": "string"},
                "size": {"type": "integer", "minimum": 0}
            },
            "required": ["name", "content_type", "size"]
        }),
    }
}

/// Render `schema` as a JSON Schema (draft 2020-12) object document.
#[must_use]
pub fn to_json_schema(schema: &ObjectSchema) -> Json {
    let properties: Map<String, Json> = schema
        .fields()
        .map(|(name, field)| (name.to_string(), kind_schema(field.kind())))
        .collect();

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": properties,
        "required": required_fields(schema),
    })
}
