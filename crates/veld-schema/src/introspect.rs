//! Structural queries over a schema's static shape.
//!
//! A schema exposes itself as one [`SchemaLayer`]: a direct field shape, a
//! refinement wrapped around another schema, or something opaque. The
//! introspector walks at most one refinement layer and never runs coercion or
//! validation rules, so its answers are stable for the lifetime of a schema.

/// Declared fields of a shape-map schema.
pub trait FieldShape {
    /// Declared optionality of `field`, or `None` if the field is unknown.
    fn is_optional(&self, field: &str) -> Option<bool>;

    /// Declared field names in declaration order.
    fn field_names(&self) -> Vec<&str>;
}

/// What a schema looks like from the outside.
pub enum SchemaLayer<'a> {
    /// A direct field-shape map.
    Shape(&'a dyn FieldShape),
    /// Cross-field rules layered over an inner schema.
    Refinement(&'a dyn Introspectable),
    /// Neither of the above.
    Opaque,
}

/// Capability to expose a schema's structure.
pub trait Introspectable {
    fn layer(&self) -> SchemaLayer<'_>;
}

/// Field shape reachable from `schema` by unwrapping at most one refinement.
///
/// Returns `None` for opaque schemas and for refinements stacked more than
/// one level deep.
#[must_use]
pub fn reachable_shape(schema: &dyn Introspectable) -> Option<&dyn FieldShape> {
    match schema.layer() {
        SchemaLayer::Shape(shape) => Some(shape),
        SchemaLayer::Refinement(inner) => match inner.layer() {
            SchemaLayer::Shape(shape) => Some(shape),
            SchemaLayer::Refinement(_) | SchemaLayer::Opaque => None,
        },
        SchemaLayer::Opaque => None,
    }
}

/// Whether `field` must be filled in.
///
/// `true` iff the field is declared on the reachable shape and its declared
/// schema is not optional. Undeclared fields, opaque schemas and deeper
/// refinement stacks answer `false`.
#[must_use]
pub fn is_required(schema: &dyn Introspectable, field: &str) -> bool {
    reachable_shape(schema)
        .and_then(|shape| shape.is_optional(field))
        .is_some_and(|optional| !optional)
}

/// Required fields of `schema` in declaration order.
#[must_use]
pub fn required_fields(schema: &dyn Introspectable) -> Vec<&str> {
    reachable_shape(schema).map_or_else(Vec::new, |shape| {
        shape
            .field_names()
            .into_iter()
            .filter(|name| shape.is_optional(name) == Some(false))
            .collect()
    })
}
