//! Resolution of the flyby references stored on summary records.
//!
//! A reference may be a bare id, an embedded object or a one-element array wrapping either.
//! The shapes are tried in that order and the first one that yields something wins.

use serde_json::Value;

/// Result of resolving one reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedReference {
    /// Flyby id found directly
    Id(i32),
    /// Embedded object without an id but with the flyby's year; needs a lookup
    Year(f64),
    Unresolved,
}

/// Shapes a stored reference can take, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReferenceShape {
    Bare,
    Embedded,
    Wrapped,
}

impl ReferenceShape {
    const ORDER: [ReferenceShape; 3] = [Self::Bare, Self::Embedded, Self::Wrapped];

    fn resolve(self, value: &Value) -> Option<ResolvedReference> {
        match self {
            Self::Bare => bare_id(value).map(ResolvedReference::Id),
            Self::Embedded => embedded(value),
            Self::Wrapped => match value.as_array().map(Vec::as_slice) {
                Some([inner]) => Self::Bare.resolve(inner).or_else(|| Self::Embedded.resolve(inner)),
                _ => None,
            },
        }
    }
}

fn bare_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn embedded(value: &Value) -> Option<ResolvedReference> {
    let object = value.as_object()?;

    if let Some(id) = object.get("$id").or_else(|| object.get("id")).and_then(bare_id) {
        return Some(ResolvedReference::Id(id));
    }

    object
        .get("year")
        .and_then(Value::as_f64)
        .filter(|year| year.is_finite())
        .map(ResolvedReference::Year)
}

/// Resolve a stored reference to a flyby id, a year to look up, or nothing.
pub fn resolve_reference(value: Option<&Value>) -> ResolvedReference {
    let Some(value) = value else {
        return ResolvedReference::Unresolved;
    };

    ReferenceShape::ORDER
        .iter()
        .find_map(|shape| shape.resolve(value))
        .unwrap_or(ResolvedReference::Unresolved)
}
