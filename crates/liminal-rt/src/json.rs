//! Flat-JSON validation of oracle output against a schema.
//!
//! When an `ask` carries a schema, the returned text must parse as a single
//! flat JSON object: quoted string keys with string, boolean, or number
//! values. Arrays, nested objects, and nulls are rejected. Each schema field
//! must be present with the right kind; an integer field is a number that
//! fits an integer exactly (no `.` fraction).

use serde_json::Value;

/// The validation kind of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Real,
    Bool,
    Str,
    /// Fields of other types are presence-checked only.
    Any,
}

/// Validate oracle text against a flat field list.
///
/// On success the caller keeps the raw text as the `Ok` payload; on failure
/// the returned message names the offending field or shape.
pub fn validate_flat_object(text: &str, fields: &[(String, FieldKind)]) -> Result<(), String> {
    let parsed: Value = serde_json::from_str(text).map_err(|_| "expected object".to_string())?;
    let Value::Object(map) = parsed else {
        return Err("expected object".to_string());
    };

    // Flat shape: every member must be a scalar.
    for (key, value) in &map {
        match value {
            Value::String(_) | Value::Bool(_) | Value::Number(_) => {}
            _ => return Err(format!("field {key} not flat")),
        }
    }

    for (name, kind) in fields {
        let Some(value) = map.get(name) else {
            return Err(format!("missing field {name}"));
        };
        match kind {
            FieldKind::Str => {
                if !value.is_string() {
                    return Err(format!("field {name} not string"));
                }
            }
            FieldKind::Int => {
                if !value.is_number() || value.as_i64().is_none() {
                    return Err(format!("field {name} not integer"));
                }
            }
            FieldKind::Real => {
                if !value.is_number() {
                    return Err(format!("field {name} not number"));
                }
            }
            FieldKind::Bool => {
                if !value.is_boolean() {
                    return Err(format!("field {name} not bool"));
                }
            }
            FieldKind::Any => {}
        }
    }
    Ok(())
}
