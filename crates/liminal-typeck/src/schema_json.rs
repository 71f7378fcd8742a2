//! JSON Schema emission for declared schemas.
//!
//! Emits a Draft 2020-12-compatible subset: an object schema with typed
//! properties, range/length bounds, regex patterns, field descriptions,
//! and a `required` list covering every declared field. Property order
//! follows declaration order (serde_json is built with `preserve_order`).

use serde_json::{json, Map, Value};

use crate::ty::{SchemaDef, SchemaField, Ty};

/// JSON Schema type name for a semantic type.
fn json_type_name(ty: &Ty) -> &'static str {
    match ty.resolved() {
        Ty::Int | Ty::Byte | Ty::Enum(_) => "integer",
        Ty::Real => "number",
        Ty::Bool => "boolean",
        Ty::Record(_) | Ty::Schema(_, _) => "object",
        // Strings, chars, bytes, and anything unresolved emit as strings.
        _ => "string",
    }
}

/// Emit the JSON Schema object for one field.
fn field_schema(field: &SchemaField) -> Value {
    let mut obj = Map::new();
    let type_name = json_type_name(&field.ty);
    obj.insert("type".into(), json!(type_name));

    let is_string = type_name == "string";
    if let Some(min) = field.min {
        let key = if is_string { "minLength" } else { "minimum" };
        obj.insert(key.into(), json!(min));
    }
    if let Some(max) = field.max {
        let key = if is_string { "maxLength" } else { "maximum" };
        obj.insert(key.into(), json!(max));
    }
    if let Some(pattern) = &field.pattern {
        obj.insert("pattern".into(), json!(pattern));
    }
    if let Some(description) = &field.description {
        obj.insert("description".into(), json!(description));
    }
    Value::Object(obj)
}

/// Emit the JSON Schema for a declared schema as a compact JSON string.
pub fn schema_to_json(schema: &SchemaDef) -> String {
    let mut properties = Map::new();
    for field in &schema.fields {
        properties.insert(field.name.clone(), field_schema(field));
    }
    let required: Vec<Value> = schema
        .fields
        .iter()
        .map(|f| json!(f.name))
        .collect();

    let value = json!({
        "type": "object",
        "properties": properties,
        "required": required,
    });
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: Ty) -> SchemaField {
        SchemaField {
            name: name.into(),
            ty,
            description: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    #[test]
    fn basic_schema_shape() {
        let schema = SchemaDef {
            name: "Person".into(),
            fields: vec![field("Name", Ty::Str), field("Age", Ty::Int)],
        };
        let json = schema_to_json(&schema);
        assert_eq!(
            json,
            r#"{"type":"object","properties":{"Name":{"type":"string"},"Age":{"type":"integer"}},"required":["Name","Age"]}"#
        );
    }

    #[test]
    fn constrained_and_described_fields() {
        let mut age = field("Age", Ty::Int);
        age.min = Some(0);
        age.max = Some(130);
        age.description = Some("age in years".into());
        let mut name = field("Name", Ty::Str);
        name.min = Some(1);
        name.max = Some(64);
        let mut code = field("Code", Ty::Str);
        code.pattern = Some("^[A-Z]+$".into());

        let schema = SchemaDef {
            name: "Person".into(),
            fields: vec![name, age, code],
        };
        let json = schema_to_json(&schema);
        assert!(json.contains(r#""Name":{"type":"string","minLength":1,"maxLength":64}"#));
        assert!(json.contains(
            r#""Age":{"type":"integer","minimum":0,"maximum":130,"description":"age in years"}"#
        ));
        assert!(json.contains(r#""Code":{"type":"string","pattern":"^[A-Z]+$"}"#));
        assert!(json.ends_with(r#""required":["Name","Age","Code"]}"#));
    }

    #[test]
    fn bool_and_real_fields() {
        let schema = SchemaDef {
            name: "Flags".into(),
            fields: vec![field("Active", Ty::Bool), field("Score", Ty::Real)],
        };
        let json = schema_to_json(&schema);
        assert!(json.contains(r#""Active":{"type":"boolean"}"#));
        assert!(json.contains(r#""Score":{"type":"number"}"#));
    }
}
