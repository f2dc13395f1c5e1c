//! `serde_json::Value` as a ready-made dynamic entity.
//!
//! Objects expose their keys and arrays their indices, so dotted paths such as
//! `"customer.addresses.0.city"` work on untyped rows.

use serde_json::Value as Json;

use super::types::{Entity, Field, Searchable, Value};

impl Searchable for Json {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let child = match self {
            Json::Object(map) => map.get(name)?,
            Json::Array(items) => items.get(name.parse::<usize>().ok()?)?,
            _ => return None,
        };

        Some(match child {
            Json::Null => Field::Value(Value::Null),
            Json::Bool(b) => Field::Value(Value::Bool(*b)),
            Json::Number(n) => Field::Value(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Json::String(s) => Field::Value(Value::Text(s.clone())),
            Json::Array(_) | Json::Object(_) => Field::Nested(child),
        })
    }
}

impl Entity for Json {
    type Raw = Json;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_fields() {
        let row = json!({ "name": "Ana", "age": 31, "score": 4.5, "active": true, "note": null });
        assert!(matches!(row.field("name"), Some(Field::Value(Value::Text(s))) if s == "Ana"));
        assert!(matches!(row.field("age"), Some(Field::Value(Value::Int(31)))));
        assert!(matches!(row.field("score"), Some(Field::Value(Value::Float(f))) if f == 4.5));
        assert!(matches!(row.field("active"), Some(Field::Value(Value::Bool(true)))));
        assert!(matches!(row.field("note"), Some(Field::Value(Value::Null))));
        assert!(row.field("missing").is_none());
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let row = json!({ "tags": ["red", "blue"], "address": { "city": "Porto" } });
        let Some(Field::Nested(tags)) = row.field("tags") else {
            panic!("tags should be nested");
        };
        assert!(matches!(tags.field("1"), Some(Field::Value(Value::Text(s))) if s == "blue"));
        assert!(tags.field("x").is_none());
        assert!(matches!(row.field("address"), Some(Field::Nested(_))));
    }

    #[test]
    fn test_scalars_have_no_fields() {
        assert!(json!("text").field("len").is_none());
    }
}
