//! Plain-object projection per HYDRATION.md §Projection.
//!
//! The inverse of hydration, as an explicit field-by-field walk. It is
//! deliberately type-erasing: enum constants collapse to their comparison
//! values and date/times to RFC 3339 text. Round trips are format-stable
//! only for ints, strings, bools, and non-date nested schemas.

use serde_json::{Map, Value};

use super::{FieldValue, Instance};

/// Serializes every field of an instance to a plain value.
pub fn to_map(instance: &Instance) -> Map<String, Value> {
    instance
        .fields()
        .map(|(name, value)| (name.to_string(), project_value(value)))
        .collect()
}

fn project_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Int(i) => Value::from(*i),
        FieldValue::Str(s) => Value::String(s.clone()),
        // Non-finite floats have no JSON form; they collapse to null.
        FieldValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
        FieldValue::Collection(items) => {
            Value::Array(items.iter().map(project_value).collect())
        }
        FieldValue::Untyped(v) => v.clone(),
        FieldValue::Enum(e) => e.value.clone(),
        FieldValue::Nested(inst) => Value::Object(to_map(inst)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EnumValue;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_scalars_project_to_plain_values() {
        let mut inst = Instance::new("sample", 4);
        inst.push("id".into(), FieldValue::Int(5));
        inst.push("name".into(), FieldValue::Str("anon".into()));
        inst.push("active".into(), FieldValue::Bool(true));
        inst.push("score".into(), FieldValue::Float(1.5));

        let map = to_map(&inst);
        assert_eq!(map["id"], json!(5));
        assert_eq!(map["name"], json!("anon"));
        assert_eq!(map["active"], json!(true));
        assert_eq!(map["score"], json!(1.5));
    }

    #[test]
    fn test_datetime_projects_to_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let mut inst = Instance::new("sample", 1);
        inst.push("at".into(), FieldValue::DateTime(dt));

        let map = to_map(&inst);
        assert_eq!(map["at"], json!("2024-03-01T12:30:00+00:00"));
    }

    #[test]
    fn test_enum_projects_to_comparison_value() {
        let mut inst = Instance::new("sample", 1);
        inst.push(
            "color".into(),
            FieldValue::Enum(EnumValue {
                enum_name: "color".into(),
                constant: "RED".into(),
                value: json!(1),
            }),
        );

        let map = to_map(&inst);
        assert_eq!(map["color"], json!(1));
    }

    #[test]
    fn test_nested_and_collections_recurse() {
        let mut address = Instance::new("address", 1);
        address.push("city".into(), FieldValue::Str("NYC".into()));

        let mut inst = Instance::new("user", 2);
        inst.push("address".into(), FieldValue::Nested(Box::new(address)));
        inst.push(
            "tags".into(),
            FieldValue::Collection(vec![
                FieldValue::Untyped(json!("a")),
                FieldValue::Untyped(json!("b")),
            ]),
        );

        let map = to_map(&inst);
        assert_eq!(map["address"], json!({ "city": "NYC" }));
        assert_eq!(map["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_non_finite_float_projects_to_null() {
        let mut inst = Instance::new("sample", 1);
        inst.push("score".into(), FieldValue::Float(f64::NAN));
        assert_eq!(to_map(&inst)["score"], Value::Null);
    }
}
