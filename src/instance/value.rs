//! Typed field values.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::Instance;

/// A resolved enum constant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// Name of the enum the constant belongs to
    pub enum_name: String,
    /// Constant name
    pub constant: String,
    /// The constant's comparison value
    pub value: Value,
}

/// A fully-typed value held by one field slot of an [`Instance`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value on a nullable field
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
    /// 64-bit floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// UTC date/time
    DateTime(DateTime<Utc>),
    /// Ordered sequence of resolved values
    Collection(Vec<FieldValue>),
    /// Raw value passed through unchanged
    Untyped(Value),
    /// Resolved enum constant
    Enum(EnumValue),
    /// Recursively hydrated instance
    Nested(Box<Instance>),
}

impl FieldValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a date/time.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Try to get as a collection slice.
    pub fn as_collection(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a resolved enum constant.
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            FieldValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Try to get as a nested instance.
    pub fn as_nested(&self) -> Option<&Instance> {
        match self {
            FieldValue::Nested(inst) => Some(inst),
            _ => None,
        }
    }

    /// Try to get the raw value of an untyped slot.
    pub fn as_untyped(&self) -> Option<&Value> {
        match self {
            FieldValue::Untyped(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Int(5).as_i64(), Some(5));
        assert_eq!(FieldValue::Int(5).as_f64(), Some(5.0));
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Untyped(json!([1])).as_untyped(), Some(&json!([1])));
        assert_eq!(FieldValue::Str("x".into()).as_i64(), None);
    }

    #[test]
    fn test_collection_accessor() {
        let v = FieldValue::Collection(vec![FieldValue::Int(1), FieldValue::Int(2)]);
        assert_eq!(v.as_collection().unwrap().len(), 2);
        assert_eq!(FieldValue::Null.as_collection(), None);
    }
}
