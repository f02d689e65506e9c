//! Scalar coercion rules per HYDRATION.md §Coercion.
//!
//! Each rule is a pure function over `(field, raw)` applying the shared
//! precedence: present raw value, else a present default, else null when
//! nullable, else the type's zero value. Coercion is loose on purpose --
//! input is assumed to come from untrusted, heterogeneous sources (JSON
//! payloads, arrays, other typed instances). Only date/time parsing is
//! strict: a malformed date is an error, an absent one is not.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

use crate::instance::FieldValue;
use crate::schema::FieldDescriptor;

use super::errors::{HydrateError, HydrateResult};

/// Loose presence test: `null`, `false`, `0`, `0.0`, `""`, `"0"`, `[]`
/// and `{}` all count as absent.
pub(crate) fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn not_null(v: &Value) -> bool {
    !v.is_null()
}

/// Applies the present-raw / present-default precedence for one field.
fn pick<'a>(
    field: &'a FieldDescriptor,
    raw: Option<&'a Value>,
    present: fn(&Value) -> bool,
) -> Option<&'a Value> {
    match raw {
        Some(v) if present(v) => Some(v),
        _ => field.default.as_ref().filter(|d| present(d)),
    }
}

pub(crate) fn int(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, truthy) {
        Some(v) => FieldValue::Int(cast_i64(v)),
        None if field.nullable => FieldValue::Null,
        None => FieldValue::Int(0),
    }
}

pub(crate) fn string(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, not_null) {
        Some(v) => FieldValue::Str(cast_string(v)),
        None if field.nullable => FieldValue::Null,
        None => FieldValue::Str(String::new()),
    }
}

pub(crate) fn float(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, truthy) {
        Some(v) => FieldValue::Float(cast_f64(v)),
        None if field.nullable => FieldValue::Null,
        None => FieldValue::Float(0.0),
    }
}

pub(crate) fn boolean(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, not_null) {
        Some(v) => FieldValue::Bool(cast_bool(v)),
        None if field.nullable => FieldValue::Null,
        None => FieldValue::Bool(false),
    }
}

pub(crate) fn date_time(field: &FieldDescriptor, raw: Option<&Value>) -> HydrateResult<FieldValue> {
    match pick(field, raw, truthy) {
        Some(v) => Ok(FieldValue::DateTime(parse_date(&field.name, v)?)),
        None if field.nullable => Ok(FieldValue::Null),
        // Epoch sentinel instead of an error: compatibility quirk, see
        // HYDRATION.md §Coercion.
        None => Ok(FieldValue::DateTime(DateTime::<Utc>::UNIX_EPOCH)),
    }
}

pub(crate) fn collection(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, truthy) {
        Some(v) => FieldValue::Collection(
            sequence_items(Some(v))
                .into_iter()
                .map(|item| FieldValue::Untyped(item.clone()))
                .collect(),
        ),
        None if field.nullable => FieldValue::Null,
        None => FieldValue::Collection(Vec::new()),
    }
}

pub(crate) fn untyped(field: &FieldDescriptor, raw: Option<&Value>) -> FieldValue {
    match pick(field, raw, not_null) {
        Some(v) => FieldValue::Untyped(v.clone()),
        // The untyped zero value is null either way.
        None => FieldValue::Null,
    }
}

/// Casts a raw value to an ordered sequence: arrays as-is, mappings by
/// their values, a lone scalar as a one-element sequence, absent/null as
/// empty. Shared with the element-wise resolver paths.
pub(crate) fn sequence_items(raw: Option<&Value>) -> Vec<&Value> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        Some(other) => vec![other],
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn cast_i64(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn cast_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn cast_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn cast_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

fn parse_date(field: &str, v: &Value) -> HydrateResult<DateTime<Utc>> {
    let parsed = match v {
        Value::String(s) => parse_date_text(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        // Structural form: an object carrying its text under "date".
        Value::Object(map) => map
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_date_text),
        _ => None,
    };
    parsed.ok_or_else(|| HydrateError::DateParse {
        field: field.to_string(),
        input: v.to_string(),
    })
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}
