//! Enum resolution per HYDRATION.md §Enum resolution.

use serde_json::Value;

use crate::instance::{EnumValue, FieldValue};
use crate::schema::{EnumConstant, EnumDef, FieldDescriptor, TypeTag};

use super::coerce::{sequence_items, truthy};

/// Resolves a raw value (or collection of raw values) against an enum.
pub(crate) fn resolve_enum(
    field: &FieldDescriptor,
    def: &EnumDef,
    raw: Option<&Value>,
) -> FieldValue {
    if matches!(field.type_tag, TypeTag::Collection) {
        let items = sequence_items(raw);
        return FieldValue::Collection(
            items
                .into_iter()
                .map(|item| resolve_single(field, def, Some(item)))
                .collect(),
        );
    }
    resolve_single(field, def, raw)
}

fn resolve_single(field: &FieldDescriptor, def: &EnumDef, raw: Option<&Value>) -> FieldValue {
    let raw = raw.filter(|v| !v.is_null());

    let null = Value::Null;
    let probe = match raw {
        Some(v) => v,
        None => match &field.default {
            Some(d) if truthy(d) => d,
            _ if field.nullable => return FieldValue::Null,
            // Defaultless and non-nullable: scan with null itself. A
            // constant may legitimately carry a null comparison value.
            _ => &null,
        },
    };

    match match_constant(def, probe).or_else(|| fallback_constant(def)) {
        Some(constant) => FieldValue::Enum(EnumValue {
            enum_name: def.name.clone(),
            constant: constant.name.clone(),
            value: constant.value.clone(),
        }),
        None => FieldValue::Null,
    }
}

/// First value-equal constant in declaration order; a structural constant
/// (an object carrying a `"value"` key) is retried on its value.
fn match_constant<'a>(def: &'a EnumDef, raw: &Value) -> Option<&'a EnumConstant> {
    if let Some(c) = def.constants.iter().find(|c| loose_eq(&c.value, raw)) {
        return Some(c);
    }
    if let Value::Object(map) = raw {
        if let Some(inner) = map.get("value") {
            return def.constants.iter().find(|c| loose_eq(&c.value, inner));
        }
    }
    None
}

/// Default-of-last-resort for unmatched values: the first declared
/// constant. Swapping this for a strict failure mode is a one-function
/// change; resolver logic does not depend on the choice.
fn fallback_constant(def: &EnumDef) -> Option<&EnumConstant> {
    def.constants.first()
}

/// Loose value equality: exact match, numeric cross-type match, or a
/// numeric string against a number.
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (s.trim().parse::<f64>(), n.as_f64()) {
                (Ok(parsed), Some(num)) => parsed == num,
                _ => false,
            }
        }
        _ => false,
    }
}
