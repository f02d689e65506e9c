//! Nested-schema resolution per HYDRATION.md §Nested resolution.

use serde_json::Value;

use crate::instance::FieldValue;
use crate::schema::{FieldDescriptor, TypeTag};

use super::coerce::{json_type_name, sequence_items, truthy};
use super::errors::{HydrateError, HydrateResult};
use super::hydrator::Hydrator;

/// Hydrates a raw value (or collection of raw values) against a schema.
pub(crate) fn resolve_nested(
    hydrator: &Hydrator<'_>,
    field: &FieldDescriptor,
    schema_name: &str,
    raw: Option<&Value>,
) -> HydrateResult<FieldValue> {
    if matches!(field.type_tag, TypeTag::Collection) {
        let mut resolved = Vec::new();
        for item in sequence_items(raw) {
            resolved.push(resolve_single(hydrator, field, schema_name, Some(item))?);
        }
        return Ok(FieldValue::Collection(resolved));
    }
    resolve_single(hydrator, field, schema_name, raw)
}

fn resolve_single(
    hydrator: &Hydrator<'_>,
    field: &FieldDescriptor,
    schema_name: &str,
    raw: Option<&Value>,
) -> HydrateResult<FieldValue> {
    let raw = raw.filter(|v| !v.is_null());

    match raw {
        Some(v) => hydrate_mapping(hydrator, field, schema_name, v),
        None => {
            if let Some(default) = &field.default {
                if truthy(default) {
                    return hydrate_mapping(hydrator, field, schema_name, default);
                }
            }
            if field.nullable {
                return Ok(FieldValue::Null);
            }
            // All-defaults instance: recurse with an empty mapping.
            let instance = hydrator.create(schema_name, None)?;
            Ok(FieldValue::Nested(Box::new(instance)))
        }
    }
}

fn hydrate_mapping(
    hydrator: &Hydrator<'_>,
    field: &FieldDescriptor,
    schema_name: &str,
    raw: &Value,
) -> HydrateResult<FieldValue> {
    match raw {
        Value::Object(map) => {
            let instance = hydrator.create(schema_name, Some(map))?;
            Ok(FieldValue::Nested(Box::new(instance)))
        }
        other => Err(HydrateError::NotAMapping {
            field: field.name.clone(),
            actual: json_type_name(other).to_string(),
        }),
    }
}
