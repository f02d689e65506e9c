//! Hydration orchestrator.
//!
//! Walks a schema's fields in declared order and dispatches each raw
//! value to the matching resolver: a directive overrides type-based
//! dispatch, scalar tags use the coercion rules, references recurse.
//! Every field ends up assigned; resolver failures propagate untouched.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::instance::{FieldValue, Instance};
use crate::schema::{Directive, FieldDescriptor, Schema, SchemaRegistry, TypeTag};

use super::coerce::{self, json_type_name};
use super::errors::{HydrateError, HydrateResult};
use super::{enums, nested};

/// Stateless hydration façade over a built registry.
#[derive(Debug, Clone, Copy)]
pub struct Hydrator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Hydrator<'a> {
    /// Creates a hydrator over a registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The registry this hydrator resolves against.
    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Hydrates a raw mapping into an instance of `schema_name`.
    ///
    /// `None` is treated as the empty mapping, so a defaultless,
    /// non-nullable schema still hydrates to its zero values.
    pub fn create(
        &self,
        schema_name: &str,
        values: Option<&Map<String, Value>>,
    ) -> HydrateResult<Instance> {
        let schema = self
            .registry
            .schema(schema_name)
            .ok_or_else(|| HydrateError::UnknownSchema(schema_name.to_string()))?;

        trace!(
            schema = schema_name,
            fields = schema.fields.len(),
            "hydrating"
        );

        let mut instance = Instance::new(schema.name.as_str(), schema.fields.len());
        for field in &schema.fields {
            let raw = values.and_then(|m| m.get(&field.name));
            let resolved = self.resolve_field(schema, field, raw)?;
            instance.push(field.name.clone(), resolved);
        }
        Ok(instance)
    }

    /// Hydrates from any raw JSON value: an object is a mapping, null is
    /// the empty mapping, anything else is an error.
    pub fn from_value(&self, schema_name: &str, values: Option<&Value>) -> HydrateResult<Instance> {
        match values {
            None | Some(Value::Null) => self.create(schema_name, None),
            Some(Value::Object(map)) => self.create(schema_name, Some(map)),
            Some(other) => Err(HydrateError::NotAMapping {
                field: "$root".into(),
                actual: json_type_name(other).to_string(),
            }),
        }
    }

    /// Hydrates from another typed instance through its own
    /// round-trip-to-mapping projection.
    pub fn from_instance(&self, schema_name: &str, instance: &Instance) -> HydrateResult<Instance> {
        let map = instance.to_map();
        self.create(schema_name, Some(&map))
    }

    /// Hydrates from a generic serializable object via structural
    /// serialization.
    pub fn from_serialize<T: Serialize>(
        &self,
        schema_name: &str,
        values: &T,
    ) -> HydrateResult<Instance> {
        let value = serde_json::to_value(values)
            .map_err(|e| HydrateError::Structural(e.to_string()))?;
        self.from_value(schema_name, Some(&value))
    }

    fn resolve_field(
        &self,
        schema: &Schema,
        field: &FieldDescriptor,
        raw: Option<&Value>,
    ) -> HydrateResult<FieldValue> {
        if let Some(directive) = &field.directive {
            return self.resolve_directive(schema, field, directive, raw);
        }

        match &field.type_tag {
            TypeTag::Int => Ok(coerce::int(field, raw)),
            TypeTag::Str => Ok(coerce::string(field, raw)),
            TypeTag::Float => Ok(coerce::float(field, raw)),
            TypeTag::Bool => Ok(coerce::boolean(field, raw)),
            TypeTag::DateTime => coerce::date_time(field, raw),
            TypeTag::Collection => Ok(coerce::collection(field, raw)),
            TypeTag::Untyped => Ok(coerce::untyped(field, raw)),
            TypeTag::SchemaRef { schema: target } => nested::resolve_nested(self, field, target, raw),
            TypeTag::Other { name } => self.resolve_other(field, name, raw),
        }
    }

    fn resolve_directive(
        &self,
        schema: &Schema,
        field: &FieldDescriptor,
        directive: &Directive,
        raw: Option<&Value>,
    ) -> HydrateResult<FieldValue> {
        // Registry build guarantees the target resolves; the error paths
        // below only trigger for schemas that bypassed validation.
        let target = directive
            .target()
            .or_else(|| field.type_tag.ref_name())
            .ok_or_else(|| HydrateError::UnknownSchema(schema.name.clone()))?;

        match directive {
            Directive::Enum { .. } => {
                let def = self
                    .registry
                    .enum_def(target)
                    .ok_or_else(|| HydrateError::UnknownEnum(target.to_string()))?;
                Ok(enums::resolve_enum(field, def, raw))
            }
            Directive::Nested { .. } => nested::resolve_nested(self, field, target, raw),
        }
    }

    /// An `other` reference resolves to whichever declaration the name
    /// was bound to at build time: an enum uses plain value matching, a
    /// schema hydrates recursively.
    fn resolve_other(
        &self,
        field: &FieldDescriptor,
        name: &str,
        raw: Option<&Value>,
    ) -> HydrateResult<FieldValue> {
        if let Some(def) = self.registry.enum_def(name) {
            return Ok(enums::resolve_enum(field, def, raw));
        }
        if self.registry.contains_schema(name) {
            return nested::resolve_nested(self, field, name, raw);
        }
        Err(HydrateError::UnknownSchema(name.to_string()))
    }
}
