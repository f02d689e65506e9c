//! Schema registry: the process-wide table of declarations.
//!
//! Registration rules per HYDRATION.md §Registry:
//! - Declarations are collected through a builder and frozen by `build()`
//! - `build()` cross-validates every type reference and directive target
//!   over the whole declared set, so mutually recursive schemas are fine
//! - A name that resolves to nothing is a registration error, never a
//!   runtime null
//! - The built registry is read-only; concurrent reads need no locking

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::hydrate::coerce::truthy;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Directive, EnumDef, FieldDescriptor, Schema, TypeTag};

/// Immutable lookup table of schemas and enums.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    enums: HashMap<String, EnumDef>,
}

impl SchemaRegistry {
    /// Starts an empty builder.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Looks up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Looks up an enum by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Whether a schema with this name is registered.
    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Whether an enum with this name is registered.
    pub fn contains_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

/// Collects declarations, then validates and freezes them.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: Vec<Schema>,
    enums: Vec<EnumDef>,
}

impl SchemaRegistryBuilder {
    /// Adds a schema declaration.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Adds an enum declaration.
    pub fn enum_def(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    /// Adds a schema declared as a JSON document.
    pub fn schema_json(self, text: &str) -> SchemaResult<Self> {
        let schema: Schema = serde_json::from_str(text)
            .map_err(|e| SchemaError::MalformedDeclaration(e.to_string()))?;
        Ok(self.schema(schema))
    }

    /// Adds an enum declared as a JSON document.
    pub fn enum_json(self, text: &str) -> SchemaResult<Self> {
        let def: EnumDef = serde_json::from_str(text)
            .map_err(|e| SchemaError::MalformedDeclaration(e.to_string()))?;
        Ok(self.enum_def(def))
    }

    /// Validates the declared set and freezes it into a registry.
    pub fn build(self) -> SchemaResult<SchemaRegistry> {
        let mut enums: HashMap<String, EnumDef> = HashMap::new();
        for def in self.enums {
            if def.constants.is_empty() {
                return Err(SchemaError::EmptyEnum(def.name));
            }
            if enums.contains_key(&def.name) {
                return Err(SchemaError::DuplicateEnum(def.name));
            }
            enums.insert(def.name.clone(), def);
        }

        let mut schemas: HashMap<String, Schema> = HashMap::new();
        for schema in self.schemas {
            if schemas.contains_key(&schema.name) {
                return Err(SchemaError::DuplicateSchema(schema.name));
            }
            schemas.insert(schema.name.clone(), schema);
        }

        for schema in schemas.values() {
            validate_schema(schema, &schemas, &enums)?;
        }
        check_reference_cycles(&schemas, &enums)?;

        debug!(
            schemas = schemas.len(),
            enums = enums.len(),
            "schema registry built"
        );
        Ok(SchemaRegistry { schemas, enums })
    }
}

/// Checks field uniqueness and resolves every reference of one schema.
fn validate_schema(
    schema: &Schema,
    schemas: &HashMap<String, Schema>,
    enums: &HashMap<String, EnumDef>,
) -> SchemaResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for field in &schema.fields {
        if !seen.insert(&field.name) {
            return Err(SchemaError::DuplicateField {
                schema: schema.name.clone(),
                field: field.name.clone(),
            });
        }

        match &field.type_tag {
            TypeTag::SchemaRef { schema: target } if !schemas.contains_key(target) => {
                return Err(SchemaError::UnknownTypeRef {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                    reference: target.clone(),
                });
            }
            TypeTag::Other { name } if !schemas.contains_key(name) && !enums.contains_key(name) => {
                return Err(SchemaError::UnknownTypeRef {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                    reference: name.clone(),
                });
            }
            _ => {}
        }

        if let Some(directive) = &field.directive {
            let target = directive
                .target()
                .or_else(|| field.type_tag.ref_name())
                .ok_or_else(|| SchemaError::DirectiveTargetMissing {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                })?;

            let (found, mismatched) = match directive {
                Directive::Enum { .. } => {
                    (enums.contains_key(target), schemas.contains_key(target))
                }
                Directive::Nested { .. } => {
                    (schemas.contains_key(target), enums.contains_key(target))
                }
            };

            if !found {
                if mismatched {
                    return Err(SchemaError::DirectiveKindMismatch {
                        schema: schema.name.clone(),
                        field: field.name.clone(),
                        target: target.to_string(),
                        expected: match directive {
                            Directive::Enum { .. } => "enum",
                            Directive::Nested { .. } => "schema",
                        },
                    });
                }
                return Err(SchemaError::UnknownDirectiveTarget {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                    target: target.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Rejects cycles of recursion-forcing schema references.
///
/// A nested-reference field forces a nested instance on every hydration
/// unless it is nullable with no truthy default (absent resolves to
/// null) or collection-tagged (absent resolves to the empty sequence).
/// A truthy default is no escape: it re-applies at every level where the
/// field is absent, so a cycle of forcing edges can never terminate, for
/// any input. Such a declaration is malformed and rejected here.
fn check_reference_cycles(
    schemas: &HashMap<String, Schema>,
    enums: &HashMap<String, EnumDef>,
) -> SchemaResult<()> {
    let mut marks: HashMap<String, Mark> = HashMap::new();
    for name in schemas.keys() {
        visit(name, schemas, enums, &mut marks)?;
    }
    Ok(())
}

fn visit(
    name: &str,
    schemas: &HashMap<String, Schema>,
    enums: &HashMap<String, EnumDef>,
    marks: &mut HashMap<String, Mark>,
) -> SchemaResult<()> {
    if marks.get(name) == Some(&Mark::Done) {
        return Ok(());
    }
    marks.insert(name.to_string(), Mark::InProgress);

    if let Some(schema) = schemas.get(name) {
        for field in &schema.fields {
            let Some(target) = forcing_ref_target(field, schemas, enums) else {
                continue;
            };
            if marks.get(target) == Some(&Mark::InProgress) {
                return Err(SchemaError::ReferenceCycle {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                    target: target.to_string(),
                });
            }
            visit(target, schemas, enums, marks)?;
        }
    }

    marks.insert(name.to_string(), Mark::Done);
    Ok(())
}

/// The schema this field must recursively hydrate on every call, if any.
fn forcing_ref_target<'a>(
    field: &'a FieldDescriptor,
    schemas: &HashMap<String, Schema>,
    enums: &HashMap<String, EnumDef>,
) -> Option<&'a str> {
    if matches!(field.type_tag, TypeTag::Collection) {
        return None;
    }
    if field.nullable && !field.default.as_ref().map_or(false, truthy) {
        return None;
    }
    match &field.directive {
        Some(directive @ Directive::Nested { .. }) => {
            directive.target().or_else(|| field.type_tag.ref_name())
        }
        Some(Directive::Enum { .. }) => None,
        None => match &field.type_tag {
            TypeTag::SchemaRef { schema } => Some(schema.as_str()),
            // `other` names resolve enum-first at hydration, so only a
            // schema-bound name recurses.
            TypeTag::Other { name } if !enums.contains_key(name) && schemas.contains_key(name) => {
                Some(name.as_str())
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::FieldDescriptor;
    use serde_json::json;

    fn color_enum() -> EnumDef {
        EnumDef::new("color")
            .constant("RED", json!(1))
            .constant("GREEN", json!(2))
    }

    #[test]
    fn test_build_resolves_references() {
        let registry = SchemaRegistry::builder()
            .enum_def(color_enum())
            .schema(
                Schema::new("address").field(FieldDescriptor::new("city", TypeTag::Str)),
            )
            .schema(
                Schema::new("user")
                    .field(FieldDescriptor::new("id", TypeTag::Int))
                    .field(FieldDescriptor::new(
                        "address",
                        TypeTag::SchemaRef {
                            schema: "address".into(),
                        },
                    ))
                    .field(FieldDescriptor::new(
                        "favorite",
                        TypeTag::Other {
                            name: "color".into(),
                        },
                    )),
            )
            .build()
            .unwrap();

        assert!(registry.contains_schema("user"));
        assert!(registry.contains_enum("color"));
        assert_eq!(registry.schema_count(), 2);
    }

    #[test]
    fn test_mutually_recursive_schemas_build() {
        let registry = SchemaRegistry::builder()
            .schema(Schema::new("a").field(
                FieldDescriptor::new("b", TypeTag::SchemaRef { schema: "b".into() }).nullable(),
            ))
            .schema(Schema::new("b").field(
                FieldDescriptor::new("a", TypeTag::SchemaRef { schema: "a".into() }).nullable(),
            ))
            .build()
            .unwrap();
        assert_eq!(registry.schema_count(), 2);
    }

    #[test]
    fn test_forcing_reference_cycle_rejected() {
        // Non-nullable references in both directions: hydrating either
        // schema would need an unbounded chain of nested instances.
        let err = SchemaRegistry::builder()
            .schema(
                Schema::new("a").field(FieldDescriptor::new(
                    "b",
                    TypeTag::SchemaRef { schema: "b".into() },
                )),
            )
            .schema(
                Schema::new("b").field(FieldDescriptor::new(
                    "a",
                    TypeTag::SchemaRef { schema: "a".into() },
                )),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::ReferenceCycle { .. }));
    }

    #[test]
    fn test_self_reference_needs_a_null_escape() {
        let node = |field: FieldDescriptor| {
            SchemaRegistry::builder()
                .schema(Schema::new("node").field(field))
                .build()
        };
        let next = || {
            FieldDescriptor::new(
                "next",
                TypeTag::SchemaRef {
                    schema: "node".into(),
                },
            )
        };

        let err = node(next()).unwrap_err();
        assert!(matches!(err, SchemaError::ReferenceCycle { .. }));

        // A truthy default is no escape: it re-applies at every level
        // where the field is absent.
        let err = node(next().default_value(json!({ "tag": "leaf" }))).unwrap_err();
        assert!(matches!(err, SchemaError::ReferenceCycle { .. }));
        let err = node(next().nullable().default_value(json!({ "tag": "leaf" }))).unwrap_err();
        assert!(matches!(err, SchemaError::ReferenceCycle { .. }));

        // Nullable with no default resolves absence to null and builds.
        assert!(node(next().nullable()).is_ok());
    }

    #[test]
    fn test_cycle_through_nested_directive_rejected() {
        let err = SchemaRegistry::builder()
            .schema(Schema::new("a").field(
                FieldDescriptor::new("b", TypeTag::Untyped).directive(Directive::Nested {
                    target: Some("b".into()),
                }),
            ))
            .schema(
                Schema::new("b").field(FieldDescriptor::new(
                    "a",
                    TypeTag::SchemaRef { schema: "a".into() },
                )),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::ReferenceCycle { .. }));
    }

    #[test]
    fn test_collection_reference_cycle_builds() {
        // Collection-tagged references resolve absence to the empty
        // sequence, so the recursion is always input-bounded.
        let registry = SchemaRegistry::builder()
            .schema(Schema::new("node").field(
                FieldDescriptor::new("children", TypeTag::Collection).directive(
                    Directive::Nested {
                        target: Some("node".into()),
                    },
                ),
            ))
            .build();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_duplicate_schema_rejected() {
        let err = SchemaRegistry::builder()
            .schema(Schema::new("user"))
            .schema(Schema::new("user"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSchema("user".into()));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = SchemaRegistry::builder()
            .schema(
                Schema::new("user")
                    .field(FieldDescriptor::new("id", TypeTag::Int))
                    .field(FieldDescriptor::new("id", TypeTag::Str)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let err = SchemaRegistry::builder()
            .enum_def(EnumDef::new("empty"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyEnum("empty".into()));
    }

    #[test]
    fn test_unknown_type_reference_rejected() {
        let err = SchemaRegistry::builder()
            .schema(Schema::new("user").field(FieldDescriptor::new(
                "favorite",
                TypeTag::Other {
                    name: "colour".into(),
                },
            )))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTypeRef { .. }));
    }

    #[test]
    fn test_directive_on_collection_needs_explicit_target() {
        let err = SchemaRegistry::builder()
            .enum_def(color_enum())
            .schema(Schema::new("user").field(
                FieldDescriptor::new("colors", TypeTag::Collection)
                    .directive(Directive::Enum { target: None }),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DirectiveTargetMissing { .. }));
    }

    #[test]
    fn test_directive_kind_mismatch_rejected() {
        let err = SchemaRegistry::builder()
            .enum_def(color_enum())
            .schema(Schema::new("user").field(
                FieldDescriptor::new("colors", TypeTag::Collection).directive(
                    Directive::Nested {
                        target: Some("color".into()),
                    },
                ),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DirectiveKindMismatch { .. }));
    }

    #[test]
    fn test_directive_borrows_declared_type_name() {
        // Directive with no target on a schema_ref field resolves to the
        // field's own declared schema.
        let registry = SchemaRegistry::builder()
            .schema(Schema::new("address").field(FieldDescriptor::new("city", TypeTag::Str)))
            .schema(Schema::new("user").field(
                FieldDescriptor::new(
                    "address",
                    TypeTag::SchemaRef {
                        schema: "address".into(),
                    },
                )
                .directive(Directive::Nested { target: None }),
            ))
            .build();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_json_declarations() {
        let registry = SchemaRegistry::builder()
            .enum_json(
                r#"{
                    "name": "color",
                    "constants": [
                        { "name": "RED", "value": 1 },
                        { "name": "GREEN", "value": 2 }
                    ]
                }"#,
            )
            .unwrap()
            .schema_json(
                r#"{
                    "name": "user",
                    "fields": [
                        { "name": "id", "type": "int" },
                        { "name": "name", "type": "str", "default": "anon" },
                        { "name": "favorite", "type": "other", "ref": "color" }
                    ]
                }"#,
            )
            .unwrap()
            .build()
            .unwrap();

        let schema = registry.schema("user").unwrap();
        assert_eq!(schema.fields.len(), 3);
        assert_eq!(schema.field_named("name").unwrap().default, Some(json!("anon")));
    }

    #[test]
    fn test_malformed_json_declaration_rejected() {
        let err = SchemaRegistry::builder()
            .schema_json("{ not json")
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDeclaration(_)));
    }
}
