//! Schema declaration types per HYDRATION.md
//!
//! A schema is an ordered list of field descriptors; each descriptor
//! carries a type tag, nullability, an optional default value, and an
//! optional directive that overrides type-based dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared field types, as a closed set.
///
/// `SchemaRef` and `Other` carry the name of a registered declaration;
/// both are resolved (and rejected if unresolvable) at registry build
/// time, never at hydration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeTag {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    Str,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// UTC date/time
    DateTime,
    /// Ordered sequence of raw elements
    Collection,
    /// Value passed through unchanged
    Untyped,
    /// Reference to another registered schema, hydrated recursively
    SchemaRef {
        /// Name of the referenced schema
        schema: String,
    },
    /// Reference to a named declaration bound at build time to either a
    /// registered enum or a registered schema
    Other {
        /// Name of the referenced declaration. Serialized as `ref` so it
        /// cannot collide with the descriptor's own `name` key when the
        /// tag is flattened into a field declaration.
        #[serde(rename = "ref")]
        name: String,
    },
}

impl TypeTag {
    /// Returns the tag name for error messages
    pub fn tag_name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Str => "str",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::DateTime => "date_time",
            TypeTag::Collection => "collection",
            TypeTag::Untyped => "untyped",
            TypeTag::SchemaRef { .. } => "schema_ref",
            TypeTag::Other { .. } => "other",
        }
    }

    /// The declaration name this tag references, if it references one.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            TypeTag::SchemaRef { schema } => Some(schema),
            TypeTag::Other { name } => Some(name),
            _ => None,
        }
    }
}

/// Per-field dispatch override per HYDRATION.md §Dispatch.
///
/// When `target` is absent the referenced declaration is taken from the
/// field's own declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Resolve against a registered enum
    Enum {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// Hydrate against a registered schema
    Nested {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl Directive {
    /// The explicit target override, if declared.
    pub fn target(&self) -> Option<&str> {
        match self {
            Directive::Enum { target } | Directive::Nested { target } => target.as_deref(),
        }
    }

    /// Returns the directive kind for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Directive::Enum { .. } => "enum",
            Directive::Nested { .. } => "nested",
        }
    }
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared type
    #[serde(flatten)]
    pub type_tag: TypeTag,
    /// Whether an absent value may resolve to null
    #[serde(default)]
    pub nullable: bool,
    /// Default substituted for absent values, before the zero value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Dispatch override; takes precedence over `type_tag`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
}

impl FieldDescriptor {
    /// Create a non-nullable field with no default and no directive.
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            nullable: false,
            default: None,
            directive: None,
        }
    }

    /// Marks the field nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attaches a default value.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Attaches a dispatch directive.
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }
}

/// A named schema: an ordered set of typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema name
    pub name: String,
    /// Field declarations, in hydration order
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by name.
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One named constant of an enum, carrying its comparison value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Constant name
    pub name: String,
    /// Comparison value matched against raw input
    pub value: Value,
}

/// A named set of constants.
///
/// Constant values need not be unique: resolution takes the first
/// value-equal match in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Unique enum name
    pub name: String,
    /// Constants in declaration order
    pub constants: Vec<EnumConstant>,
}

impl EnumDef {
    /// Create an empty enum declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constants: Vec::new(),
        }
    }

    /// Appends a constant.
    pub fn constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.constants.push(EnumConstant {
            name: name.into(),
            value,
        });
        self
    }

    /// The first declared constant, if any.
    pub fn first(&self) -> Option<&EnumConstant> {
        self.constants.first()
    }

    /// Looks up a constant by name.
    pub fn constant_named(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }
}
