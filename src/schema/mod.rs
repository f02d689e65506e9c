//! Schema declarations and the registry that freezes them.
//!
//! Declarations replace runtime reflection: a schema's ordered field
//! list, nullability, defaults, and dispatch directives are registered
//! explicitly (in code or as JSON documents) and validated once by
//! `SchemaRegistryBuilder::build()`. See HYDRATION.md §Registry.

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use types::{Directive, EnumConstant, EnumDef, FieldDescriptor, Schema, TypeTag};
