//! Hydrated instances and their plain-object projection.

mod project;
mod value;

pub use project::to_map;
pub use value::{EnumValue, FieldValue};

use serde_json::{Map, Value};

/// A fully-typed instance produced by hydration.
///
/// Field slots keep the schema's declared order. Lookup by name is a
/// linear scan, which is fine at the field counts schemas carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    schema: String,
    fields: Vec<(String, FieldValue)>,
}

impl Instance {
    pub(crate) fn new(schema: impl Into<String>, capacity: usize) -> Self {
        Self {
            schema: schema.into(),
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: FieldValue) {
        self.fields.push((name, value));
    }

    /// Name of the schema this instance was hydrated against.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Returns a field's value, if the schema declares the field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterates fields in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of field slots.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the instance has no field slots.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Projects this instance back to a plain key-value mapping.
    ///
    /// Lossy by type category per HYDRATION.md §Projection.
    pub fn to_map(&self) -> Map<String, Value> {
        project::to_map(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_order() {
        let mut inst = Instance::new("user", 2);
        inst.push("id".into(), FieldValue::Int(5));
        inst.push("name".into(), FieldValue::Str("anon".into()));

        assert_eq!(inst.schema_name(), "user");
        assert_eq!(inst.len(), 2);
        assert_eq!(inst.get("id"), Some(&FieldValue::Int(5)));
        assert_eq!(inst.get("missing"), None);

        let names: Vec<_> = inst.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["id", "name"]);
    }
}
