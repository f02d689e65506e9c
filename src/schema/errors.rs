//! # Schema Registration Errors
//!
//! Every variant here is a registration-time failure: a malformed
//! declaration is rejected by `SchemaRegistryBuilder::build()` and never
//! reaches hydration.

use thiserror::Error;

/// Result type for schema registration
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema declaration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema '{0}' declared more than once")]
    DuplicateSchema(String),

    #[error("Enum '{0}' declared more than once")]
    DuplicateEnum(String),

    #[error("Schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("Enum '{0}' has no constants")]
    EmptyEnum(String),

    #[error("Schema '{schema}', field '{field}': type reference '{reference}' names no registered enum or schema")]
    UnknownTypeRef {
        schema: String,
        field: String,
        reference: String,
    },

    #[error("Schema '{schema}', field '{field}': directive has no target and the declared type names none")]
    DirectiveTargetMissing { schema: String, field: String },

    #[error("Schema '{schema}', field '{field}': directive target '{target}' is not registered")]
    UnknownDirectiveTarget {
        schema: String,
        field: String,
        target: String,
    },

    #[error("Schema '{schema}', field '{field}': directive expects {expected} '{target}', which is registered as a different kind")]
    DirectiveKindMismatch {
        schema: String,
        field: String,
        target: String,
        expected: &'static str,
    },

    #[error("Schema '{schema}', field '{field}': reference cycle back to '{target}' can never terminate")]
    ReferenceCycle {
        schema: String,
        field: String,
        target: String,
    },

    #[error("Malformed declaration: {0}")]
    MalformedDeclaration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = SchemaError::UnknownTypeRef {
            schema: "user".into(),
            field: "color".into(),
            reference: "colour".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("user"));
        assert!(display.contains("color"));
        assert!(display.contains("colour"));
    }

    #[test]
    fn test_kind_mismatch_names_expected_kind() {
        let err = SchemaError::DirectiveKindMismatch {
            schema: "user".into(),
            field: "address".into(),
            target: "color".into(),
            expected: "schema",
        };
        assert!(format!("{}", err).contains("schema"));
    }
}
