//! # Hydration Errors
//!
//! Hydration absorbs bad *data* into defaulting and null substitution
//! wherever the rules allow; the variants here are the paths with no
//! absorbing rule. Malformed *declarations* never get this far — the
//! registry rejects them at build time.

use thiserror::Error;

/// Result type for hydration operations
pub type HydrateResult<T> = Result<T, HydrateError>;

/// Hydration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HydrateError {
    #[error("Schema '{0}' is not registered")]
    UnknownSchema(String),

    #[error("Enum '{0}' is not registered")]
    UnknownEnum(String),

    #[error("Field '{field}': cannot parse {input} as a date/time")]
    DateParse { field: String, input: String },

    #[error("Field '{field}': expected a mapping, got {actual}")]
    NotAMapping { field: String, actual: String },

    #[error("Structural serialization failed: {0}")]
    Structural(String),
}
