//! The hydration engine.
//!
//! One-way data flow per call: raw input → field-by-field dispatch →
//! coerced/resolved value → assembled instance. Fully synchronous and
//! stateless beyond the read-only registry; see HYDRATION.md.

pub(crate) mod coerce;
mod enums;
mod errors;
mod hydrator;
mod nested;

pub use errors::{HydrateError, HydrateResult};
pub use hydrator::Hydrator;
