//! hydrator - a type-directed hydration and coercion engine
//!
//! Loosely-typed input in, fully-typed instances out, and back again.
//! Rules are documented in HYDRATION.md.

pub mod hydrate;
pub mod instance;
pub mod schema;
