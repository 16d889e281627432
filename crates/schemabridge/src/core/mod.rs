//! Core abstractions shared across the conversion engine.
//!
//! - [`catalog`]: database registry for dependency injection
//! - [`schema`]: database-agnostic schema metadata (the engine's input and output)
//! - [`traits`]: pluggable heuristics
//! - [`identifier`]: identifier and check-expression helpers

pub mod catalog;
pub mod identifier;
pub mod schema;
pub mod traits;

// Re-export commonly used types for convenience
pub use catalog::{DatabaseCapabilities, Registry};
pub use schema::{
    CompositeField, CustomTypeCategory, CustomTypeDefinition, CustomTypeDescriptor, Field, Schema,
    SchemaObject, CONTAINER_KINDS,
};
pub use traits::Estimator;
