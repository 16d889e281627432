//! # schemabridge
//!
//! Metadata-driven schema and type conversion across database paradigms.
//!
//! Every database is described by data, not code: a paradigm set, a type
//! profile mapping native spellings onto a canonical type vocabulary, and
//! a feature profile saying which object types it supports. From those
//! descriptions the library provides:
//!
//! - **Primitive type resolution** through canonical types with widening fallbacks
//! - **Custom type conversion** (enums, composites, domains, arrays) with strategy fallback
//! - **Conversion matrices** classifying any database pair by compatibility and complexity
//! - **Path finding** through an intermediate database when no direct route is feasible
//! - **Schema conversion** producing a target schema plus a structured report
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use schemabridge::{Config, ConversionEngine, ConversionRequest, Registry, Schema};
//!
//! fn main() -> schemabridge::Result<()> {
//!     let registry = Arc::new(Registry::build());
//!     let engine = ConversionEngine::new(registry, Config::default());
//!     let schema = Schema::load("schema.yaml")?;
//!     let result = engine.convert(&ConversionRequest::new(schema, "postgresql", "mongodb"));
//!     println!("{}", result.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod paradigm;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, EngineSettings, EstimatorConfig, ExecutionMode};
pub use core::{
    CustomTypeDescriptor, DatabaseCapabilities, Estimator, Field, Registry, Schema, SchemaObject,
};
pub use dialect::{CanonicalType, DatabaseTypeProfile, FeatureProfile, ObjectType};
pub use engine::{
    ConversionEngine, ConversionReport, ConversionRequest, ConversionResult, ConversionWarning,
    PendingDecision, Severity, UserPreferences,
};
pub use error::{ConvertError, Result};
pub use matrix::{
    ConversionComplexity, ConversionMatrix, ConversionPath, HeuristicEstimator, MatrixGenerator,
    PathFinder,
};
pub use paradigm::{ConversionStrategy, Paradigm, ParadigmCompatibility};
pub use typemap::{ConversionOutcome, CustomTypeConversionOutcome, CustomTypeStrategy, TypeResolver};
