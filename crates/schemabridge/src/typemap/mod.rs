//! Type mapping between database type profiles.
//!
//! - [`primitive`]: native type name to native type name through the
//!   canonical hub
//! - [`custom`]: user-defined types (enums, composites, domains, ...) by
//!   strategy

pub mod custom;
pub mod primitive;

pub use custom::{
    resolve_custom, select_strategies, CustomTypeConversionOutcome, CustomTypeResolver,
    CustomTypeStrategy, SupplementaryObject,
};
pub use primitive::{resolve, ConversionKind, ConversionOutcome, TypeResolver};
