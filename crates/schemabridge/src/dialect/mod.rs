//! Canonical types, per-database type profiles and feature support.
//!
//! The mappers built on top of this module use a hub-and-spoke approach:
//! instead of n*(n-1) hand-written pair rules for n databases, each
//! database contributes one [`DatabaseTypeProfile`] (native ⇄ canonical)
//! and one [`FeatureProfile`] (object-type support). Adding a database
//! means adding a profile factory in [`crate::drivers`]; no resolver code
//! changes.

pub mod canonical;
pub mod features;
pub mod profile;

pub use canonical::{CanonicalType, Fallback};
pub use features::{ConversionPreferences, FeatureProfile, ObjectType, SupportState};
pub use profile::{
    normalize_type_name, ConstraintSupport, CustomTypeCapabilities, DatabaseTypeProfile,
    NativeImplementation, TypeInfo, TypeProfileBuilder,
};
