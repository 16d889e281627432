//! Database registry for explicit dependency injection.
//!
//! The [`Registry`] holds, per database identifier, its capabilities
//! (paradigm set), its [`DatabaseTypeProfile`] and its [`FeatureProfile`].
//! It is built once by the host process and shared read-only
//! (`Arc<Registry>`) with every engine and request.
//!
//! # Design Rationale
//!
//! - **No global state**: registration is an explicit call, not a side
//!   effect of module initialization
//! - **Testable**: tests build partial registries with only the databases
//!   they need
//! - **Immutable after construction**: no interior mutability, so the
//!   registry is `Send + Sync` without locks

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::{DatabaseTypeProfile, FeatureProfile, ObjectType};
use crate::error::{ConvertError, Result};
use crate::paradigm::{Paradigm, ParadigmAnalyzer};

/// What the registry knows about one database technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCapabilities {
    /// Registry identifier (lower-case, e.g. "postgresql").
    pub id: String,
    /// Human-readable name (e.g. "PostgreSQL").
    pub display_name: String,
    /// Data-model families the database supports.
    pub paradigms: BTreeSet<Paradigm>,
}

impl DatabaseCapabilities {
    /// Create a capabilities record.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, paradigms: &[Paradigm]) -> Self {
        Self {
            id: id.into().trim().to_lowercase(),
            display_name: display_name.into(),
            paradigms: paradigms.iter().copied().collect(),
        }
    }
}

/// Registry of databases, their type profiles and feature profiles.
///
/// # Example
///
/// ```rust,ignore
/// let registry = Arc::new(Registry::build());
/// assert!(registry.is_known("postgres"));
/// let engine = ConversionEngine::new(registry, Config::default());
/// ```
#[derive(Default)]
pub struct Registry {
    capabilities: BTreeMap<String, DatabaseCapabilities>,
    type_profiles: HashMap<String, Arc<DatabaseTypeProfile>>,
    feature_profiles: HashMap<String, Arc<FeatureProfile>>,
    aliases: HashMap<String, String>,
    analyzer: ParadigmAnalyzer,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in database registered.
    pub fn build() -> Self {
        let mut registry = Self::new();
        crate::drivers::register_builtins(&mut registry);
        debug!(
            "Registry built with {} databases and {} aliases",
            registry.capabilities.len(),
            registry.aliases.len()
        );
        registry
    }

    /// Register a database with all three of its descriptions.
    pub fn register_database(
        &mut self,
        capabilities: DatabaseCapabilities,
        type_profile: DatabaseTypeProfile,
        feature_profile: FeatureProfile,
    ) {
        self.register_capabilities(capabilities);
        self.register_type_profile(type_profile);
        self.register_feature_profile(feature_profile);
    }

    /// Register (or replace) a database's capabilities.
    pub fn register_capabilities(&mut self, capabilities: DatabaseCapabilities) {
        self.capabilities.insert(capabilities.id.clone(), capabilities);
    }

    /// Register (or replace) a type profile, keyed by its database id.
    pub fn register_type_profile(&mut self, profile: DatabaseTypeProfile) {
        let id = profile.database.trim().to_lowercase();
        self.type_profiles.insert(id, Arc::new(profile));
    }

    /// Register (or replace) a feature profile, keyed by its database id.
    pub fn register_feature_profile(&mut self, profile: FeatureProfile) {
        let id = profile.database.trim().to_lowercase();
        self.feature_profiles.insert(id, Arc::new(profile));
    }

    /// Register an alternative spelling for a database id.
    pub fn register_alias(&mut self, alias: impl Into<String>, id: impl Into<String>) {
        self.aliases.insert(
            alias.into().trim().to_lowercase(),
            id.into().trim().to_lowercase(),
        );
    }

    /// Normalize an identifier: trimmed, lower-case, aliases resolved.
    pub fn normalize(&self, id: &str) -> String {
        let key = id.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(target) => target.clone(),
            None => key,
        }
    }

    /// Capabilities of a database.
    pub fn capabilities(&self, id: &str) -> Option<&DatabaseCapabilities> {
        self.capabilities.get(&self.normalize(id))
    }

    /// Capabilities of a database, returning an error if unknown.
    pub fn require_capabilities(&self, id: &str) -> Result<&DatabaseCapabilities> {
        self.capabilities(id)
            .ok_or_else(|| ConvertError::UnknownDatabase(id.trim().to_string()))
    }

    /// Paradigm set of a database.
    pub fn paradigms(&self, id: &str) -> Option<&BTreeSet<Paradigm>> {
        self.capabilities(id).map(|caps| &caps.paradigms)
    }

    /// Whether the identifier (or an alias of it) is registered.
    pub fn is_known(&self, id: &str) -> bool {
        self.capabilities(id).is_some()
    }

    /// All registered database ids, sorted.
    pub fn database_ids(&self) -> Vec<&str> {
        self.capabilities.keys().map(String::as_str).collect()
    }

    /// Number of registered databases.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether no database is registered.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Type profile of a database.
    pub fn type_profile(&self, id: &str) -> Option<Arc<DatabaseTypeProfile>> {
        self.type_profiles.get(&self.normalize(id)).cloned()
    }

    /// Type profile of a database, returning an error if missing.
    pub fn require_type_profile(&self, id: &str) -> Result<Arc<DatabaseTypeProfile>> {
        self.type_profile(id)
            .ok_or_else(|| ConvertError::matrix_unavailable(self.normalize(id), "no type profile registered"))
    }

    /// Feature profile of a database.
    pub fn feature_profile(&self, id: &str) -> Option<Arc<FeatureProfile>> {
        self.feature_profiles.get(&self.normalize(id)).cloned()
    }

    /// Feature profile of a database, returning an error if missing.
    pub fn require_feature_profile(&self, id: &str) -> Result<Arc<FeatureProfile>> {
        self.feature_profile(id).ok_or_else(|| {
            ConvertError::matrix_unavailable(self.normalize(id), "no feature-support profile registered")
        })
    }

    /// Whether a database supports an object type fully or partially.
    pub fn supports_object(&self, id: &str, object_type: ObjectType) -> bool {
        self.feature_profile(id)
            .map(|profile| profile.supports(object_type))
            .unwrap_or(false)
    }

    /// The paradigm strategy analyzer.
    pub fn analyzer(&self) -> &ParadigmAnalyzer {
        &self.analyzer
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut type_profiles: Vec<_> = self.type_profiles.keys().collect();
        type_profiles.sort();
        let mut feature_profiles: Vec<_> = self.feature_profiles.keys().collect();
        feature_profiles.sort();
        f.debug_struct("Registry")
            .field("databases", &self.database_ids())
            .field("type_profiles", &type_profiles)
            .field("feature_profiles", &feature_profiles)
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::CanonicalType;

    fn partial_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_database(
            DatabaseCapabilities::new("alpha", "Alpha", &[Paradigm::Relational]),
            DatabaseTypeProfile::builder("alpha")
                .ty("integer", CanonicalType::Int32, &["int"])
                .build(),
            FeatureProfile::new("alpha").full(&[ObjectType::Table]),
        );
        registry.register_capabilities(DatabaseCapabilities::new("beta", "Beta", &[Paradigm::Document]));
        registry.register_alias("a", "alpha");
        registry
    }

    #[test]
    fn test_registration_and_lookup() {
        let registry = partial_registry();
        assert!(registry.is_known("alpha"));
        assert!(registry.is_known("  ALPHA "));
        assert!(registry.is_known("a"));
        assert!(!registry.is_known("gamma"));
        assert_eq!(registry.database_ids(), vec!["alpha", "beta"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_profiles_are_matrix_unavailable() {
        let registry = partial_registry();
        assert!(registry.type_profile("beta").is_none());
        let err = registry.require_feature_profile("beta").unwrap_err();
        assert!(matches!(err, ConvertError::MatrixUnavailable { .. }));
    }

    #[test]
    fn test_unknown_database_error() {
        let registry = partial_registry();
        let err = registry.require_capabilities("gamma").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownDatabase(ref id) if id == "gamma"));
    }

    #[test]
    fn test_supports_object() {
        let registry = partial_registry();
        assert!(registry.supports_object("a", ObjectType::Table));
        assert!(!registry.supports_object("alpha", ObjectType::Trigger));
        assert!(!registry.supports_object("beta", ObjectType::Table));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::build();
        assert_eq!(registry.len(), 24);
        for id in registry.database_ids() {
            assert!(registry.type_profile(id).is_some(), "{} lacks a type profile", id);
            assert!(registry.feature_profile(id).is_some(), "{} lacks a feature profile", id);
        }
    }

    #[test]
    fn test_builtin_aliases() {
        let registry = Registry::build();
        assert_eq!(registry.normalize("pg"), "postgresql");
        assert_eq!(registry.normalize("Postgres"), "postgresql");
        assert_eq!(registry.normalize("mssql"), "sqlserver");
        assert_eq!(registry.normalize("mongo"), "mongodb");
        assert_eq!(registry.normalize("es"), "elasticsearch");
    }

    #[test]
    fn test_builtin_paradigm_sets() {
        let registry = Registry::build();
        let set = |p: &[Paradigm]| p.iter().copied().collect::<BTreeSet<_>>();
        assert_eq!(registry.paradigms("postgresql"), Some(&set(&[Paradigm::Relational])));
        assert_eq!(registry.paradigms("mongodb"), Some(&set(&[Paradigm::Document])));
        assert_eq!(
            registry.paradigms("arangodb"),
            Some(&set(&[Paradigm::Graph, Paradigm::Document, Paradigm::KeyValue]))
        );
        assert_eq!(
            registry.paradigms("timescaledb"),
            Some(&set(&[Paradigm::Relational, Paradigm::TimeSeries]))
        );
        assert_eq!(registry.paradigms("s3"), Some(&set(&[Paradigm::ObjectStore])));
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }

    #[test]
    fn test_debug_lists_databases() {
        let debug = format!("{:?}", partial_registry());
        assert!(debug.contains("alpha"));
        assert!(debug.contains("beta"));
    }
}
