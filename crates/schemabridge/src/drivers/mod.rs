//! Built-in database profiles.
//!
//! Each module contributes the databases of one data-model family:
//!
//! - [`relational`]: PostgreSQL, MySQL, MariaDB, SQL Server, Oracle, SQLite, CockroachDB
//! - [`document`]: MongoDB, CouchDB
//! - [`keyvalue`]: DynamoDB, Redis
//! - [`graph`]: Neo4j, ArangoDB
//! - [`columnar`]: ClickHouse, DuckDB
//! - [`widecolumn`]: Cassandra, HBase
//! - [`search`]: Elasticsearch
//! - [`vector`]: Pinecone, Milvus, Qdrant
//! - [`timeseries`]: InfluxDB, TimescaleDB
//! - [`objectstore`]: S3
//!
//! # Adding New Databases
//!
//! 1. Write a factory returning a [`DatabaseDefinition`] in the module of
//!    its family (start from the paradigm baseline in [`baseline`])
//! 2. Add it to that module's `definitions()`
//!
//! No resolver, matrix or engine code changes.

pub mod baseline;
pub mod columnar;
pub mod document;
pub mod graph;
pub mod keyvalue;
pub mod objectstore;
pub mod relational;
pub mod search;
pub mod timeseries;
pub mod vector;
pub mod widecolumn;

use crate::core::{DatabaseCapabilities, Registry};
use crate::dialect::{DatabaseTypeProfile, FeatureProfile};
use crate::paradigm::Paradigm;

/// Everything the registry needs to know about one database.
#[derive(Debug, Clone)]
pub struct DatabaseDefinition {
    pub capabilities: DatabaseCapabilities,
    pub type_profile: DatabaseTypeProfile,
    pub feature_profile: FeatureProfile,
    pub aliases: Vec<&'static str>,
}

impl DatabaseDefinition {
    /// Create a definition. The feature profile is re-keyed to `id`.
    pub fn new(
        id: &str,
        display_name: &str,
        paradigms: &[Paradigm],
        type_profile: DatabaseTypeProfile,
        feature_profile: FeatureProfile,
    ) -> Self {
        Self {
            capabilities: DatabaseCapabilities::new(id, display_name, paradigms),
            type_profile,
            feature_profile: feature_profile.for_database(id),
            aliases: Vec::new(),
        }
    }

    /// Add alternative identifiers.
    pub fn with_aliases(mut self, aliases: &[&'static str]) -> Self {
        self.aliases.extend_from_slice(aliases);
        self
    }
}

/// Every built-in database definition.
pub fn builtin_definitions() -> Vec<DatabaseDefinition> {
    let mut definitions = Vec::new();
    definitions.extend(relational::definitions());
    definitions.extend(document::definitions());
    definitions.extend(keyvalue::definitions());
    definitions.extend(graph::definitions());
    definitions.extend(columnar::definitions());
    definitions.extend(widecolumn::definitions());
    definitions.extend(search::definitions());
    definitions.extend(vector::definitions());
    definitions.extend(timeseries::definitions());
    definitions.extend(objectstore::definitions());
    definitions
}

/// Register every built-in database and its aliases.
pub fn register_builtins(registry: &mut Registry) {
    for definition in builtin_definitions() {
        let id = definition.capabilities.id.clone();
        for alias in &definition.aliases {
            registry.register_alias(*alias, &id);
        }
        registry.register_database(
            definition.capabilities,
            definition.type_profile,
            definition.feature_profile,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CanonicalType, ObjectType};
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_aliases_are_unique() {
        let definitions = builtin_definitions();
        let mut names = HashSet::new();
        for definition in &definitions {
            assert!(names.insert(definition.capabilities.id.clone()), "duplicate id {}", definition.capabilities.id);
            for alias in &definition.aliases {
                assert!(names.insert(alias.to_string()), "duplicate alias {}", alias);
            }
        }
        assert_eq!(definitions.len(), 24);
    }

    #[test]
    fn test_profiles_are_keyed_by_their_database() {
        for definition in builtin_definitions() {
            let id = &definition.capabilities.id;
            assert_eq!(&definition.type_profile.database, id);
            assert_eq!(&definition.feature_profile.database, id);
            assert!(!definition.capabilities.paradigms.is_empty(), "{} has no paradigm", id);
        }
    }

    #[test]
    fn test_every_database_can_hold_text() {
        for definition in builtin_definitions() {
            let profile = &definition.type_profile;
            assert!(profile.type_count() > 0, "{} has no types", profile.database);
            assert!(
                profile.has_canonical(CanonicalType::String)
                    || profile.has_canonical(CanonicalType::Text)
                    || profile.has_canonical(CanonicalType::Varchar),
                "{} has no string type",
                profile.database
            );
        }
    }

    #[test]
    fn test_alias_spellings_resolve_to_their_entry() {
        for definition in builtin_definitions() {
            let profile = &definition.type_profile;
            for info in profile.types() {
                for alias in &info.aliases {
                    let resolved = profile.type_info(alias).unwrap();
                    assert_eq!(resolved.canonical, info.canonical, "{}: alias {}", profile.database, alias);
                }
            }
        }
    }

    #[test]
    fn test_every_database_supports_some_container() {
        for definition in builtin_definitions() {
            let features = &definition.feature_profile;
            assert!(
                crate::core::CONTAINER_KINDS.iter().any(|kind| features.supports(*kind)),
                "{} supports no container kind",
                features.database
            );
        }
    }

    #[test]
    fn test_emulation_alternatives_are_supported_by_the_database() {
        for definition in builtin_definitions() {
            let features = &definition.feature_profile;
            for (object_type, state) in features.entries() {
                for alternative in state.alternatives() {
                    assert!(
                        features.supports(*alternative),
                        "{}: {} alternative {} is not supported",
                        features.database,
                        object_type,
                        alternative
                    );
                }
            }
        }
    }

    #[test]
    fn test_mysql_enum_and_postgres_custom_types() {
        let definitions = builtin_definitions();
        let find = |id: &str| {
            definitions
                .iter()
                .find(|d| d.capabilities.id == id)
                .unwrap()
        };
        let mysql = find("mysql");
        assert!(mysql.type_profile.custom_types.supports_enum());
        assert!(mysql.type_profile.constraints.check);

        let postgres = find("postgresql");
        assert!(postgres.type_profile.custom_types.supports_composite());
        assert!(postgres.type_profile.custom_types.supports_domain());
        assert!(postgres.feature_profile.supports(ObjectType::Extension));

        let mongo = find("mongodb");
        assert!(!mongo.type_profile.custom_types.supports_enum());
        assert!(!mongo.type_profile.constraints.check);
    }
}
