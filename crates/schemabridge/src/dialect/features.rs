//! Object-type support per database.
//!
//! A [`FeatureProfile`] records, for one database, whether each abstract
//! object type (table, view, collection, node, ...) is supported fully,
//! partially, or not at all, plus the alternatives a converter can fall
//! back on. The matrix generator turns two profiles into per-object rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Abstract schema object category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Index,
    PrimaryKey,
    ForeignKey,
    UniqueConstraint,
    CheckConstraint,
    Sequence,
    Function,
    Procedure,
    Trigger,
    CustomType,
    Schema,
    Extension,
    User,
    Role,
    Collection,
    Node,
    Relationship,
    Graph,
    Keyspace,
    ColumnFamily,
    SearchIndex,
    VectorIndex,
    Embedding,
    Measurement,
    RetentionPolicy,
    Bucket,
    Stream,
    Partition,
}

impl ObjectType {
    /// Every object type, in declaration order.
    pub const ALL: [ObjectType; 31] = [
        ObjectType::Table,
        ObjectType::View,
        ObjectType::MaterializedView,
        ObjectType::Index,
        ObjectType::PrimaryKey,
        ObjectType::ForeignKey,
        ObjectType::UniqueConstraint,
        ObjectType::CheckConstraint,
        ObjectType::Sequence,
        ObjectType::Function,
        ObjectType::Procedure,
        ObjectType::Trigger,
        ObjectType::CustomType,
        ObjectType::Schema,
        ObjectType::Extension,
        ObjectType::User,
        ObjectType::Role,
        ObjectType::Collection,
        ObjectType::Node,
        ObjectType::Relationship,
        ObjectType::Graph,
        ObjectType::Keyspace,
        ObjectType::ColumnFamily,
        ObjectType::SearchIndex,
        ObjectType::VectorIndex,
        ObjectType::Embedding,
        ObjectType::Measurement,
        ObjectType::RetentionPolicy,
        ObjectType::Bucket,
        ObjectType::Stream,
        ObjectType::Partition,
    ];

    /// Stable string key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "table",
            ObjectType::View => "view",
            ObjectType::MaterializedView => "materialized_view",
            ObjectType::Index => "index",
            ObjectType::PrimaryKey => "primary_key",
            ObjectType::ForeignKey => "foreign_key",
            ObjectType::UniqueConstraint => "unique_constraint",
            ObjectType::CheckConstraint => "check_constraint",
            ObjectType::Sequence => "sequence",
            ObjectType::Function => "function",
            ObjectType::Procedure => "procedure",
            ObjectType::Trigger => "trigger",
            ObjectType::CustomType => "custom_type",
            ObjectType::Schema => "schema",
            ObjectType::Extension => "extension",
            ObjectType::User => "user",
            ObjectType::Role => "role",
            ObjectType::Collection => "collection",
            ObjectType::Node => "node",
            ObjectType::Relationship => "relationship",
            ObjectType::Graph => "graph",
            ObjectType::Keyspace => "keyspace",
            ObjectType::ColumnFamily => "column_family",
            ObjectType::SearchIndex => "search_index",
            ObjectType::VectorIndex => "vector_index",
            ObjectType::Embedding => "embedding",
            ObjectType::Measurement => "measurement",
            ObjectType::RetentionPolicy => "retention_policy",
            ObjectType::Bucket => "bucket",
            ObjectType::Stream => "stream",
            ObjectType::Partition => "partition",
        }
    }

    /// Object types that hold named, typed fields and can therefore host
    /// the objects of another field-bearing type when emulated.
    pub fn is_field_container(&self) -> bool {
        matches!(
            self,
            ObjectType::Table
                | ObjectType::Collection
                | ObjectType::Node
                | ObjectType::Relationship
                | ObjectType::ColumnFamily
                | ObjectType::Measurement
                | ObjectType::Embedding
                | ObjectType::View
                | ObjectType::MaterializedView
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ObjectType::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == key)
            .ok_or_else(|| ConvertError::Config(format!("Unknown object type: '{}'", s)))
    }
}

/// How well a database supports an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SupportState {
    /// Native, complete support.
    Full,
    /// Native support with caveats.
    Partial {
        alternatives: Vec<ObjectType>,
        note: String,
    },
    /// No native support; alternatives may emulate it.
    Unsupported {
        alternatives: Vec<ObjectType>,
        note: String,
    },
}

impl SupportState {
    /// Full or partial support.
    pub fn is_supported(&self) -> bool {
        !matches!(self, SupportState::Unsupported { .. })
    }

    /// Alternatives recorded for this state.
    pub fn alternatives(&self) -> &[ObjectType] {
        match self {
            SupportState::Full => &[],
            SupportState::Partial { alternatives, .. }
            | SupportState::Unsupported { alternatives, .. } => alternatives,
        }
    }

    /// Note recorded for this state.
    pub fn note(&self) -> Option<&str> {
        match self {
            SupportState::Full => None,
            SupportState::Partial { note, .. } | SupportState::Unsupported { note, .. } => {
                Some(note.as_str())
            }
        }
    }
}

/// Conversion preferences a database declares as source or target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPreferences {
    /// Databases that convert into this one with the best results.
    pub preferred_sources: Vec<String>,
    /// Databases this one converts into with the best results.
    pub preferred_targets: Vec<String>,
    /// Requirements a converter must satisfy when targeting this database.
    pub special_requirements: Vec<String>,
    /// Known limitations when targeting this database.
    pub limitations: Vec<String>,
}

/// Object-type support for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProfile {
    /// Registry identifier.
    pub database: String,
    support: BTreeMap<ObjectType, SupportState>,
    /// Conversion preferences.
    pub preferences: ConversionPreferences,
}

impl FeatureProfile {
    /// Create an empty profile.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            support: BTreeMap::new(),
            preferences: ConversionPreferences::default(),
        }
    }

    /// Support state for an object type (None = undefined for this database).
    pub fn support(&self, object_type: ObjectType) -> Option<&SupportState> {
        self.support.get(&object_type)
    }

    /// Whether the object type is supported fully or partially.
    pub fn supports(&self, object_type: ObjectType) -> bool {
        self.support(object_type)
            .map(SupportState::is_supported)
            .unwrap_or(false)
    }

    /// Object types supported fully or partially, in order.
    pub fn supported_types(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.support
            .iter()
            .filter(|(_, state)| state.is_supported())
            .map(|(object_type, _)| *object_type)
    }

    /// All defined entries.
    pub fn entries(&self) -> impl Iterator<Item = (&ObjectType, &SupportState)> {
        self.support.iter()
    }

    /// Mark object types as fully supported.
    pub fn full(mut self, object_types: &[ObjectType]) -> Self {
        for object_type in object_types {
            self.support.insert(*object_type, SupportState::Full);
        }
        self
    }

    /// Mark an object type as partially supported.
    pub fn partial(
        mut self,
        object_type: ObjectType,
        alternatives: &[ObjectType],
        note: impl Into<String>,
    ) -> Self {
        self.support.insert(
            object_type,
            SupportState::Partial {
                alternatives: alternatives.to_vec(),
                note: note.into(),
            },
        );
        self
    }

    /// Mark an object type as unsupported.
    pub fn unsupported(
        mut self,
        object_type: ObjectType,
        alternatives: &[ObjectType],
        note: impl Into<String>,
    ) -> Self {
        self.support.insert(
            object_type,
            SupportState::Unsupported {
                alternatives: alternatives.to_vec(),
                note: note.into(),
            },
        );
        self
    }

    /// Remove an object type entirely (undefined for this database).
    pub fn undefined(mut self, object_type: ObjectType) -> Self {
        self.support.remove(&object_type);
        self
    }

    /// Re-key a baseline profile for a concrete database.
    pub fn for_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set conversion preferences.
    pub fn with_preferences(mut self, preferences: ConversionPreferences) -> Self {
        self.preferences = preferences;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_keys_round_trip() {
        for object_type in ObjectType::ALL {
            assert_eq!(object_type.as_str().parse::<ObjectType>().unwrap(), object_type);
        }
        assert_eq!("Materialized View".parse::<ObjectType>().unwrap(), ObjectType::MaterializedView);
    }

    #[test]
    fn test_support_queries() {
        let profile = FeatureProfile::new("doc")
            .full(&[ObjectType::Collection, ObjectType::Index])
            .partial(ObjectType::View, &[], "read-only aggregation views")
            .unsupported(ObjectType::Table, &[ObjectType::Collection], "rows become documents");

        assert!(profile.supports(ObjectType::Collection));
        assert!(profile.supports(ObjectType::View));
        assert!(!profile.supports(ObjectType::Table));
        assert!(!profile.supports(ObjectType::Trigger));
        assert!(profile.support(ObjectType::Trigger).is_none());

        let table = profile.support(ObjectType::Table).unwrap();
        assert_eq!(table.alternatives(), &[ObjectType::Collection]);
        assert_eq!(table.note(), Some("rows become documents"));

        let supported: Vec<_> = profile.supported_types().collect();
        assert_eq!(supported, vec![ObjectType::View, ObjectType::Index, ObjectType::Collection]);
    }

    #[test]
    fn test_undefined_removes_entry() {
        let profile = FeatureProfile::new("x")
            .full(&[ObjectType::Table])
            .undefined(ObjectType::Table);
        assert!(profile.support(ObjectType::Table).is_none());
    }
}
