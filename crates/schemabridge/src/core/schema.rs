//! Database-agnostic schema metadata consumed and produced by the engine.
//!
//! A [`Schema`] holds named containers per object kind (tables,
//! collections, nodes, ...), each holding named fields with a native type
//! string, plus a catalog of custom type descriptors. The engine reads a
//! source schema and returns a new schema of the same shape.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::ObjectType;
use crate::error::{ConvertError, Result};

use super::identifier::validate_identifier;

/// A named field (column, document field, node property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,

    /// Native type spelling, e.g. "varchar(255)" or a custom type name.
    pub data_type: String,

    /// Whether the field accepts NULL/missing values.
    #[serde(default = "default_true")]
    pub nullable: bool,
}

impl Field {
    /// Create a nullable field.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
        }
    }

    /// Mark the field NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// One schema object (table, collection, node label, view, index, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Object name.
    pub name: String,

    /// Typed fields (empty for objects without fields, e.g. sequences).
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Body for views, functions and triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Constraint expressions attached to the object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,

    /// Free-form attributes (index target, relationship endpoints, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl SchemaObject {
    /// Create an object with fields.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    /// Find a field by name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Custom type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomTypeCategory {
    Enum,
    Composite,
    Domain,
    Array,
    Range,
    Spatial,
    Temporal,
    Binary,
    Other,
}

impl std::fmt::Display for CustomTypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CustomTypeCategory::Enum => "enum",
            CustomTypeCategory::Composite => "composite",
            CustomTypeCategory::Domain => "domain",
            CustomTypeCategory::Array => "array",
            CustomTypeCategory::Range => "range",
            CustomTypeCategory::Spatial => "spatial",
            CustomTypeCategory::Temporal => "temporal",
            CustomTypeCategory::Binary => "binary",
            CustomTypeCategory::Other => "other",
        };
        f.write_str(s)
    }
}

/// A field of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeField {
    pub name: String,
    pub data_type: String,
}

impl CompositeField {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Category-specific payload of a custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CustomTypeDefinition {
    Enum {
        values: Vec<String>,
    },
    Composite {
        fields: Vec<CompositeField>,
    },
    Domain {
        base_type: String,
        #[serde(default)]
        constraints: Vec<String>,
    },
    Array {
        element_type: String,
    },
    Range {
        subtype: String,
    },
    Spatial {
        geometry: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        srid: Option<u32>,
    },
    Temporal {
        base_type: String,
    },
    Binary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u64>,
    },
    Other {
        #[serde(default)]
        definition: String,
    },
}

/// A user-defined type from the source schema's type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeDescriptor {
    /// Type name as referenced by fields.
    pub name: String,

    /// Category and payload.
    #[serde(flatten)]
    pub definition: CustomTypeDefinition,
}

impl CustomTypeDescriptor {
    /// Create an enum descriptor.
    pub fn enumeration(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            definition: CustomTypeDefinition::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    /// Create a composite descriptor.
    pub fn composite(name: impl Into<String>, fields: Vec<CompositeField>) -> Self {
        Self {
            name: name.into(),
            definition: CustomTypeDefinition::Composite { fields },
        }
    }

    /// Create a domain descriptor.
    pub fn domain(name: impl Into<String>, base_type: impl Into<String>, constraints: &[&str]) -> Self {
        Self {
            name: name.into(),
            definition: CustomTypeDefinition::Domain {
                base_type: base_type.into(),
                constraints: constraints.iter().map(|c| c.to_string()).collect(),
            },
        }
    }

    /// Create an array descriptor.
    pub fn array(name: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: CustomTypeDefinition::Array {
                element_type: element_type.into(),
            },
        }
    }

    /// The descriptor's category.
    pub fn category(&self) -> CustomTypeCategory {
        match &self.definition {
            CustomTypeDefinition::Enum { .. } => CustomTypeCategory::Enum,
            CustomTypeDefinition::Composite { .. } => CustomTypeCategory::Composite,
            CustomTypeDefinition::Domain { .. } => CustomTypeCategory::Domain,
            CustomTypeDefinition::Array { .. } => CustomTypeCategory::Array,
            CustomTypeDefinition::Range { .. } => CustomTypeCategory::Range,
            CustomTypeDefinition::Spatial { .. } => CustomTypeCategory::Spatial,
            CustomTypeDefinition::Temporal { .. } => CustomTypeCategory::Temporal,
            CustomTypeDefinition::Binary { .. } => CustomTypeCategory::Binary,
            CustomTypeDefinition::Other { .. } => CustomTypeCategory::Other,
        }
    }

    /// Validate the payload shape.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.name)
            .map_err(|e| ConvertError::invalid_custom_type(&self.name, e.to_string()))?;

        match &self.definition {
            CustomTypeDefinition::Enum { values } => {
                if values.is_empty() {
                    return Err(ConvertError::invalid_custom_type(&self.name, "enum has no values"));
                }
                let mut seen = HashSet::new();
                if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
                    return Err(ConvertError::invalid_custom_type(
                        &self.name,
                        format!("duplicate enum value '{}'", dup),
                    ));
                }
            }
            CustomTypeDefinition::Composite { fields } => {
                if fields.is_empty() {
                    return Err(ConvertError::invalid_custom_type(&self.name, "composite has no fields"));
                }
                let mut seen = HashSet::new();
                for field in fields {
                    if field.name.trim().is_empty() || field.data_type.trim().is_empty() {
                        return Err(ConvertError::invalid_custom_type(
                            &self.name,
                            "composite field with empty name or type",
                        ));
                    }
                    if !seen.insert(field.name.to_lowercase()) {
                        return Err(ConvertError::invalid_custom_type(
                            &self.name,
                            format!("duplicate composite field '{}'", field.name),
                        ));
                    }
                }
            }
            CustomTypeDefinition::Domain { base_type, .. } if base_type.trim().is_empty() => {
                return Err(ConvertError::invalid_custom_type(&self.name, "domain has no base type"));
            }
            CustomTypeDefinition::Array { element_type } if element_type.trim().is_empty() => {
                return Err(ConvertError::invalid_custom_type(&self.name, "array has no element type"));
            }
            CustomTypeDefinition::Range { subtype } if subtype.trim().is_empty() => {
                return Err(ConvertError::invalid_custom_type(&self.name, "range has no subtype"));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Object kinds that have a container in [`Schema`], in processing order.
pub const CONTAINER_KINDS: [ObjectType; 17] = [
    ObjectType::Table,
    ObjectType::Collection,
    ObjectType::Node,
    ObjectType::Relationship,
    ObjectType::ColumnFamily,
    ObjectType::Keyspace,
    ObjectType::Measurement,
    ObjectType::SearchIndex,
    ObjectType::VectorIndex,
    ObjectType::Bucket,
    ObjectType::View,
    ObjectType::MaterializedView,
    ObjectType::Index,
    ObjectType::Sequence,
    ObjectType::Function,
    ObjectType::Procedure,
    ObjectType::Trigger,
];

/// Database-agnostic schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema (database) name.
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_families: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyspaces: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurements: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_indexes: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector_indexes: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materialized_views: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<SchemaObject>,

    /// Custom type catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<CustomTypeDescriptor>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Load a schema from a JSON or YAML file (by extension), validating it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse and validate a JSON schema document.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse and validate a YAML schema document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let schema: Schema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Validate identifiers and custom type payloads.
    pub fn validate(&self) -> Result<()> {
        for kind in CONTAINER_KINDS {
            for object in self.objects(kind) {
                validate_identifier(&object.name)?;
                for field in &object.fields {
                    validate_identifier(&field.name)?;
                }
            }
        }

        let mut names = HashSet::new();
        for descriptor in &self.types {
            descriptor.validate()?;
            if !names.insert(descriptor.name.to_lowercase()) {
                return Err(ConvertError::invalid_custom_type(
                    &descriptor.name,
                    "defined more than once",
                ));
            }
        }
        Ok(())
    }

    /// Objects of one container kind (empty for kinds without a container).
    pub fn objects(&self, kind: ObjectType) -> &[SchemaObject] {
        match kind {
            ObjectType::Table => &self.tables,
            ObjectType::Collection => &self.collections,
            ObjectType::Node => &self.nodes,
            ObjectType::Relationship => &self.relationships,
            ObjectType::ColumnFamily => &self.column_families,
            ObjectType::Keyspace => &self.keyspaces,
            ObjectType::Measurement => &self.measurements,
            ObjectType::SearchIndex => &self.search_indexes,
            ObjectType::VectorIndex => &self.vector_indexes,
            ObjectType::Bucket => &self.buckets,
            ObjectType::View => &self.views,
            ObjectType::MaterializedView => &self.materialized_views,
            ObjectType::Index => &self.indexes,
            ObjectType::Sequence => &self.sequences,
            ObjectType::Function => &self.functions,
            ObjectType::Procedure => &self.procedures,
            ObjectType::Trigger => &self.triggers,
            _ => &[],
        }
    }

    /// Mutable container for a kind, if the schema has one.
    pub fn objects_mut(&mut self, kind: ObjectType) -> Option<&mut Vec<SchemaObject>> {
        match kind {
            ObjectType::Table => Some(&mut self.tables),
            ObjectType::Collection => Some(&mut self.collections),
            ObjectType::Node => Some(&mut self.nodes),
            ObjectType::Relationship => Some(&mut self.relationships),
            ObjectType::ColumnFamily => Some(&mut self.column_families),
            ObjectType::Keyspace => Some(&mut self.keyspaces),
            ObjectType::Measurement => Some(&mut self.measurements),
            ObjectType::SearchIndex => Some(&mut self.search_indexes),
            ObjectType::VectorIndex => Some(&mut self.vector_indexes),
            ObjectType::Bucket => Some(&mut self.buckets),
            ObjectType::View => Some(&mut self.views),
            ObjectType::MaterializedView => Some(&mut self.materialized_views),
            ObjectType::Index => Some(&mut self.indexes),
            ObjectType::Sequence => Some(&mut self.sequences),
            ObjectType::Function => Some(&mut self.functions),
            ObjectType::Procedure => Some(&mut self.procedures),
            ObjectType::Trigger => Some(&mut self.triggers),
            _ => None,
        }
    }

    /// Count of objects per kind, omitting empty kinds.
    pub fn object_counts(&self) -> BTreeMap<ObjectType, usize> {
        let mut counts: BTreeMap<ObjectType, usize> = CONTAINER_KINDS
            .iter()
            .map(|kind| (*kind, self.objects(*kind).len()))
            .filter(|(_, count)| *count > 0)
            .collect();
        if !self.types.is_empty() {
            counts.insert(ObjectType::CustomType, self.types.len());
        }
        counts
    }

    /// Total number of objects, custom types included.
    pub fn total_objects(&self) -> usize {
        self.object_counts().values().sum()
    }

    /// Find a custom type by name (case-insensitive).
    pub fn custom_type(&self, name: &str) -> Option<&CustomTypeDescriptor> {
        let name = name.trim();
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new("shop");
        schema.tables.push(SchemaObject::new(
            "users",
            vec![
                Field::new("id", "integer").not_null(),
                Field::new("email", "varchar(255)"),
                Field::new("status", "user_status"),
            ],
        ));
        schema.views.push(SchemaObject {
            name: "active_users".into(),
            definition: Some("SELECT * FROM users WHERE status = 'active'".into()),
            ..Default::default()
        });
        schema.types.push(CustomTypeDescriptor::enumeration(
            "user_status",
            &["active", "inactive", "pending"],
        ));
        schema
    }

    #[test]
    fn test_object_counts() {
        let schema = sample_schema();
        let counts = schema.object_counts();
        assert_eq!(counts.get(&ObjectType::Table), Some(&1));
        assert_eq!(counts.get(&ObjectType::View), Some(&1));
        assert_eq!(counts.get(&ObjectType::CustomType), Some(&1));
        assert_eq!(counts.get(&ObjectType::Collection), None);
        assert_eq!(schema.total_objects(), 3);
    }

    #[test]
    fn test_custom_type_lookup_is_case_insensitive() {
        let schema = sample_schema();
        assert!(schema.custom_type("USER_STATUS").is_some());
        assert!(schema.custom_type("integer").is_none());
    }

    #[test]
    fn test_descriptor_json_is_tagged_by_category() {
        let json = r#"{"name":"address","category":"composite",
            "fields":[{"name":"street","data_type":"text"},{"name":"zip","data_type":"varchar(10)"}]}"#;
        let descriptor: CustomTypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.category(), CustomTypeCategory::Composite);
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_descriptor_validation_rejects_malformed_payloads() {
        assert!(CustomTypeDescriptor::enumeration("empty", &[]).validate().is_err());
        assert!(CustomTypeDescriptor::enumeration("dup", &["a", "a"]).validate().is_err());
        assert!(CustomTypeDescriptor::composite("c", vec![]).validate().is_err());
        assert!(CustomTypeDescriptor::composite(
            "c",
            vec![CompositeField::new("x", "int"), CompositeField::new("X", "int")]
        )
        .validate()
        .is_err());
        assert!(CustomTypeDescriptor::array("a", " ").validate().is_err());
    }

    #[test]
    fn test_schema_from_yaml_validates() {
        let yaml = r#"
name: shop
tables:
  - name: users
    fields:
      - { name: id, data_type: integer, nullable: false }
types:
  - { name: mood, category: enum, values: [] }
"#;
        let err = Schema::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCustomType { .. }));
    }

    #[test]
    fn test_schema_json_round_trip_keeps_shape() {
        let schema = sample_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let back = Schema::from_json(&json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, serde_json::to_string(&sample_schema()).unwrap()).unwrap();
        let loaded = Schema::load(&path).unwrap();
        assert_eq!(loaded.tables[0].name, "users");
    }
}
