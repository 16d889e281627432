//! Vector database profiles.

use super::baseline;
use super::DatabaseDefinition;
use crate::dialect::CanonicalType as C;
use crate::dialect::ObjectType::*;
use crate::dialect::{
    ConstraintSupport, ConversionPreferences, CustomTypeCapabilities, DatabaseTypeProfile,
    NativeImplementation,
};
use crate::paradigm::Paradigm;

pub fn definitions() -> Vec<DatabaseDefinition> {
    vec![pinecone(), milvus(), qdrant()]
}

pub fn pinecone() -> DatabaseDefinition {
    // Metadata value types plus the record vector
    let types = DatabaseTypeProfile::builder("pinecone")
        .ty("string", C::String, &[])
        .ty("number", C::Float64, &[])
        .ty("boolean", C::Boolean, &["bool"])
        .ty("list", C::List, &["list of strings"])
        .sized("vector", C::Vector, Some(20_000), None, &["dense"])
        .ty("sparse", C::Embedding, &["sparse_values"])
        .custom_types(CustomTypeCapabilities {
            arrays: Some(
                NativeImplementation::new("list").with_limitation("lists hold strings only"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::vector()
        .partial(Schema, &[Collection], "namespaces partition an index")
        .unsupported(Index, &[VectorIndex], "metadata is filtered without indexes")
        .with_preferences(ConversionPreferences {
            special_requirements: vec!["the embedding dimension is fixed per index".into()],
            limitations: vec!["metadata is limited to 40 KB per record".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("pinecone", "Pinecone", &[Paradigm::Vector], types, features)
}

pub fn milvus() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("milvus")
        .ty("bool", C::Boolean, &["boolean"])
        .ty("int8", C::Int8, &[])
        .ty("int16", C::Int16, &[])
        .ty("int32", C::Int32, &[])
        .ty("int64", C::Int64, &[])
        .ty("float", C::Float32, &[])
        .ty("double", C::Float64, &[])
        .sized("varchar", C::Varchar, Some(65_535), Some(255), &["string"])
        .ty("json", C::Json, &[])
        .ty("array", C::Array, &[])
        .sized("float_vector", C::Vector, Some(32_768), None, &["float16_vector", "bfloat16_vector"])
        .sized("binary_vector", C::Embedding, Some(32_768), None, &["sparse_float_vector"])
        .custom_types(CustomTypeCapabilities {
            arrays: Some(
                NativeImplementation::new("ARRAY<{element}>")
                    .with_limitation("element types are scalars with a max capacity"),
            ),
            json: Some(NativeImplementation::new("JSON")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            not_null: true,
            default_value: true,
            auto_increment: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::vector()
        .full(&[Schema, User, Role, Partition])
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "pinecone".into()],
            special_requirements: vec!["each collection needs exactly one primary key field".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("milvus", "Milvus", &[Paradigm::Vector], types, features)
}

pub fn qdrant() -> DatabaseDefinition {
    // Payload index schemas plus the point vector
    let types = DatabaseTypeProfile::builder("qdrant")
        .ty("keyword", C::Varchar, &[])
        .ty("text", C::Text, &[])
        .ty("integer", C::Int64, &[])
        .ty("float", C::Float64, &[])
        .ty("bool", C::Boolean, &[])
        .ty("datetime", C::TimestampTz, &[])
        .ty("uuid", C::Uuid, &[])
        .ty("geo", C::Point, &[])
        .ty("object", C::Json, &["payload"])
        .sized("vector", C::Vector, Some(65_536), None, &["dense"])
        .ty("sparse", C::Embedding, &[])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("payload")),
            arrays: Some(NativeImplementation::new("array payload")),
            spatial: Some(
                NativeImplementation::new("geo").with_limitation("points only"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::vector()
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["pinecone".into(), "milvus".into()],
            special_requirements: vec!["point ids must be unsigned integers or UUIDs".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("qdrant", "Qdrant", &[Paradigm::Vector], types, features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_types() {
        for definition in definitions() {
            let profile = &definition.type_profile;
            assert!(profile.has_canonical(C::Vector), "{} has no vector type", profile.database);
            assert!(definition.feature_profile.supports(VectorIndex));
        }
    }

    #[test]
    fn test_milvus_varchar_bound() {
        let milvus = milvus().type_profile;
        let varchar = milvus.type_info("string").unwrap();
        assert_eq!(varchar.name, "varchar");
        assert_eq!(varchar.max_length, Some(65_535));
    }
}
