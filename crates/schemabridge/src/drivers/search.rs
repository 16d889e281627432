//! Search engine profiles.

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
    vec![elasticsearch()]
}

pub fn elasticsearch() -> DatabaseDefinition {
    // Field mapping types
    let types = DatabaseTypeProfile::builder("elasticsearch")
        .ty("boolean", C::Boolean, &[])
        .ty("byte", C::Int8, &[])
        .ty("short", C::Int16, &[])
        .ty("integer", C::Int32, &[])
        .ty("long", C::Int64, &[])
        .ty("unsigned_long", C::UInt64, &[])
        .ty("float", C::Float32, &["half_float"])
        .ty("double", C::Float64, &[])
        .ty("scaled_float", C::Decimal, &[])
        .ty("keyword", C::Varchar, &["constant_keyword", "wildcard"])
        .ty("text", C::Text, &["match_only_text"])
        .ty("binary", C::Binary, &[])
        .ty("date", C::Timestamp, &["date_nanos"])
        .ty("object", C::Object, &["flattened"])
        .ty("nested", C::List, &[])
        .ty("geo_point", C::Point, &[])
        .ty("geo_shape", C::Geometry, &["shape"])
        .sized("dense_vector", C::Vector, Some(4096), None, &[])
        .ty("sparse_vector", C::Embedding, &["rank_features"])
        .ty("integer_range", C::Range, &["long_range", "float_range", "double_range", "date_range", "ip_range"])
        .default_for(C::String, "keyword")
        .custom_types(CustomTypeCapabilities {
            composites: Some(
                NativeImplementation::new("object {name} ({fields})")
                    .with_limitation("object mappings flatten arrays of objects"),
            ),
            json: Some(NativeImplementation::new("object")),
            spatial: Some(NativeImplementation::new("geo_shape")),
            ranges: Some(NativeImplementation::new("{base}_range")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::none())
        .build();

    let features = baseline::search()
        .partial(VectorIndex, &[SearchIndex], "dense_vector fields with HNSW")
        .partial(Embedding, &[SearchIndex], "dense_vector fields")
        .partial(Stream, &[], "data streams for append-only data")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mongodb".into(), "postgresql".into()],
            special_requirements: vec!["text fields need an analyzer choice".into()],
            limitations: vec!["mappings cannot change a field's type in place".into()],
            ..Default::default()
        });

    DatabaseDefinition::new(
        "elasticsearch",
        "Elasticsearch",
        &[Paradigm::SearchIndex, Paradigm::Document],
        types,
        features,
    )
    .with_aliases(&["es", "elastic", "opensearch"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_the_default_string() {
        let es = elasticsearch().type_profile;
        assert_eq!(es.native_name_for(C::String), Some("keyword"));
        assert_eq!(es.native_name_for(C::Text), Some("text"));
        assert_eq!(es.type_info("date_range").unwrap().canonical, C::Range);
    }
}
