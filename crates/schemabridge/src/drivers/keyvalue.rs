//! Key-value store profiles.

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
    vec![dynamodb(), redis()]
}

pub fn dynamodb() -> DatabaseDefinition {
    // Attribute type descriptors
    let types = DatabaseTypeProfile::builder("dynamodb")
        .ty("s", C::String, &["string"])
        .ty("n", C::Decimal, &["number"])
        .ty("b", C::Binary, &["binary"])
        .ty("bool", C::Boolean, &["boolean"])
        .ty("m", C::Map, &["map"])
        .ty("l", C::List, &["list"])
        .ty("ss", C::Set, &["string set", "ns", "bs"])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("M").with_limitation("items are limited to 400 KB")),
            arrays: Some(NativeImplementation::new("L")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::keyvalue()
        .full(&[Table, PrimaryKey, Stream])
        .partial(Index, &[], "global and local secondary indexes")
        .unsupported(Collection, &[Table], "documents become items")
        .unsupported(Keyspace, &[Table], "a keyspace maps to a table")
        .unsupported(Trigger, &[Stream], "stream consumers replace triggers")
        .unsupported(Node, &[Table], "nodes become items in an adjacency list")
        .unsupported(Measurement, &[Table], "points become items keyed by series and time")
        .unsupported(ColumnFamily, &[Table], "column families become tables")
        .unsupported(Schema, &[], "no schema namespace")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mongodb".into(), "cassandra".into()],
            special_requirements: vec!["access patterns must be known to design keys".into()],
            limitations: vec!["items are limited to 400 KB".into()],
            ..Default::default()
        });

    DatabaseDefinition::new(
        "dynamodb",
        "Amazon DynamoDB",
        &[Paradigm::KeyValue, Paradigm::Document],
        types,
        features,
    )
    .with_aliases(&["dynamo", "ddb"])
}

pub fn redis() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("redis")
        .ty("string", C::String, &["str"])
        .ty("integer", C::Int64, &["int"])
        .ty("hash", C::Map, &[])
        .ty("list", C::List, &[])
        .ty("set", C::Set, &["zset", "sorted set"])
        .ty("json", C::Json, &["rejson"])
        .sized("vector", C::Vector, Some(32_768), None, &[])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("JSON").with_limitation("requires the RedisJSON module")),
            arrays: Some(NativeImplementation::new("LIST")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::none())
        .build();

    let features = baseline::keyvalue()
        .full(&[Stream, User])
        .partial(SearchIndex, &[Keyspace], "requires the search module")
        .partial(VectorIndex, &[Keyspace], "requires the search module")
        .with_preferences(ConversionPreferences {
            special_requirements: vec!["the dataset must fit in memory".into()],
            limitations: vec!["values are limited to 512 MB".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("redis", "Redis", &[Paradigm::KeyValue], types, features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamodb_numbers_are_decimal() {
        let dynamo = dynamodb().type_profile;
        assert_eq!(dynamo.type_info("N").unwrap().canonical, C::Decimal);
        assert_eq!(dynamo.type_info("number").unwrap().name, "n");
    }

    #[test]
    fn test_redis_structures() {
        let redis = redis().type_profile;
        assert_eq!(redis.type_info("zset").unwrap().canonical, C::Set);
        assert_eq!(redis.native_name_for(C::Map), Some("hash"));
    }
}
