//! Graph database profiles.

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
    vec![neo4j(), arangodb()]
}

pub fn neo4j() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("neo4j")
        .ty("boolean", C::Boolean, &[])
        .ty("integer", C::Int64, &["int", "long"])
        .ty("float", C::Float64, &["double"])
        .ty("string", C::String, &[])
        .ty("bytearray", C::Binary, &["byte[]"])
        .ty("date", C::Date, &[])
        .ty("local time", C::Time, &["time", "zoned time"])
        .ty("local datetime", C::Timestamp, &["localdatetime"])
        .ty("zoned datetime", C::TimestampTz, &["datetime"])
        .ty("duration", C::Interval, &[])
        .ty("point", C::Point, &[])
        .ty("list", C::List, &[])
        .ty("map", C::Map, &[])
        .ty("node", C::GraphNode, &[])
        .ty("relationship", C::GraphEdge, &[])
        .ty("path", C::GraphRelation, &[])
        .sized("vector", C::Vector, Some(4096), None, &[])
        .custom_types(CustomTypeCapabilities {
            arrays: Some(
                NativeImplementation::new("LIST<{element}>")
                    .with_limitation("lists hold a single primitive type"),
            ),
            spatial: Some(
                NativeImplementation::new("POINT").with_limitation("points only, no polygons"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            unique: true,
            not_null: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::graph()
        .partial(VectorIndex, &[Index], "vector indexes on node properties")
        .unsupported(Embedding, &[Node], "vectors stored as node properties")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "arangodb".into()],
            special_requirements: vec!["relationship types must be chosen for foreign keys".into()],
            limitations: vec!["properties cannot hold nested maps".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("neo4j", "Neo4j", &[Paradigm::Graph], types, features)
}

pub fn arangodb() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("arangodb")
        .ty("bool", C::Boolean, &["boolean"])
        .ty("number", C::Float64, &[])
        .ty("string", C::String, &[])
        .ty("object", C::Document, &[])
        .ty("array", C::Array, &[])
        .ty("vertex", C::GraphNode, &[])
        .ty("edge", C::GraphEdge, &[])
        .ty("geojson", C::Geometry, &[])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("object")),
            arrays: Some(NativeImplementation::new("array")),
            spatial: Some(NativeImplementation::new("GeoJSON")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            unique: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::graph()
        .full(&[Collection, Keyspace, View])
        .partial(CheckConstraint, &[], "collection schema validation")
        .unsupported(Table, &[Collection], "rows become documents")
        .unsupported(Measurement, &[Collection], "points become documents")
        .unsupported(ColumnFamily, &[Collection], "rows become documents")
        .unsupported(Embedding, &[Collection], "vectors stored as array attributes")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mongodb".into(), "neo4j".into()],
            ..Default::default()
        });

    DatabaseDefinition::new(
        "arangodb",
        "ArangoDB",
        &[Paradigm::Graph, Paradigm::Document, Paradigm::KeyValue],
        types,
        features,
    )
    .with_aliases(&["arango"])
}
