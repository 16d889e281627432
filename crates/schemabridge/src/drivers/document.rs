//! Document store profiles.

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
    vec![mongodb(), couchdb()]
}

pub fn mongodb() -> DatabaseDefinition {
    // BSON type names as used by $type and JSON schema validators
    let types = DatabaseTypeProfile::builder("mongodb")
        .ty("bool", C::Boolean, &["boolean"])
        .ty("int32", C::Int32, &["int"])
        .ty("int64", C::Int64, &["long"])
        .ty("double", C::Float64, &["number"])
        .ty("decimal128", C::Decimal, &["decimal"])
        .ty("string", C::String, &["str"])
        .ty("date", C::Timestamp, &["datetime"])
        .ty("bindata", C::Binary, &["binary"])
        .ty("uuid", C::Uuid, &[])
        .ty("objectid", C::Varbinary, &[])
        .ty("object", C::Document, &["document", "embedded"])
        .ty("array", C::Array, &[])
        .ty("point", C::Point, &[])
        .ty("linestring", C::LineString, &[])
        .ty("polygon", C::Polygon, &[])
        .ty("geojson", C::Geometry, &[])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("embedded document")),
            arrays: Some(NativeImplementation::new("array")),
            spatial: Some(
                NativeImplementation::new("GeoJSON object")
                    .with_limitation("coordinates must be WGS84 longitude/latitude"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            unique: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::document()
        .full(&[Stream, Measurement])
        .partial(VectorIndex, &[Index], "vector search indexes require Atlas")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "couchdb".into()],
            preferred_targets: vec!["couchdb".into(), "elasticsearch".into()],
            special_requirements: vec!["every document needs an _id field".into()],
            limitations: vec!["documents are limited to 16 MB".into()],
        });

    DatabaseDefinition::new("mongodb", "MongoDB", &[Paradigm::Document], types, features)
        .with_aliases(&["mongo"])
}

pub fn couchdb() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("couchdb")
        .ty("boolean", C::Boolean, &["bool"])
        .ty("number", C::Float64, &[])
        .ty("string", C::String, &[])
        .ty("object", C::Document, &[])
        .ty("array", C::Array, &[])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("JSON object")),
            arrays: Some(NativeImplementation::new("JSON array")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::document()
        .full(&[View])
        .partial(Index, &[], "Mango indexes")
        .unsupported(SearchIndex, &[View], "search requires an external indexer")
        .unsupported(UniqueConstraint, &[], "only _id is unique")
        .unsupported(CheckConstraint, &[], "validation functions run on update")
        .unsupported(Role, &[User], "per-database member lists")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mongodb".into()],
            limitations: vec!["numbers are IEEE 754 doubles".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("couchdb", "CouchDB", &[Paradigm::Document], types, features)
        .with_aliases(&["couch"])
}
