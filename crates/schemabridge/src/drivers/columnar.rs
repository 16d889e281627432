//! Column-oriented analytical engine profiles.

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
    vec![clickhouse(), duckdb()]
}

pub fn clickhouse() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("clickhouse")
        .ty("bool", C::Boolean, &["boolean"])
        .ty("int8", C::Int8, &["tinyint"])
        .ty("int16", C::Int16, &["smallint"])
        .ty("int32", C::Int32, &["int", "integer"])
        .ty("int64", C::Int64, &["bigint"])
        .ty("uint8", C::UInt8, &[])
        .ty("uint16", C::UInt16, &[])
        .ty("uint32", C::UInt32, &[])
        .ty("uint64", C::UInt64, &[])
        .ty("float32", C::Float32, &["real"])
        .ty("float64", C::Float64, &["double"])
        .numeric("decimal", C::Decimal, Some(76), Some(76), &["numeric"])
        .default_precision("decimal", 10, 0)
        .ty("string", C::String, &["text", "varchar", "blob"])
        .sized("fixedstring", C::Char, None, Some(1), &[])
        .ty("date", C::Date, &["date32"])
        .ty("datetime", C::Timestamp, &[])
        .sized("datetime64", C::TimestampTz, Some(9), Some(3), &[])
        .ty("uuid", C::Uuid, &[])
        .ty("json", C::Json, &["object('json')"])
        .ty("array", C::Array, &[])
        .ty("map", C::Map, &[])
        .ty("tuple", C::Object, &["nested"])
        .ty("enum8", C::Enum, &["enum16", "enum"])
        .ty("point", C::Point, &[])
        .ty("linestring", C::LineString, &["ring"])
        .ty("polygon", C::Polygon, &["multipolygon"])
        .custom_types(CustomTypeCapabilities {
            enums: Some(
                NativeImplementation::new("Enum8({values})")
                    .with_limitation("at most 256 values"),
            ),
            composites: Some(NativeImplementation::new("Tuple({fields})")),
            arrays: Some(NativeImplementation::new("Array({element})")),
            json: Some(NativeImplementation::new("JSON")),
            spatial: Some(NativeImplementation::new("Point")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            check: true,
            default_value: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::columnar()
        .partial(CheckConstraint, &[], "checked on insert only")
        .partial(Embedding, &[Table], "Array(Float32) columns")
        .partial(VectorIndex, &[Index], "experimental vector similarity indexes")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "mysql".into()],
            special_requirements: vec!["every table needs an ORDER BY sorting key".into()],
            limitations: vec!["updates and deletes are asynchronous mutations".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("clickhouse", "ClickHouse", &[Paradigm::Columnar], types, features)
        .with_aliases(&["ch"])
}

pub fn duckdb() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("duckdb")
        .ty("boolean", C::Boolean, &["bool", "logical"])
        .ty("tinyint", C::Int8, &["int1"])
        .ty("smallint", C::Int16, &["int2", "short"])
        .ty("integer", C::Int32, &["int", "int4", "signed"])
        .ty("bigint", C::Int64, &["int8", "long"])
        .ty("utinyint", C::UInt8, &[])
        .ty("usmallint", C::UInt16, &[])
        .ty("uinteger", C::UInt32, &[])
        .ty("ubigint", C::UInt64, &[])
        .ty("float", C::Float32, &["float4", "real"])
        .ty("double", C::Float64, &["float8"])
        .numeric("decimal", C::Decimal, Some(38), Some(38), &["numeric"])
        .default_precision("decimal", 18, 3)
        .sized("varchar", C::Varchar, None, None, &["string", "char", "bpchar", "nvarchar"])
        .ty("text", C::Text, &[])
        .ty("blob", C::Blob, &["bytea", "varbinary"])
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &[])
        .ty("timestamp", C::Timestamp, &["datetime"])
        .ty("timestamptz", C::TimestampTz, &["timestamp with time zone"])
        .ty("interval", C::Interval, &[])
        .ty("uuid", C::Uuid, &[])
        .ty("json", C::Json, &[])
        .ty("struct", C::Object, &[])
        .ty("map", C::Map, &[])
        .ty("list", C::List, &[])
        .sized("array", C::Array, None, None, &[])
        .ty("enum", C::Enum, &[])
        .ty("geometry", C::Geometry, &[])
        .custom_types(CustomTypeCapabilities {
            enums: Some(NativeImplementation::new("CREATE TYPE {name} AS ENUM ({values})")),
            composites: Some(NativeImplementation::new("CREATE TYPE {name} AS STRUCT({fields})")),
            arrays: Some(NativeImplementation::new("{element}[]")),
            json: Some(NativeImplementation::new("JSON").with_limitation("requires the json extension")),
            spatial: Some(
                NativeImplementation::new("GEOMETRY").with_limitation("requires the spatial extension"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
        .build();

    let features = baseline::columnar()
        .full(&[PrimaryKey, ForeignKey, UniqueConstraint, CheckConstraint, Sequence, CustomType, Extension])
        .partial(Index, &[], "ART indexes for point lookups")
        .unsupported(MaterializedView, &[View, Table], "materialize with CREATE TABLE AS")
        .unsupported(Trigger, &[], "no triggers")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "sqlite".into(), "clickhouse".into()],
            limitations: vec!["single-writer embedded engine".into()],
            ..Default::default()
        });

    DatabaseDefinition::new(
        "duckdb",
        "DuckDB",
        &[Paradigm::Columnar, Paradigm::Relational],
        types,
        features,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clickhouse_strings_and_enums() {
        let ch = clickhouse().type_profile;
        assert_eq!(ch.type_info("varchar").unwrap().canonical, C::String);
        assert_eq!(ch.type_info("Enum16").unwrap().name, "enum8");
        assert_eq!(ch.native_name_for(C::UInt32), Some("uint32"));
        let enums = ch.custom_types.enums.as_ref().unwrap();
        assert_eq!(enums.render(&[("values", "'a', 'b'")]), "Enum8('a', 'b')");
    }

    #[test]
    fn test_duckdb_is_relational_too() {
        let duck = duckdb();
        assert!(duck.capabilities.paradigms.contains(&Paradigm::Relational));
        assert!(duck.feature_profile.supports(ForeignKey));
        assert!(!duck.feature_profile.supports(MaterializedView));
        assert_eq!(duck.type_profile.type_info("string").unwrap().name, "varchar");
    }
}
