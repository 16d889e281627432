//! Wide-column store profiles.

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
    vec![cassandra(), hbase()]
}

pub fn cassandra() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("cassandra")
        .ty("boolean", C::Boolean, &[])
        .ty("tinyint", C::Int8, &[])
        .ty("smallint", C::Int16, &[])
        .ty("int", C::Int32, &[])
        .ty("bigint", C::Int64, &["counter", "varint"])
        .ty("float", C::Float32, &[])
        .ty("double", C::Float64, &[])
        .ty("decimal", C::Decimal, &[])
        .ty("text", C::Text, &["varchar", "ascii"])
        .ty("blob", C::Blob, &[])
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &[])
        .ty("timestamp", C::TimestampTz, &[])
        .ty("duration", C::Interval, &[])
        .ty("uuid", C::Uuid, &["timeuuid"])
        .ty("list", C::List, &[])
        .ty("set", C::Set, &[])
        .ty("map", C::Map, &[])
        .ty("tuple", C::Object, &[])
        .sized("vector", C::Vector, Some(8192), None, &[])
        .custom_types(CustomTypeCapabilities {
            composites: Some(
                NativeImplementation::new("CREATE TYPE {name} ({fields})")
                    .with_limitation("nested UDT columns must be frozen"),
            ),
            arrays: Some(NativeImplementation::new("list<{element}>")),
            ..Default::default()
        })
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::widecolumn()
        .full(&[Table, CustomType, MaterializedView])
        .partial(SearchIndex, &[Index], "SASI and storage-attached indexes")
        .partial(VectorIndex, &[Index], "storage-attached vector indexes")
        .partial(Function, &[], "user-defined functions are disabled by default")
        .partial(Embedding, &[Table], "vector columns")
        .unsupported(Collection, &[Table], "documents become rows with frozen UDT columns")
        .unsupported(Node, &[Table], "nodes become rows")
        .unsupported(Relationship, &[Table], "relationships become query tables")
        .unsupported(Measurement, &[Table], "points become clustered rows")
        .unsupported(Trigger, &[], "triggers require server-side Java classes")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "dynamodb".into()],
            special_requirements: vec!["partition and clustering keys must be chosen per query".into()],
            limitations: vec!["no joins".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("cassandra", "Apache Cassandra", &[Paradigm::WideColumn], types, features)
        .with_aliases(&["cql", "scylladb"])
}

pub fn hbase() -> DatabaseDefinition {
    // HBase stores bytes; these are the Bytes utility encodings
    let types = DatabaseTypeProfile::builder("hbase")
        .ty("bytes", C::Binary, &["byte[]"])
        .ty("string", C::String, &[])
        .ty("boolean", C::Boolean, &[])
        .ty("short", C::Int16, &[])
        .ty("int", C::Int32, &["integer"])
        .ty("long", C::Int64, &[])
        .ty("float", C::Float32, &[])
        .ty("double", C::Float64, &[])
        .ty("bigdecimal", C::Decimal, &[])
        .constraints(ConstraintSupport {
            primary_key: true,
            ..ConstraintSupport::none()
        })
        .build();

    let features = baseline::widecolumn()
        .unsupported(Index, &[ColumnFamily], "secondary indexes are maintained as extra tables")
        .unsupported(Role, &[User], "ACLs are granted to users and groups")
        .with_preferences(ConversionPreferences {
            special_requirements: vec!["row keys must be designed to avoid hotspots".into()],
            limitations: vec!["values are untyped byte arrays".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("hbase", "Apache HBase", &[Paradigm::WideColumn], types, features)
}
