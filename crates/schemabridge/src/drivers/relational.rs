//! Relational database profiles.

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
    vec![
        postgresql(),
        mysql(),
        mariadb(),
        sqlserver(),
        oracle(),
        sqlite(),
        cockroachdb(),
    ]
}

/// Custom-type support shared by PostgreSQL and its derivatives.
pub(crate) fn postgres_custom_types() -> CustomTypeCapabilities {
    CustomTypeCapabilities {
        enums: Some(NativeImplementation::new("CREATE TYPE {name} AS ENUM ({values})")),
        composites: Some(NativeImplementation::new("CREATE TYPE {name} AS ({fields})")),
        domains: Some(NativeImplementation::new("CREATE DOMAIN {name} AS {base}{checks}")),
        arrays: Some(NativeImplementation::new("{element}[]")),
        ranges: Some(NativeImplementation::new("CREATE TYPE {name} AS RANGE (subtype = {base})")),
        json: Some(NativeImplementation::new("JSONB")),
        xml: Some(NativeImplementation::new("XML")),
        spatial: Some(
            NativeImplementation::new("geometry").with_limitation("requires the PostGIS extension"),
        ),
    }
}

/// Type table shared by PostgreSQL and its derivatives.
pub(crate) fn postgres_types(database: &str) -> DatabaseTypeProfile {
    DatabaseTypeProfile::builder(database)
        .ty("boolean", C::Boolean, &["bool"])
        .ty("smallint", C::Int16, &["int2", "smallserial", "serial2"])
        .ty("integer", C::Int32, &["int", "int4", "serial", "serial4"])
        .ty("bigint", C::Int64, &["int8", "bigserial", "serial8"])
        .ty("real", C::Float32, &["float4"])
        .ty("double precision", C::Float64, &["float8", "float"])
        .numeric("numeric", C::Numeric, Some(1000), Some(1000), &[])
        .numeric("decimal", C::Decimal, Some(1000), Some(1000), &[])
        .ty("money", C::Money, &[])
        .sized("varchar", C::Varchar, Some(10_485_760), None, &["character varying"])
        .sized("char", C::Char, Some(10_485_760), Some(1), &["character", "bpchar"])
        .ty("text", C::Text, &["citext", "name"])
        .ty("bytea", C::Binary, &[])
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &["time without time zone", "timetz", "time with time zone"])
        .ty("timestamp", C::Timestamp, &["timestamp without time zone"])
        .ty("timestamptz", C::TimestampTz, &["timestamp with time zone"])
        .ty("interval", C::Interval, &[])
        .ty("uuid", C::Uuid, &[])
        .ty("json", C::Json, &[])
        .ty("jsonb", C::Json, &[])
        .ty("xml", C::Xml, &[])
        .ty("hstore", C::Map, &[])
        .ty("point", C::Point, &[])
        .ty("path", C::LineString, &[])
        .ty("polygon", C::Polygon, &[])
        .ty("geometry", C::Geometry, &[])
        .ty("geography", C::Geography, &[])
        .sized("vector", C::Vector, Some(16_000), None, &[])
        .ty(
            "int4range",
            C::Range,
            &["int8range", "numrange", "tsrange", "tstzrange", "daterange"],
        )
        .default_for(C::Json, "jsonb")
        .custom_types(postgres_custom_types())
        .constraints(ConstraintSupport::relational())
        .build()
}

pub fn postgresql() -> DatabaseDefinition {
    let features = baseline::relational()
        .full(&[MaterializedView, CustomType, Extension, Partition])
        .partial(VectorIndex, &[Index], "requires the pgvector extension")
        .partial(SearchIndex, &[Index], "tsvector columns with GIN indexes")
        .partial(Embedding, &[Table], "vector columns through pgvector")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mysql".into(), "sqlserver".into(), "oracle".into()],
            preferred_targets: vec!["cockroachdb".into(), "timescaledb".into(), "mysql".into()],
            special_requirements: Vec::new(),
            limitations: vec!["identifiers longer than 63 bytes are truncated".into()],
        });

    DatabaseDefinition::new(
        "postgresql",
        "PostgreSQL",
        &[Paradigm::Relational],
        postgres_types("postgresql"),
        features,
    )
    .with_aliases(&["postgres", "pg", "pgsql"])
}

fn mysql_types(database: &str) -> crate::dialect::TypeProfileBuilder {
    DatabaseTypeProfile::builder(database)
        .ty("boolean", C::Boolean, &["bool"])
        .unsigned_int("tinyint", C::Int8, &["int1"])
        .unsigned_int("smallint", C::Int16, &["int2"])
        .unsigned_int("mediumint", C::Int32, &["int3"])
        .unsigned_int("int", C::Int32, &["integer", "int4"])
        .unsigned_int("bigint", C::Int64, &["int8"])
        .ty("float", C::Float32, &["float4"])
        .ty("double", C::Float64, &["double precision", "real", "float8"])
        .numeric("decimal", C::Decimal, Some(65), Some(30), &["numeric", "dec", "fixed"])
        .default_precision("decimal", 10, 0)
        .sized("char", C::Char, Some(255), Some(1), &["character", "nchar"])
        .sized("varchar", C::Varchar, Some(65_535), Some(255), &["character varying", "nvarchar"])
        .bounded("tinytext", C::Text, 255)
        .bounded("text", C::Text, 65_535)
        .bounded("mediumtext", C::Text, 16_777_215)
        .bounded("longtext", C::Text, 4_294_967_295)
        .sized("binary", C::Binary, Some(255), Some(1), &[])
        .sized("varbinary", C::Varbinary, Some(65_535), Some(255), &[])
        .bounded("tinyblob", C::Blob, 255)
        .bounded("blob", C::Blob, 65_535)
        .bounded("mediumblob", C::Blob, 16_777_215)
        .bounded("longblob", C::Blob, 4_294_967_295)
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &[])
        .ty("datetime", C::Timestamp, &[])
        .ty("timestamp", C::TimestampTz, &[])
        .ty("year", C::Int16, &[])
        .ty("json", C::Json, &[])
        .ty("enum", C::Enum, &[])
        .ty("set", C::Set, &[])
        .ty("geometry", C::Geometry, &["geometrycollection"])
        .ty("point", C::Point, &[])
        .ty("linestring", C::LineString, &[])
        .ty("polygon", C::Polygon, &["multipolygon"])
        .default_for(C::Int32, "int")
        .default_for(C::Int16, "smallint")
        .default_for(C::Text, "longtext")
        .default_for(C::Blob, "longblob")
        .custom_types(CustomTypeCapabilities {
            enums: Some(
                NativeImplementation::new("ENUM({values})")
                    .with_limitation("declared inline per column"),
            ),
            json: Some(NativeImplementation::new("JSON")),
            spatial: Some(NativeImplementation::new("GEOMETRY")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
}

pub fn mysql() -> DatabaseDefinition {
    let features = baseline::relational()
        .unsupported(Sequence, &[], "AUTO_INCREMENT columns replace sequences")
        .unsupported(MaterializedView, &[View, Table], "no materialized views")
        .unsupported(CustomType, &[CheckConstraint], "only inline ENUM and SET types")
        .partial(SearchIndex, &[Index], "FULLTEXT indexes")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mariadb".into(), "postgresql".into()],
            preferred_targets: vec!["mariadb".into(), "postgresql".into()],
            special_requirements: vec!["InnoDB engine for foreign keys".into()],
            limitations: vec!["row size is limited to 65,535 bytes".into()],
        });

    DatabaseDefinition::new(
        "mysql",
        "MySQL",
        &[Paradigm::Relational],
        mysql_types("mysql").build(),
        features,
    )
}

pub fn mariadb() -> DatabaseDefinition {
    let types = mysql_types("mariadb")
        .ty("uuid", C::Uuid, &[])
        .ty("inet6", C::Varchar, &["inet4"])
        .default_for(C::Varchar, "varchar")
        .build();
    let features = baseline::relational()
        .unsupported(MaterializedView, &[View, Table], "no materialized views")
        .unsupported(CustomType, &[CheckConstraint], "only inline ENUM and SET types")
        .partial(SearchIndex, &[Index], "FULLTEXT indexes")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["mysql".into()],
            preferred_targets: vec!["mysql".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("mariadb", "MariaDB", &[Paradigm::Relational], types, features)
}

pub fn sqlserver() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("sqlserver")
        .ty("bit", C::Boolean, &[])
        .ty("tinyint", C::UInt8, &[])
        .ty("smallint", C::Int16, &[])
        .ty("int", C::Int32, &["integer"])
        .ty("bigint", C::Int64, &[])
        .ty("real", C::Float32, &[])
        .ty("float", C::Float64, &["double precision"])
        .numeric("decimal", C::Decimal, Some(38), Some(38), &["dec"])
        .numeric("numeric", C::Numeric, Some(38), Some(38), &[])
        .default_precision("decimal", 18, 0)
        .ty("money", C::Money, &["smallmoney"])
        .sized("char", C::Char, Some(8000), Some(1), &["character"])
        .sized("nchar", C::Char, Some(4000), Some(1), &[])
        .sized("varchar", C::Varchar, Some(8000), Some(1), &["character varying"])
        .sized("nvarchar", C::Varchar, Some(4000), Some(1), &[])
        .ty("nvarchar(max)", C::Text, &["varchar(max)", "text", "ntext"])
        .sized("binary", C::Binary, Some(8000), Some(1), &[])
        .sized("varbinary", C::Varbinary, Some(8000), Some(1), &[])
        .ty("varbinary(max)", C::Blob, &["image"])
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &[])
        .ty("datetime2", C::Timestamp, &["datetime", "smalldatetime"])
        .ty("datetimeoffset", C::TimestampTz, &[])
        .ty("uniqueidentifier", C::Uuid, &[])
        .ty("xml", C::Xml, &[])
        .ty("geometry", C::Geometry, &[])
        .ty("geography", C::Geography, &[])
        .default_for(C::Char, "nchar")
        .default_for(C::Varchar, "nvarchar")
        .custom_types(CustomTypeCapabilities {
            domains: Some(
                NativeImplementation::new("CREATE TYPE {name} FROM {base}")
                    .with_limitation("alias types cannot carry check constraints"),
            ),
            json: Some(NativeImplementation::new("NVARCHAR(MAX) CHECK (ISJSON({name}) = 1)")),
            xml: Some(NativeImplementation::new("XML")),
            spatial: Some(NativeImplementation::new("GEOMETRY")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
        .build();

    let features = baseline::relational()
        .partial(MaterializedView, &[View, Table], "indexed views with schema binding")
        .partial(SearchIndex, &[Index], "full-text catalogs")
        .full(&[Partition])
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "mysql".into()],
            preferred_targets: vec!["postgresql".into()],
            special_requirements: Vec::new(),
            limitations: vec!["index keys are limited to 900 bytes".into()],
        });

    DatabaseDefinition::new("sqlserver", "SQL Server", &[Paradigm::Relational], types, features)
        .with_aliases(&["mssql", "sql_server", "tsql"])
}

pub fn oracle() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("oracle")
        .ty("number(1)", C::Boolean, &["boolean"])
        .ty("number(3)", C::Int8, &[])
        .ty("number(5)", C::Int16, &["smallint"])
        .ty("number(10)", C::Int32, &["integer", "int"])
        .ty("number(19)", C::Int64, &[])
        .numeric("number", C::Numeric, Some(38), Some(127), &["numeric", "decimal", "dec"])
        .ty("binary_float", C::Float32, &[])
        .ty("binary_double", C::Float64, &["double precision", "float"])
        .sized("char", C::Char, Some(2000), Some(1), &["nchar", "character"])
        .sized("varchar2", C::Varchar, Some(4000), None, &["varchar", "nvarchar2"])
        .ty("clob", C::Clob, &["nclob", "long"])
        .ty("blob", C::Blob, &["long raw"])
        .sized("raw", C::Varbinary, Some(2000), None, &[])
        .ty("date", C::Date, &[])
        .sized("timestamp", C::Timestamp, Some(9), None, &[])
        .ty("timestamp with time zone", C::TimestampTz, &["timestamp with local time zone"])
        .ty("interval day to second", C::Interval, &["interval year to month"])
        .ty("xmltype", C::Xml, &[])
        .ty("json", C::Json, &[])
        .ty("sdo_geometry", C::Geometry, &[])
        .sized("vector", C::Vector, Some(65_535), None, &[])
        .custom_types(CustomTypeCapabilities {
            composites: Some(NativeImplementation::new("CREATE TYPE {name} AS OBJECT ({fields})")),
            arrays: Some(
                NativeImplementation::new("CREATE TYPE {name} AS VARRAY(1000) OF {element}")
                    .with_limitation("varrays have a fixed maximum size"),
            ),
            json: Some(NativeImplementation::new("JSON")),
            xml: Some(NativeImplementation::new("XMLTYPE")),
            spatial: Some(NativeImplementation::new("SDO_GEOMETRY")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
        .build();

    let features = baseline::relational()
        .full(&[MaterializedView, Partition, CustomType])
        .partial(SearchIndex, &[Index], "Oracle Text indexes")
        .with_preferences(ConversionPreferences {
            preferred_targets: vec!["postgresql".into()],
            limitations: vec!["empty strings are stored as NULL".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("oracle", "Oracle Database", &[Paradigm::Relational], types, features)
        .with_aliases(&["oracledb"])
}

pub fn sqlite() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("sqlite")
        .ty("integer", C::Int64, &["int", "bigint", "smallint", "tinyint", "mediumint"])
        .ty("boolean", C::Boolean, &["bool"])
        .ty("real", C::Float64, &["double", "float", "double precision"])
        .numeric("numeric", C::Numeric, None, None, &["decimal"])
        .ty("text", C::Text, &["clob", "varchar", "char", "nvarchar", "character"])
        .ty("blob", C::Blob, &[])
        .ty("date", C::Date, &[])
        .ty("datetime", C::Timestamp, &["timestamp"])
        .custom_types(CustomTypeCapabilities {
            json: Some(
                NativeImplementation::new("TEXT")
                    .with_limitation("JSON is stored as text and queried with json functions"),
            ),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
        .build();

    let features = baseline::relational()
        .unsupported(Sequence, &[], "AUTOINCREMENT columns replace sequences")
        .unsupported(Function, &[], "functions are registered by the host application")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Schema, &[], "attached databases replace schemas")
        .unsupported(User, &[], "no access control")
        .unsupported(Role, &[], "no access control")
        .unsupported(MaterializedView, &[View, Table], "no materialized views")
        .unsupported(CustomType, &[CheckConstraint], "type affinity only")
        .unsupported(Partition, &[], "no partitioning")
        .unsupported(Stream, &[Trigger], "change capture through triggers")
        .unsupported(Relationship, &[Table], "relationships become join tables")
        .unsupported(Graph, &[], "no graph namespace")
        .unsupported(Keyspace, &[], "no keyspace namespace")
        .with_preferences(ConversionPreferences {
            limitations: vec!["column types are affinities, not enforced".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("sqlite", "SQLite", &[Paradigm::Relational], types, features)
        .with_aliases(&["sqlite3"])
}

pub fn cockroachdb() -> DatabaseDefinition {
    let types = DatabaseTypeProfile::builder("cockroachdb")
        .ty("bool", C::Boolean, &["boolean"])
        .ty("int2", C::Int16, &["smallint"])
        .ty("int4", C::Int32, &["integer"])
        .ty("int8", C::Int64, &["int", "bigint"])
        .ty("float4", C::Float32, &["real"])
        .ty("float8", C::Float64, &["double precision", "float"])
        .numeric("decimal", C::Decimal, None, None, &["numeric", "dec"])
        .sized("varchar", C::Varchar, None, None, &["character varying"])
        .sized("char", C::Char, None, Some(1), &["character"])
        .ty("string", C::String, &["text"])
        .ty("bytes", C::Binary, &["bytea"])
        .ty("date", C::Date, &[])
        .ty("time", C::Time, &[])
        .ty("timestamp", C::Timestamp, &[])
        .ty("timestamptz", C::TimestampTz, &[])
        .ty("interval", C::Interval, &[])
        .ty("uuid", C::Uuid, &[])
        .ty("jsonb", C::Json, &["json"])
        .ty("geometry", C::Geometry, &[])
        .ty("geography", C::Geography, &[])
        .custom_types(CustomTypeCapabilities {
            enums: Some(NativeImplementation::new("CREATE TYPE {name} AS ENUM ({values})")),
            composites: Some(NativeImplementation::new("CREATE TYPE {name} AS ({fields})")),
            arrays: Some(
                NativeImplementation::new("{element}[]")
                    .with_limitation("nested arrays are not supported"),
            ),
            json: Some(NativeImplementation::new("JSONB")),
            spatial: Some(NativeImplementation::new("GEOMETRY")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::relational())
        .build();

    let features = baseline::relational()
        .full(&[MaterializedView, CustomType, Partition])
        .unsupported(Trigger, &[], "triggers are limited to recent versions")
        .unsupported(Stream, &[], "changefeeds are configured outside the schema")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into()],
            special_requirements: vec!["primary keys should avoid sequential values".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("cockroachdb", "CockroachDB", &[Paradigm::Relational], types, features)
        .with_aliases(&["cockroach", "crdb"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_core_types() {
        let pg = postgres_types("postgresql");
        assert_eq!(pg.type_info("integer").unwrap().canonical, C::Int32);
        assert_eq!(pg.type_info("Character Varying").unwrap().name, "varchar");
        assert_eq!(pg.native_name_for(C::Json), Some("jsonb"));
        assert_eq!(pg.type_info("tstzrange").unwrap().canonical, C::Range);
    }

    #[test]
    fn test_mysql_unsigned_and_defaults() {
        let mysql = mysql().type_profile;
        assert_eq!(mysql.type_info("int unsigned").unwrap().canonical, C::UInt32);
        assert_eq!(mysql.native_name_for(C::Text), Some("longtext"));
        assert_eq!(mysql.native_name_for(C::Int32), Some("int"));
        assert_eq!(
            mysql.type_info("decimal").unwrap().default_precision,
            Some((10, 0))
        );
    }

    #[test]
    fn test_sqlserver_max_types() {
        let mssql = sqlserver().type_profile;
        assert_eq!(mssql.type_info("VARCHAR(MAX)").unwrap().canonical, C::Text);
        assert_eq!(mssql.native_name_for(C::Text), Some("nvarchar(max)"));
        assert_eq!(mssql.native_name_for(C::Varchar), Some("nvarchar"));
    }

    #[test]
    fn test_mariadb_extends_mysql() {
        let mariadb = mariadb().type_profile;
        assert_eq!(mariadb.native_name_for(C::Uuid), Some("uuid"));
        assert!(mariadb.custom_types.supports_enum());
        assert!(mysql().type_profile.native_name_for(C::Uuid).is_none());
    }

    #[test]
    fn test_sqlite_affinities() {
        let sqlite = sqlite().type_profile;
        assert_eq!(sqlite.type_info("varchar").unwrap().name, "text");
        assert_eq!(sqlite.type_info("BIGINT").unwrap().canonical, C::Int64);
    }
}
