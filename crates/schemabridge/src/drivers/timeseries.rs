//! Time-series database profiles.

use super::baseline;
use super::relational::postgres_types;
use super::DatabaseDefinition;
use crate::dialect::CanonicalType as C;
use crate::dialect::ObjectType::*;
use crate::dialect::{ConstraintSupport, ConversionPreferences, DatabaseTypeProfile};
use crate::paradigm::Paradigm;

pub fn definitions() -> Vec<DatabaseDefinition> {
    vec![influxdb(), timescaledb()]
}

pub fn influxdb() -> DatabaseDefinition {
    // Line-protocol field types; tags are always strings
    let types = DatabaseTypeProfile::builder("influxdb")
        .ty("float", C::Float64, &["double"])
        .ty("integer", C::Int64, &["int"])
        .ty("uinteger", C::UInt64, &["unsigned"])
        .ty("string", C::String, &[])
        .ty("boolean", C::Boolean, &["bool"])
        .ty("timestamp", C::TimestampTz, &["time"])
        .ty("tag", C::Varchar, &[])
        .default_for(C::String, "string")
        .constraints(ConstraintSupport::none())
        .build();

    let features = baseline::timeseries()
        .full(&[Schema])
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["timescaledb".into(), "postgresql".into()],
            special_requirements: vec!["each measurement needs a timestamp column".into()],
            limitations: vec!["field types cannot change within a shard".into()],
            ..Default::default()
        });

    DatabaseDefinition::new("influxdb", "InfluxDB", &[Paradigm::TimeSeries], types, features)
        .with_aliases(&["influx"])
}

pub fn timescaledb() -> DatabaseDefinition {
    let features = baseline::relational()
        .full(&[
            Measurement,
            RetentionPolicy,
            MaterializedView,
            Partition,
            CustomType,
            Extension,
        ])
        .partial(VectorIndex, &[Index], "requires the pgvector extension")
        .partial(Embedding, &[Table], "vector columns through pgvector")
        .with_preferences(ConversionPreferences {
            preferred_sources: vec!["postgresql".into(), "influxdb".into()],
            special_requirements: vec!["hypertables need a time partitioning column".into()],
            ..Default::default()
        });

    DatabaseDefinition::new(
        "timescaledb",
        "TimescaleDB",
        &[Paradigm::Relational, Paradigm::TimeSeries],
        postgres_types("timescaledb"),
        features,
    )
    .with_aliases(&["timescale"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timescaledb_shares_postgres_types() {
        let timescale = timescaledb();
        assert_eq!(timescale.type_profile.database, "timescaledb");
        assert_eq!(timescale.type_profile.native_name_for(C::Json), Some("jsonb"));
        assert!(timescale.feature_profile.supports(Measurement));
        assert!(timescale.feature_profile.supports(Table));
    }

    #[test]
    fn test_influxdb_fields() {
        let influx = influxdb().type_profile;
        assert_eq!(influx.type_info("unsigned").unwrap().canonical, C::UInt64);
        assert!(!influx.custom_types.supports_json());
        assert!(!influx.constraints.primary_key);
    }
}
