//! Object store profiles.

use super::baseline;
use super::DatabaseDefinition;
use crate::dialect::CanonicalType as C;
use crate::dialect::{
    ConstraintSupport, ConversionPreferences, CustomTypeCapabilities, DatabaseTypeProfile,
    NativeImplementation,
};
use crate::paradigm::Paradigm;

pub fn definitions() -> Vec<DatabaseDefinition> {
    vec![s3()]
}

pub fn s3() -> DatabaseDefinition {
    // Objects are typed by content type
    let types = DatabaseTypeProfile::builder("s3")
        .ty("application/octet-stream", C::Blob, &["binary", "blob"])
        .ty("application/json", C::Json, &["json"])
        .ty("text/plain", C::Text, &["text", "string"])
        .ty("text/csv", C::Clob, &["csv"])
        .ty("application/xml", C::Xml, &["xml"])
        .custom_types(CustomTypeCapabilities {
            json: Some(NativeImplementation::new("application/json")),
            ..Default::default()
        })
        .constraints(ConstraintSupport::none())
        .build();

    let features = baseline::objectstore().with_preferences(ConversionPreferences {
        special_requirements: vec!["an export file format must be chosen".into()],
        limitations: vec!["objects are immutable; updates rewrite the object".into()],
        ..Default::default()
    });

    DatabaseDefinition::new("s3", "Amazon S3", &[Paradigm::ObjectStore], types, features)
        .with_aliases(&["aws_s3", "minio"])
}
