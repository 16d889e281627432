//! Hub-and-spoke canonical type system.
//!
//! Every native type in every registered database maps to exactly one
//! [`CanonicalType`]. Converting between two databases is then a lookup in
//! the source profile (native → canonical) followed by a lookup in the
//! target profile (canonical → native):
//!
//! ```text
//! Source DB     →  CanonicalType  →  Target DB
//!   PostgreSQL  →     int32       →   MongoDB
//!   MySQL       →     json        →   Cassandra
//! ```
//!
//! The vocabulary is closed and string-keyed: values serialize by name
//! (`"timestamp_tz"`), never by ordinal, so new kinds can be appended
//! without disturbing stored reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Database-agnostic type kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    // ===== Boolean =====
    Boolean,

    // ===== Integer Types =====
    Int8,
    Int16,
    Int32,
    Int64,
    #[serde(rename = "uint8")]
    UInt8,
    #[serde(rename = "uint16")]
    UInt16,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,

    // ===== Floating Point =====
    Float32,
    Float64,

    // ===== Exact Numerics =====
    Decimal,
    Numeric,
    Money,

    // ===== Character / Large Objects =====
    String,
    Text,
    Char,
    Varchar,
    Clob,
    Blob,

    // ===== Date/Time =====
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,

    // ===== Binary / Identifiers =====
    Binary,
    Varbinary,
    Uuid,

    // ===== Semi-structured =====
    Json,
    Document,
    Object,

    // ===== Collections =====
    Array,
    List,
    Set,
    Map,

    // ===== Geospatial =====
    Point,
    #[serde(rename = "linestring")]
    LineString,
    Polygon,
    Geometry,
    Geography,

    // ===== Vector Search =====
    Vector,
    Embedding,

    // ===== Graph =====
    GraphNode,
    GraphEdge,
    GraphRelation,

    // ===== Special =====
    Enum,
    Range,
    Xml,

    // ===== Fallback =====
    /// A type whose meaning cannot be carried across databases.
    Unknown,
}

/// One step in a widening fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    /// The substitute canonical type.
    pub canonical: CanonicalType,
    /// Whether values may lose range, precision or structure.
    pub lossy: bool,
}

// Struct literals so the fallback tables are promoted to statics.
macro_rules! lossless {
    ($canonical:expr) => {
        Fallback {
            canonical: $canonical,
            lossy: false,
        }
    };
}

macro_rules! lossy {
    ($canonical:expr) => {
        Fallback {
            canonical: $canonical,
            lossy: true,
        }
    };
}

impl CanonicalType {
    /// Every canonical type, in declaration order.
    pub const ALL: [CanonicalType; 49] = [
        CanonicalType::Boolean,
        CanonicalType::Int8,
        CanonicalType::Int16,
        CanonicalType::Int32,
        CanonicalType::Int64,
        CanonicalType::UInt8,
        CanonicalType::UInt16,
        CanonicalType::UInt32,
        CanonicalType::UInt64,
        CanonicalType::Float32,
        CanonicalType::Float64,
        CanonicalType::Decimal,
        CanonicalType::Numeric,
        CanonicalType::Money,
        CanonicalType::String,
        CanonicalType::Text,
        CanonicalType::Char,
        CanonicalType::Varchar,
        CanonicalType::Clob,
        CanonicalType::Blob,
        CanonicalType::Date,
        CanonicalType::Time,
        CanonicalType::Timestamp,
        CanonicalType::TimestampTz,
        CanonicalType::Interval,
        CanonicalType::Binary,
        CanonicalType::Varbinary,
        CanonicalType::Uuid,
        CanonicalType::Json,
        CanonicalType::Document,
        CanonicalType::Object,
        CanonicalType::Array,
        CanonicalType::List,
        CanonicalType::Set,
        CanonicalType::Map,
        CanonicalType::Point,
        CanonicalType::LineString,
        CanonicalType::Polygon,
        CanonicalType::Geometry,
        CanonicalType::Geography,
        CanonicalType::Vector,
        CanonicalType::Embedding,
        CanonicalType::GraphNode,
        CanonicalType::GraphEdge,
        CanonicalType::GraphRelation,
        CanonicalType::Enum,
        CanonicalType::Range,
        CanonicalType::Xml,
        CanonicalType::Unknown,
    ];

    /// Stable string key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalType::Boolean => "boolean",
            CanonicalType::Int8 => "int8",
            CanonicalType::Int16 => "int16",
            CanonicalType::Int32 => "int32",
            CanonicalType::Int64 => "int64",
            CanonicalType::UInt8 => "uint8",
            CanonicalType::UInt16 => "uint16",
            CanonicalType::UInt32 => "uint32",
            CanonicalType::UInt64 => "uint64",
            CanonicalType::Float32 => "float32",
            CanonicalType::Float64 => "float64",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Numeric => "numeric",
            CanonicalType::Money => "money",
            CanonicalType::String => "string",
            CanonicalType::Text => "text",
            CanonicalType::Char => "char",
            CanonicalType::Varchar => "varchar",
            CanonicalType::Clob => "clob",
            CanonicalType::Blob => "blob",
            CanonicalType::Date => "date",
            CanonicalType::Time => "time",
            CanonicalType::Timestamp => "timestamp",
            CanonicalType::TimestampTz => "timestamp_tz",
            CanonicalType::Interval => "interval",
            CanonicalType::Binary => "binary",
            CanonicalType::Varbinary => "varbinary",
            CanonicalType::Uuid => "uuid",
            CanonicalType::Json => "json",
            CanonicalType::Document => "document",
            CanonicalType::Object => "object",
            CanonicalType::Array => "array",
            CanonicalType::List => "list",
            CanonicalType::Set => "set",
            CanonicalType::Map => "map",
            CanonicalType::Point => "point",
            CanonicalType::LineString => "linestring",
            CanonicalType::Polygon => "polygon",
            CanonicalType::Geometry => "geometry",
            CanonicalType::Geography => "geography",
            CanonicalType::Vector => "vector",
            CanonicalType::Embedding => "embedding",
            CanonicalType::GraphNode => "graph_node",
            CanonicalType::GraphEdge => "graph_edge",
            CanonicalType::GraphRelation => "graph_relation",
            CanonicalType::Enum => "enum",
            CanonicalType::Range => "range",
            CanonicalType::Xml => "xml",
            CanonicalType::Unknown => "unknown",
        }
    }

    /// Signed or unsigned integer.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            CanonicalType::Int8
                | CanonicalType::Int16
                | CanonicalType::Int32
                | CanonicalType::Int64
                | CanonicalType::UInt8
                | CanonicalType::UInt16
                | CanonicalType::UInt32
                | CanonicalType::UInt64
        )
    }

    /// Character data of any size.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            CanonicalType::String
                | CanonicalType::Text
                | CanonicalType::Char
                | CanonicalType::Varchar
                | CanonicalType::Clob
        )
    }

    /// Semi-structured data (JSON, documents, nested objects).
    pub fn is_semi_structured(&self) -> bool {
        matches!(
            self,
            CanonicalType::Json | CanonicalType::Document | CanonicalType::Object
        )
    }

    /// Geospatial shapes.
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            CanonicalType::Point
                | CanonicalType::LineString
                | CanonicalType::Polygon
                | CanonicalType::Geometry
                | CanonicalType::Geography
        )
    }

    /// The unsigned counterpart of a signed integer, used when a native
    /// spelling carries an `unsigned` modifier.
    pub fn unsigned_variant(&self) -> Option<CanonicalType> {
        match self {
            CanonicalType::Int8 => Some(CanonicalType::UInt8),
            CanonicalType::Int16 => Some(CanonicalType::UInt16),
            CanonicalType::Int32 => Some(CanonicalType::UInt32),
            CanonicalType::Int64 => Some(CanonicalType::UInt64),
            _ => None,
        }
    }

    /// Character length that holds this type's textual form, used when it
    /// lands in a length-parameterized string type.
    pub fn natural_length(&self) -> Option<u64> {
        match self {
            CanonicalType::Uuid => Some(36),
            CanonicalType::Boolean => Some(5),
            CanonicalType::Date => Some(10),
            CanonicalType::Time => Some(18),
            CanonicalType::Timestamp => Some(29),
            CanonicalType::TimestampTz => Some(35),
            _ => None,
        }
    }

    /// Ordered substitutes to try when a target database has no native
    /// name for this type. Earlier entries are closer in meaning.
    pub fn fallbacks(&self) -> &'static [Fallback] {
        use CanonicalType as C;
        match self {
            C::Boolean => &[lossless!(C::Int8), lossless!(C::Int16), lossless!(C::Int32)],
            C::Int8 => &[lossless!(C::Int16), lossless!(C::Int32), lossless!(C::Int64)],
            C::Int16 => &[lossless!(C::Int32), lossless!(C::Int64)],
            C::Int32 => &[lossless!(C::Int64), lossy!(C::Float64)],
            C::Int64 => &[lossless!(C::Decimal), lossy!(C::Float64)],
            C::UInt8 => &[lossless!(C::Int16), lossless!(C::Int32), lossless!(C::Int64)],
            C::UInt16 => &[lossless!(C::Int32), lossless!(C::Int64)],
            C::UInt32 => &[lossless!(C::Int64), lossless!(C::Decimal)],
            C::UInt64 => &[lossless!(C::Decimal), lossy!(C::Int64)],
            C::Float32 => &[lossless!(C::Float64), lossless!(C::Decimal)],
            C::Float64 => &[lossy!(C::Decimal), lossy!(C::Float32)],
            C::Decimal => &[lossless!(C::Numeric), lossy!(C::Float64), lossless!(C::String)],
            C::Numeric => &[lossless!(C::Decimal), lossy!(C::Float64), lossless!(C::String)],
            C::Money => &[lossless!(C::Decimal), lossless!(C::Numeric), lossy!(C::Float64)],
            C::Char => &[lossless!(C::Varchar), lossless!(C::String), lossless!(C::Text)],
            C::Varchar => &[lossless!(C::String), lossless!(C::Text)],
            C::String => &[lossless!(C::Text), lossless!(C::Varchar)],
            C::Text => &[lossless!(C::Clob), lossless!(C::String), lossy!(C::Varchar)],
            C::Clob => &[lossless!(C::Text), lossless!(C::String)],
            C::Blob => &[lossless!(C::Varbinary), lossless!(C::Binary), lossy!(C::String)],
            C::Binary => &[lossless!(C::Varbinary), lossless!(C::Blob), lossy!(C::String)],
            C::Varbinary => &[lossless!(C::Blob), lossless!(C::Binary), lossy!(C::String)],
            C::Date => &[lossless!(C::Timestamp), lossy!(C::String)],
            C::Time => &[lossy!(C::String)],
            C::Timestamp => &[lossless!(C::TimestampTz), lossy!(C::Int64), lossy!(C::String)],
            C::TimestampTz => &[lossy!(C::Timestamp), lossy!(C::String)],
            C::Interval => &[lossy!(C::Int64), lossy!(C::String)],
            C::Uuid => &[lossy!(C::Char), lossy!(C::Varchar), lossy!(C::String)],
            C::Json => &[lossless!(C::Document), lossless!(C::Object), lossy!(C::Text), lossy!(C::String)],
            C::Document => &[lossless!(C::Json), lossless!(C::Object), lossy!(C::Text), lossy!(C::String)],
            C::Object => &[lossless!(C::Document), lossless!(C::Json), lossy!(C::Map), lossy!(C::String)],
            C::Array => &[lossless!(C::List), lossy!(C::Json), lossy!(C::String)],
            C::List => &[lossless!(C::Array), lossy!(C::Json), lossy!(C::String)],
            C::Set => &[lossy!(C::Array), lossy!(C::List), lossy!(C::Json)],
            C::Map => &[lossless!(C::Object), lossless!(C::Json), lossy!(C::String)],
            C::Point | C::LineString | C::Polygon => {
                &[lossless!(C::Geometry), lossy!(C::Json), lossy!(C::String)]
            }
            C::Geometry => &[lossless!(C::Geography), lossy!(C::Json), lossy!(C::String)],
            C::Geography => &[lossless!(C::Geometry), lossy!(C::Json), lossy!(C::String)],
            C::Vector => &[lossless!(C::Embedding), lossy!(C::Array), lossy!(C::List), lossy!(C::Json)],
            C::Embedding => &[lossless!(C::Vector), lossy!(C::Array), lossy!(C::List), lossy!(C::Json)],
            C::GraphNode | C::GraphEdge | C::GraphRelation => {
                &[lossy!(C::Document), lossy!(C::Json), lossy!(C::Object)]
            }
            C::Enum => &[lossy!(C::Varchar), lossy!(C::String), lossy!(C::Text)],
            C::Range => &[lossy!(C::Json), lossy!(C::String)],
            C::Xml => &[lossy!(C::Text), lossy!(C::String)],
            C::Unknown => &[lossy!(C::Text), lossy!(C::String)],
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        CanonicalType::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| ConvertError::Config(format!("Unknown canonical type: '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_type_display() {
        assert_eq!(format!("{}", CanonicalType::Int32), "int32");
        assert_eq!(format!("{}", CanonicalType::TimestampTz), "timestamp_tz");
        assert_eq!(format!("{}", CanonicalType::GraphEdge), "graph_edge");
        assert_eq!(format!("{}", CanonicalType::LineString), "linestring");
    }

    #[test]
    fn test_string_keys_are_unique_and_round_trip() {
        let keys: HashSet<&str> = CanonicalType::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(keys.len(), CanonicalType::ALL.len());

        for c in CanonicalType::ALL {
            assert_eq!(c.as_str().parse::<CanonicalType>().unwrap(), c);
        }
    }

    #[test]
    fn test_serde_uses_names_not_ordinals() {
        let json = serde_json::to_string(&CanonicalType::UInt16).unwrap();
        assert_eq!(json, "\"uint16\"");
        let back: CanonicalType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CanonicalType::UInt16);

        for c in CanonicalType::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert!("hyperloglog".parse::<CanonicalType>().is_err());
    }

    #[test]
    fn test_unsigned_variant() {
        assert_eq!(CanonicalType::Int32.unsigned_variant(), Some(CanonicalType::UInt32));
        assert_eq!(CanonicalType::Text.unsigned_variant(), None);
    }

    #[test]
    fn test_fallbacks_never_refer_to_self() {
        for c in CanonicalType::ALL {
            assert!(c.fallbacks().iter().all(|f| f.canonical != c), "{} falls back to itself", c);
        }
    }

    #[test]
    fn test_fallback_chains_are_static_and_ordered() {
        let chain = CanonicalType::Int32.fallbacks();
        assert_eq!(
            chain,
            &[
                Fallback { canonical: CanonicalType::Int64, lossy: false },
                Fallback { canonical: CanonicalType::Float64, lossy: true },
            ]
        );
        assert!(CanonicalType::Enum.fallbacks().iter().all(|f| f.lossy));
    }

    #[test]
    fn test_category_predicates() {
        assert!(CanonicalType::UInt64.is_integer());
        assert!(CanonicalType::Clob.is_textual());
        assert!(CanonicalType::Document.is_semi_structured());
        assert!(CanonicalType::Geography.is_spatial());
        assert!(!CanonicalType::Vector.is_spatial());
    }
}
