//! Per-paradigm feature-support baselines.
//!
//! Databases of the same family share most of their object-type support.
//! Each factory starts from the baseline of its primary paradigm and
//! overrides the entries where the concrete engine differs. Alternatives
//! listed for an unsupported object type are always types the same
//! profile supports.

use crate::dialect::FeatureProfile;
use crate::dialect::ObjectType::*;

/// SQL engines.
pub fn relational() -> FeatureProfile {
    FeatureProfile::new("relational")
        .full(&[
            Table,
            View,
            Index,
            PrimaryKey,
            ForeignKey,
            UniqueConstraint,
            CheckConstraint,
            Sequence,
            Function,
            Procedure,
            Trigger,
            Schema,
            User,
            Role,
        ])
        .partial(MaterializedView, &[View, Table], "refresh is manual or emulated with tables")
        .partial(CustomType, &[CheckConstraint], "limited user-defined types")
        .partial(Partition, &[], "partitioning syntax varies by engine")
        .unsupported(Collection, &[Table], "documents become rows; nested fields are flattened or stored as JSON")
        .unsupported(Node, &[Table], "each node label becomes a table")
        .unsupported(Relationship, &[Table, ForeignKey], "relationships become join tables with foreign keys")
        .unsupported(Graph, &[Schema], "a graph maps to a schema")
        .unsupported(Keyspace, &[Schema], "a keyspace maps to a schema")
        .unsupported(ColumnFamily, &[Table], "column families become tables keyed by row key")
        .unsupported(SearchIndex, &[Index], "full-text search needs engine-specific indexes")
        .unsupported(VectorIndex, &[], "requires a vector extension")
        .unsupported(Embedding, &[Table], "vectors stored as array or binary columns")
        .unsupported(Measurement, &[Table], "measurements become time-stamped tables")
        .unsupported(RetentionPolicy, &[], "retention must be scheduled as periodic deletes")
        .unsupported(Bucket, &[], "binary objects are stored outside the database")
        .unsupported(Stream, &[Trigger], "change capture through triggers")
}

/// Document stores.
pub fn document() -> FeatureProfile {
    FeatureProfile::new("document")
        .full(&[Collection, Index, Schema, User, Role])
        .partial(View, &[], "read-only views over aggregation pipelines")
        .partial(PrimaryKey, &[], "the _id field is the only primary key")
        .partial(UniqueConstraint, &[Index], "enforced through unique indexes")
        .partial(CheckConstraint, &[], "document validation rules")
        .partial(SearchIndex, &[Index], "text indexes")
        .unsupported(Table, &[Collection], "rows become documents")
        .unsupported(MaterializedView, &[Collection], "materialized as collections refreshed on demand")
        .unsupported(ForeignKey, &[], "references are stored but not enforced")
        .unsupported(Sequence, &[], "generated identifiers replace sequences")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[], "application-side change handling")
        .unsupported(CustomType, &[], "embedded documents replace user-defined types")
        .unsupported(Node, &[Collection], "nodes become documents")
        .unsupported(Relationship, &[Collection], "relationships become reference documents")
        .unsupported(Graph, &[Schema], "a graph maps to a database")
        .unsupported(Keyspace, &[Schema], "a keyspace maps to a database")
        .unsupported(ColumnFamily, &[Collection], "column families become collections")
        .unsupported(Measurement, &[Collection], "points become documents")
        .unsupported(Embedding, &[Collection], "vectors stored as array fields")
        .unsupported(Partition, &[], "sharding replaces partitions")
}

/// Key-value stores.
pub fn keyvalue() -> FeatureProfile {
    FeatureProfile::new("keyvalue")
        .full(&[Keyspace])
        .partial(PrimaryKey, &[], "the key is the only access path")
        .unsupported(Table, &[Keyspace], "rows become values keyed by primary key")
        .unsupported(Collection, &[Keyspace], "documents become serialized values")
        .unsupported(Node, &[Keyspace], "nodes become values keyed by id")
        .unsupported(Relationship, &[], "relationships must be denormalized into values")
        .unsupported(View, &[], "no query layer")
        .unsupported(MaterializedView, &[], "no query layer")
        .unsupported(Index, &[], "secondary indexes must be maintained by the application")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(UniqueConstraint, &[], "only keys are unique")
        .unsupported(CheckConstraint, &[], "no value validation")
        .unsupported(Sequence, &[], "counters replace sequences")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[], "no triggers")
        .unsupported(CustomType, &[], "values are opaque")
        .unsupported(Schema, &[Keyspace], "a schema maps to a key prefix")
        .unsupported(Measurement, &[Keyspace], "points become values keyed by series and time")
        .unsupported(ColumnFamily, &[Keyspace], "column families become key prefixes")
}

/// Property-graph databases.
pub fn graph() -> FeatureProfile {
    FeatureProfile::new("graph")
        .full(&[Node, Relationship, Graph, Index, UniqueConstraint, Schema, User, Role])
        .partial(PrimaryKey, &[UniqueConstraint], "node key constraints")
        .partial(CheckConstraint, &[], "property existence and type constraints only")
        .partial(SearchIndex, &[Index], "full-text indexes")
        .partial(Function, &[], "user-defined functions ship as plugins")
        .partial(Procedure, &[], "procedures ship as plugins")
        .unsupported(Table, &[Node], "rows become nodes")
        .unsupported(Collection, &[Node], "documents become nodes")
        .unsupported(ForeignKey, &[Relationship], "foreign keys become relationships")
        .unsupported(View, &[], "no stored views")
        .unsupported(MaterializedView, &[], "no stored views")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Trigger, &[], "no triggers")
        .unsupported(CustomType, &[], "properties hold primitives, lists and maps only")
        .unsupported(ColumnFamily, &[Node], "rows become nodes")
        .unsupported(Measurement, &[Node], "points become nodes")
        .unsupported(Embedding, &[Node], "vectors stored as list properties")
        .unsupported(Keyspace, &[Graph], "a keyspace maps to a graph")
}

/// Column-oriented analytical engines.
pub fn columnar() -> FeatureProfile {
    FeatureProfile::new("columnar")
        .full(&[Table, View, MaterializedView, Schema, User, Role, Partition])
        .partial(Index, &[], "data-skipping indexes only")
        .partial(PrimaryKey, &[], "sorting key, not enforced")
        .partial(Function, &[], "SQL user-defined functions")
        .unsupported(ForeignKey, &[], "not enforced")
        .unsupported(UniqueConstraint, &[], "not enforced")
        .unsupported(CheckConstraint, &[], "not enforced")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[MaterializedView], "insert-time materialized views replace triggers")
        .unsupported(CustomType, &[], "nested and tuple columns replace user-defined types")
        .unsupported(Collection, &[Table], "documents become rows with nested columns")
        .unsupported(Node, &[Table], "nodes become rows")
        .unsupported(Relationship, &[Table], "relationships become edge tables")
        .unsupported(ColumnFamily, &[Table], "column families become tables")
        .unsupported(Measurement, &[Table], "measurements become time-ordered tables")
        .unsupported(Embedding, &[Table], "vectors stored as array columns")
        .unsupported(SearchIndex, &[Index], "token and n-gram skipping indexes")
        .unsupported(Keyspace, &[Schema], "a keyspace maps to a database")
}

/// Wide-column stores.
pub fn widecolumn() -> FeatureProfile {
    FeatureProfile::new("widecolumn")
        .full(&[Keyspace, ColumnFamily, PrimaryKey, User, Role])
        .partial(Index, &[], "secondary indexes on single columns")
        .unsupported(Table, &[ColumnFamily], "rows are grouped by partition key")
        .unsupported(Collection, &[ColumnFamily], "documents become rows")
        .unsupported(Node, &[ColumnFamily], "nodes become rows")
        .unsupported(Relationship, &[ColumnFamily], "relationships become lookup tables")
        .unsupported(Measurement, &[ColumnFamily], "points become clustered rows")
        .unsupported(Embedding, &[ColumnFamily], "vectors stored as list columns")
        .unsupported(View, &[], "no views")
        .unsupported(MaterializedView, &[], "no materialized views")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(UniqueConstraint, &[], "only the primary key is unique")
        .unsupported(CheckConstraint, &[], "no value validation")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[], "no triggers")
        .unsupported(CustomType, &[], "no user-defined types")
        .unsupported(Schema, &[Keyspace], "a schema maps to a keyspace")
}

/// Search engines.
pub fn search() -> FeatureProfile {
    FeatureProfile::new("search")
        .full(&[SearchIndex, User, Role])
        .partial(Collection, &[SearchIndex], "each index holds one document shape")
        .partial(PrimaryKey, &[], "the _id field is the only key")
        .partial(View, &[SearchIndex], "filtered aliases")
        .unsupported(Table, &[SearchIndex], "rows become documents")
        .unsupported(Node, &[SearchIndex], "nodes become documents")
        .unsupported(Relationship, &[], "joins are limited to parent-child documents")
        .unsupported(Measurement, &[SearchIndex], "points become documents in data streams")
        .unsupported(Embedding, &[SearchIndex], "vectors become dense_vector fields")
        .unsupported(ColumnFamily, &[SearchIndex], "rows become documents")
        .unsupported(Index, &[SearchIndex], "every field is indexed by its mapping")
        .unsupported(MaterializedView, &[], "no materialized views")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(UniqueConstraint, &[], "only _id is unique")
        .unsupported(CheckConstraint, &[], "mappings validate types only")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[], "ingest pipelines run before indexing only")
        .unsupported(CustomType, &[], "object mappings replace user-defined types")
        .unsupported(Schema, &[], "no schema namespace")
}

/// Vector databases.
pub fn vector() -> FeatureProfile {
    FeatureProfile::new("vector")
        .full(&[Collection, VectorIndex, Embedding])
        .partial(PrimaryKey, &[], "point ids only")
        .partial(Index, &[], "payload indexes for filtering")
        .partial(SearchIndex, &[VectorIndex], "hybrid search over sparse vectors")
        .unsupported(Table, &[Collection], "rows become points with payload")
        .unsupported(Node, &[Collection], "nodes become points")
        .unsupported(Measurement, &[Collection], "points become payload records")
        .unsupported(ColumnFamily, &[Collection], "rows become points")
        .unsupported(Relationship, &[], "no relationships")
        .unsupported(View, &[], "no views")
        .unsupported(MaterializedView, &[], "no materialized views")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(UniqueConstraint, &[], "only ids are unique")
        .unsupported(CheckConstraint, &[], "no value validation")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[], "no triggers")
        .unsupported(CustomType, &[], "payloads hold JSON values only")
}

/// Time-series databases.
pub fn timeseries() -> FeatureProfile {
    FeatureProfile::new("timeseries")
        .full(&[Measurement, Bucket, RetentionPolicy, User])
        .partial(Index, &[], "tags are indexed automatically")
        .partial(PrimaryKey, &[], "series key of tags and timestamp")
        .partial(Function, &[], "query-language functions")
        .partial(Stream, &[], "scheduled tasks")
        .unsupported(Table, &[Measurement], "rows become points; tag columns must be chosen")
        .unsupported(Collection, &[Measurement], "documents become points")
        .unsupported(ColumnFamily, &[Measurement], "rows become points")
        .unsupported(MaterializedView, &[Measurement], "downsampling tasks write new measurements")
        .unsupported(Schema, &[Bucket], "a schema maps to a bucket")
        .unsupported(Node, &[], "no graph model")
        .unsupported(Relationship, &[], "no relationships")
        .unsupported(View, &[], "no views")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(UniqueConstraint, &[], "no unique constraints")
        .unsupported(CheckConstraint, &[], "no value validation")
        .unsupported(Sequence, &[], "no sequences")
        .unsupported(Procedure, &[], "no stored procedures")
        .unsupported(Trigger, &[Stream], "tasks replace triggers")
        .unsupported(CustomType, &[], "field values are primitives")
}

/// Object stores.
pub fn objectstore() -> FeatureProfile {
    FeatureProfile::new("objectstore")
        .full(&[Bucket, User, Role])
        .partial(Partition, &[], "key prefixes act as partitions")
        .unsupported(Table, &[Bucket], "rows are exported as CSV, JSON or Parquet objects")
        .unsupported(Collection, &[Bucket], "documents are exported as JSON objects")
        .unsupported(Node, &[Bucket], "nodes are exported as objects")
        .unsupported(Relationship, &[Bucket], "relationships are exported as objects")
        .unsupported(Measurement, &[Bucket], "points are exported as objects")
        .unsupported(ColumnFamily, &[Bucket], "rows are exported as objects")
        .unsupported(Embedding, &[Bucket], "vectors are exported as objects")
        .unsupported(View, &[], "no query layer")
        .unsupported(Index, &[], "no indexes")
        .unsupported(ForeignKey, &[], "no referential integrity")
        .unsupported(Function, &[], "no stored functions")
        .unsupported(Trigger, &[], "event notifications are configured outside the schema")
        .unsupported(Schema, &[Bucket], "a schema maps to a bucket")
}
