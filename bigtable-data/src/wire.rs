//! Message shapes exchanged with the transport.
//!
//! These mirror the service's data API messages one to one. They carry no
//! behaviour; the transport is responsible for encoding them onto the wire.

use bytes::Bytes;

/// Server side row filter grammar.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFilter {
    Chain(WireChain),
    Interleave(WireInterleave),
    Condition(Box<WireCondition>),
    Sink(bool),
    PassAllFilter(bool),
    BlockAllFilter(bool),
    RowKeyRegexFilter(Bytes),
    RowSampleFilter(f64),
    FamilyNameRegexFilter(String),
    ColumnQualifierRegexFilter(Bytes),
    ColumnRangeFilter(WireColumnRange),
    TimestampRangeFilter(WireTimestampRange),
    ValueRegexFilter(Bytes),
    ValueRangeFilter(WireValueRange),
    CellsPerRowOffsetFilter(i32),
    CellsPerRowLimitFilter(i32),
    CellsPerColumnLimitFilter(i32),
    StripValueTransformer(bool),
    ApplyLabelTransformer(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WireChain {
    pub filters: Vec<WireFilter>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WireInterleave {
    pub filters: Vec<WireFilter>,
}

/// An absent branch means "no cells" for that outcome on the service side,
/// which is not the same as an explicit `PassAllFilter` branch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WireCondition {
    pub predicate_filter: WireFilter,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub true_filter: Option<WireFilter>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub false_filter: Option<WireFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireBound {
    Closed(Bytes),
    Open(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireColumnRange {
    pub family_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_qualifier: Option<WireBound>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_qualifier: Option<WireBound>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireValueRange {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_value: Option<WireBound>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_value: Option<WireBound>,
}

/// Start inclusive, end exclusive. Unset bounds are open.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireTimestampRange {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_timestamp_micros: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_timestamp_micros: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    SetCell {
        family_name: String,
        column_qualifier: Bytes,
        timestamp_micros: i64,
        value: Bytes,
    },
    DeleteFromColumn {
        family_name: String,
        column_qualifier: Bytes,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        time_range: Option<WireTimestampRange>,
    },
    DeleteFromFamily {
        family_name: String,
    },
    DeleteFromRow,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadModifyWriteRule {
    AppendValue {
        family_name: String,
        column_qualifier: Bytes,
        value: Bytes,
    },
    IncrementAmount {
        family_name: String,
        column_qualifier: Bytes,
        amount: i64,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MutateRowRequest {
    pub table_name: String,
    pub row_key: Bytes,
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckAndMutateRowRequest {
    pub table_name: String,
    pub row_key: Bytes,
    pub predicate_filter: WireFilter,
    pub true_mutations: Vec<Mutation>,
    pub false_mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckAndMutateRowResponse {
    pub predicate_matched: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReadModifyWriteRowRequest {
    pub table_name: String,
    pub row_key: Bytes,
    pub rules: Vec<ReadModifyWriteRule>,
}

/// A row as returned by non-streaming calls such as `ReadModifyWriteRow`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireRow {
    pub key: Bytes,
    pub families: Vec<WireFamily>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireFamily {
    pub name: String,
    pub columns: Vec<WireColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireColumn {
    pub qualifier: Bytes,
    pub cells: Vec<WireCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireCell {
    pub timestamp_micros: i64,
    pub value: Bytes,
    #[serde(default)]
    pub labels: Vec<String>,
}
