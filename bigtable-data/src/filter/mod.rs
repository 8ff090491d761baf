//! Row filters.
//!
//! A [`Filter`] is an immutable tree describing how the service selects and
//! transforms cells during a read. Leaves are built through the validating
//! constructors on [`Filter`]; combinators take already built children, so a
//! tree can only be assembled bottom-up.
//!
//! Regex filters over bytes (row key, qualifier, value) use RE2 syntax. Since
//! those fields may hold arbitrary bytes, `\C` is the true wildcard; `.` does
//! not match `\n`.

use bytes::Bytes;

use crate::{compiler, error::CompileError, error::ValidationError, wire::WireFilter};

pub mod pattern;
pub mod range;

pub use range::{ColumnRange, TimestampRange, ValueRange};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Cells from rows whose key matches the regex.
    RowKeyRegex(Bytes),
    /// Cells from families whose name matches the regex.
    FamilyRegex(String),
    /// Cells from columns whose qualifier matches the regex, in any family.
    QualifierRegex(Bytes),
    ValueRegex(Bytes),
    ValueRange(ValueRange),
    TimestampRange(TimestampRange),
    ColumnRange(ColumnRange),
    /// Skips the first n cells of each row.
    CellsPerRowOffset(u32),
    /// Keeps only the first n cells of each row.
    CellsPerRowLimit(u32),
    /// Keeps only the n most recent cells of each column.
    CellsPerColumnLimit(u32),
    /// Keeps a whole row with probability p, drops it otherwise.
    RowSample(f64),
    /// Replaces every cell value with the empty string.
    StripValue,
    /// Emits the cells seen so far straight to the output, bypassing the rest
    /// of the enclosing chain.
    Sink,
    /// Emits every cell unchanged.
    PassAll,
    /// Emits no cells.
    BlockAll,
    ApplyLabel(String),
    /// Children applied in sequence, each to the output of the previous one.
    Chain(Vec<Filter>),
    /// Children applied to the same input, outputs interleaved.
    Union(Vec<Filter>),
    Condition(Box<Condition>),
}

/// If/then/else over filters.
///
/// When `predicate` yields any cell for a row, `true_filter` is applied to the
/// row, otherwise `false_filter`. A missing branch is left out of the request
/// entirely, which is distinct from an explicit [`Filter::PassAll`] branch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Condition {
    pub predicate: Filter,
    #[serde(default)]
    pub true_filter: Option<Filter>,
    #[serde(default)]
    pub false_filter: Option<Filter>,
}

impl Filter {
    pub fn row_key_regex(pattern: impl Into<Bytes>) -> Result<Filter, ValidationError> {
        let pattern = pattern.into();
        pattern::validate_bytes_regex(&pattern)?;
        Ok(Filter::RowKeyRegex(pattern))
    }

    pub fn family_regex(pattern: impl Into<String>) -> Result<Filter, ValidationError> {
        let pattern = pattern.into();
        pattern::validate_family_regex(&pattern)?;
        Ok(Filter::FamilyRegex(pattern))
    }

    pub fn qualifier_regex(pattern: impl Into<Bytes>) -> Result<Filter, ValidationError> {
        let pattern = pattern.into();
        pattern::validate_bytes_regex(&pattern)?;
        Ok(Filter::QualifierRegex(pattern))
    }

    pub fn value_regex(pattern: impl Into<Bytes>) -> Result<Filter, ValidationError> {
        let pattern = pattern.into();
        pattern::validate_bytes_regex(&pattern)?;
        Ok(Filter::ValueRegex(pattern))
    }

    pub fn value_range(range: ValueRange) -> Filter {
        Filter::ValueRange(range)
    }

    pub fn timestamp_range(range: TimestampRange) -> Filter {
        Filter::TimestampRange(range)
    }

    pub fn column_range(range: ColumnRange) -> Filter {
        Filter::ColumnRange(range)
    }

    pub fn cells_per_row_offset(n: u32) -> Result<Filter, ValidationError> {
        check_count(n)?;
        Ok(Filter::CellsPerRowOffset(n))
    }

    pub fn cells_per_row_limit(n: u32) -> Result<Filter, ValidationError> {
        check_count(n)?;
        Ok(Filter::CellsPerRowLimit(n))
    }

    pub fn cells_per_column_limit(n: u32) -> Result<Filter, ValidationError> {
        check_count(n)?;
        Ok(Filter::CellsPerColumnLimit(n))
    }

    pub fn row_sample(probability: f64) -> Result<Filter, ValidationError> {
        check_probability(probability)?;
        Ok(Filter::RowSample(probability))
    }

    pub fn apply_label(label: impl Into<String>) -> Result<Filter, ValidationError> {
        let label = label.into();
        pattern::validate_label(&label)?;
        Ok(Filter::ApplyLabel(label))
    }

    pub fn chain(filters: Vec<Filter>) -> Result<Filter, ValidationError> {
        if filters.is_empty() {
            return Err(ValidationError::EmptyCombinator("Chain"));
        }
        Ok(Filter::Chain(filters))
    }

    pub fn union(filters: Vec<Filter>) -> Result<Filter, ValidationError> {
        if filters.is_empty() {
            return Err(ValidationError::EmptyCombinator("Union"));
        }
        Ok(Filter::Union(filters))
    }

    pub fn condition(
        predicate: Filter,
        true_filter: Option<Filter>,
        false_filter: Option<Filter>,
    ) -> Filter {
        Filter::Condition(Box::new(Condition {
            predicate,
            true_filter,
            false_filter,
        }))
    }

    /// Compiles this tree into the server side filter grammar.
    pub fn compile(&self) -> Result<WireFilter, CompileError> {
        compiler::compile(self)
    }

    /// Re-checks the arguments of this node only, children excluded.
    ///
    /// Variants are public and filters can be deserialized, so a tree may
    /// exist that never went through the constructors above.
    pub(crate) fn validate_node(&self) -> Result<(), ValidationError> {
        match self {
            Filter::RowKeyRegex(p) | Filter::QualifierRegex(p) | Filter::ValueRegex(p) => {
                pattern::validate_bytes_regex(p)
            }
            Filter::FamilyRegex(p) => pattern::validate_family_regex(p),
            Filter::ValueRange(range) => range.validate(),
            Filter::TimestampRange(range) => range.validate(),
            Filter::ColumnRange(range) => range.validate(),
            Filter::CellsPerRowOffset(n)
            | Filter::CellsPerRowLimit(n)
            | Filter::CellsPerColumnLimit(n) => check_count(*n),
            Filter::RowSample(p) => check_probability(*p),
            Filter::ApplyLabel(label) => pattern::validate_label(label),
            Filter::Chain(filters) if filters.is_empty() => {
                Err(ValidationError::EmptyCombinator("Chain"))
            }
            Filter::Union(filters) if filters.is_empty() => {
                Err(ValidationError::EmptyCombinator("Union"))
            }
            Filter::StripValue
            | Filter::Sink
            | Filter::PassAll
            | Filter::BlockAll
            | Filter::Chain(_)
            | Filter::Union(_)
            | Filter::Condition(_) => Ok(()),
        }
    }
}

fn check_count(n: u32) -> Result<(), ValidationError> {
    if i32::try_from(n).is_err() {
        return Err(ValidationError::CountOutOfRange(n));
    }
    Ok(())
}

fn check_probability(p: f64) -> Result<(), ValidationError> {
    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::ProbabilityOutOfRange(p));
    }
    Ok(())
}
