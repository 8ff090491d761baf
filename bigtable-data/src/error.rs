#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid regular expression {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("Family name regex must not contain ':' (got {0:?})")]
    FamilyRegexContainsColon(String),
    #[error("Invalid column family id: {0:?}")]
    InvalidFamilyId(String),
    #[error("Range start is greater than range end.")]
    InvertedRange,
    #[error("Row sample probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),
    #[error("Cell count {0} does not fit the wire format (max 2147483647).")]
    CountOutOfRange(u32),
    #[error("Invalid label {0:?}: must be 1-15 characters of [a-z0-9-]")]
    InvalidLabel(String),
    #[error("{0} requires at least one child filter.")]
    EmptyCombinator(&'static str),
}

/// A filter tree reached the compiler in a state that constructors would have rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Malformed filter at {path}: {source}")]
    MalformedFilter {
        path: String,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChunkError {
    #[error("Malformed chunk: {0}")]
    Malformed(String),
    #[error("Read rows protocol violated: {0}")]
    Protocol(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadRowsError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error("Transport error while reading rows: {0}")]
    Transport(anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("{count} mutations exceed the maximum allowable {max}.")]
    TooManyMutations { count: usize, max: usize },
    #[error("Failed to compile predicate filter: {0}")]
    PredicateCompileError(#[from] CompileError),
    #[error("Transport error while committing mutations: {0}")]
    Transport(anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Filter validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Filter compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("Read rows error: {0}")]
    ReadRows(#[from] ReadRowsError),
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}

pub type DataResult<T> = Result<T, DataError>;
