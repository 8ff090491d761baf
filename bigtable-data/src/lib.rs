//! Row filters, their compilation into the service's filter grammar, and
//! reassembly of streamed `ReadRows` chunks into rows.

pub mod client;
pub mod compiler;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod read;
pub mod row_data;
pub mod table;
pub mod util;
pub mod wire;

pub use client::{ChunkStream, DataClient};
pub use compiler::compile;
pub use error::{
    ChunkError, CompileError, DataError, DataResult, MutationError, ReadRowsError, ValidationError,
};
pub use filter::{ColumnRange, Condition, Filter, TimestampRange, ValueRange};
pub use mutation::{AppendRow, Columns, ConditionalRow, DirectRow, MutationSet};
pub use read::{ReadRowsRequest, RowRange, RowSet};
pub use row_data::{Cell, ReadRowsChunk, ReadRowsIter, ReadRowsStream, Row, RowCells};
pub use table::Table;
