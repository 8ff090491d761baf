//! Reassembly of streamed chunks into rows.

pub mod cell;
pub mod chunk;
pub mod partial_row;
pub mod reassembler;

pub use cell::{cells_from_wire_row, Cell, Row, RowCells};
pub use chunk::ReadRowsChunk;
pub use partial_row::{PartialRowData, RowState};
pub use reassembler::{ReadRowsIter, ReadRowsStream, RowReassembler};
