use bytes::{Bytes, BytesMut};

use crate::error::ChunkError;

use super::{
    cell::{Cell, Row, RowCells},
    chunk::ReadRowsChunk,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// No cells held. Either nothing arrived yet or the row was just reset.
    Empty,
    Accumulating,
    /// The row was handed out; the accumulator accepts no further chunks.
    Committed,
}

/// Last family and qualifier seen, used to resolve continuation chunks.
#[derive(Debug, Default)]
struct ChunkCursor {
    family: Option<String>,
    qualifier: Option<Bytes>,
}

/// A cell whose value is still arriving in pieces.
#[derive(Debug)]
struct PendingCell {
    family: String,
    qualifier: Bytes,
    timestamp_micros: Option<i64>,
    labels: Vec<String>,
    value: BytesMut,
}

/// Accumulates the chunks of a single row until it is committed.
///
/// The row key is fixed by the first chunk and survives a reset: the chunks
/// after a reset must restate the same key or leave it unset.
#[derive(Debug)]
pub struct PartialRowData {
    row_key: Option<Bytes>,
    cells: RowCells,
    cursor: ChunkCursor,
    pending: Option<PendingCell>,
    state: RowState,
}

impl Default for PartialRowData {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialRowData {
    pub fn new() -> Self {
        Self {
            row_key: None,
            cells: RowCells::new(),
            cursor: ChunkCursor::default(),
            pending: None,
            state: RowState::Empty,
        }
    }

    pub fn row_key(&self) -> Option<&Bytes> {
        self.row_key.as_ref()
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn cells(&self) -> &RowCells {
        &self.cells
    }

    /// True while a split value waits for its remaining fragments.
    pub fn has_pending_value(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies one chunk. Returns the finished row when the chunk commits it.
    pub fn apply_chunk(&mut self, chunk: ReadRowsChunk) -> Result<Option<Row>, ChunkError> {
        if self.state == RowState::Committed {
            return Err(ChunkError::Protocol(format!(
                "chunk received for row {:?} after it was committed",
                self.row_key
            )));
        }

        if chunk.reset_row {
            self.reset(chunk)?;
            return Ok(None);
        }

        self.accept_row_key(chunk.row_key.clone())?;
        self.state = RowState::Accumulating;

        let commit = chunk.commit_row;
        if self.pending.is_some() || chunk.carries_cell_data() {
            self.merge_cell(chunk)?;
        }

        if !commit {
            return Ok(None);
        }
        if self.pending.is_some() {
            return Err(ChunkError::Malformed(
                "row committed while a split value is still incomplete".to_string(),
            ));
        }

        self.state = RowState::Committed;
        let key = self.row_key.clone().unwrap_or_default();
        let cells = std::mem::take(&mut self.cells);
        Ok(Some(Row::new(key, cells)))
    }

    fn reset(&mut self, chunk: ReadRowsChunk) -> Result<(), ChunkError> {
        if chunk.commit_row {
            return Err(ChunkError::Malformed(
                "reset and commit set on the same chunk".to_string(),
            ));
        }
        if chunk.carries_cell_data() {
            return Err(ChunkError::Malformed(
                "reset chunk carries cell data".to_string(),
            ));
        }
        if self.row_key.is_none() {
            return Err(ChunkError::Malformed(
                "reset received before any row was started".to_string(),
            ));
        }
        self.accept_row_key(chunk.row_key)?;

        tracing::debug!("Resetting row {:?}", self.row_key);
        self.cells.clear();
        self.cursor = ChunkCursor::default();
        self.pending = None;
        self.state = RowState::Empty;
        Ok(())
    }

    fn accept_row_key(&mut self, row_key: Option<Bytes>) -> Result<(), ChunkError> {
        let Some(key) = row_key else {
            return match self.row_key {
                Some(_) => Ok(()),
                None => Err(ChunkError::Malformed(
                    "first chunk of a row has no row key".to_string(),
                )),
            };
        };

        if let Some(current) = &self.row_key {
            if *current != key {
                return Err(ChunkError::Protocol(format!(
                    "chunk for row {:?} arrived while row {:?} is in progress",
                    key, current
                )));
            }
            return Ok(());
        }

        if key.is_empty() {
            return Err(ChunkError::Malformed(
                "first chunk of a row has an empty row key".to_string(),
            ));
        }
        self.row_key = Some(key);
        Ok(())
    }

    fn merge_cell(&mut self, chunk: ReadRowsChunk) -> Result<(), ChunkError> {
        if let Some(mut pending) = self.pending.take() {
            if chunk.family_name.is_some()
                || chunk.qualifier.is_some()
                || chunk.timestamp_micros.is_some()
                || !chunk.labels.is_empty()
            {
                return Err(ChunkError::Malformed(
                    "split value continuation carries cell metadata".to_string(),
                ));
            }
            pending.value.extend_from_slice(&chunk.value);
            if chunk.value_split {
                self.pending = Some(pending);
            } else {
                self.finish_cell(pending);
            }
            return Ok(());
        }

        let (family, qualifier) = self.resolve_column(chunk.family_name, chunk.qualifier)?;
        self.cursor = ChunkCursor {
            family: Some(family.clone()),
            qualifier: Some(qualifier.clone()),
        };

        let pending = PendingCell {
            family,
            qualifier,
            timestamp_micros: chunk.timestamp_micros,
            labels: chunk.labels,
            value: BytesMut::from(&chunk.value[..]),
        };
        if chunk.value_split {
            self.pending = Some(pending);
        } else {
            self.finish_cell(pending);
        }
        Ok(())
    }

    fn resolve_column(
        &self,
        family: Option<String>,
        qualifier: Option<Bytes>,
    ) -> Result<(String, Bytes), ChunkError> {
        match (family, qualifier) {
            (Some(family), Some(qualifier)) => Ok((family, qualifier)),
            // Restating the current family keeps the current qualifier; a new
            // family must name its first qualifier.
            (Some(family), None) => match (&self.cursor.family, &self.cursor.qualifier) {
                (Some(current), Some(qualifier)) if *current == family => {
                    Ok((family, qualifier.clone()))
                }
                _ => Err(ChunkError::Malformed(format!(
                    "chunk starts family {:?} without a qualifier",
                    family
                ))),
            },
            (None, Some(qualifier)) => match &self.cursor.family {
                Some(family) => Ok((family.clone(), qualifier)),
                None => Err(ChunkError::Malformed(
                    "qualifier given before any family".to_string(),
                )),
            },
            (None, None) => match (&self.cursor.family, &self.cursor.qualifier) {
                (Some(family), Some(qualifier)) => Ok((family.clone(), qualifier.clone())),
                _ => Err(ChunkError::Malformed(
                    "cell chunk without a family or qualifier to continue".to_string(),
                )),
            },
        }
    }

    fn finish_cell(&mut self, pending: PendingCell) {
        let cell = Cell::new(
            pending.qualifier.clone(),
            pending.timestamp_micros,
            pending.value.freeze(),
            pending.labels,
        );
        self.cells
            .entry(pending.family)
            .or_default()
            .entry(pending.qualifier)
            .or_default()
            .push(cell);
    }
}
