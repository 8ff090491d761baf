use bytes::Bytes;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{util::micros_to_timestamp, wire::WireRow};

/// Cells of a row: family name, then column qualifier, then the cells of that
/// column in the order the service sent them (newest first).
pub type RowCells = IndexMap<String, IndexMap<Bytes, Vec<Cell>>>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    qualifier: Bytes,
    timestamp_micros: Option<i64>,
    value: Bytes,
    labels: Vec<String>,
}

impl Cell {
    pub fn new(
        qualifier: Bytes,
        timestamp_micros: Option<i64>,
        value: Bytes,
        labels: Vec<String>,
    ) -> Self {
        Self {
            qualifier,
            timestamp_micros,
            value,
            labels,
        }
    }

    pub fn qualifier(&self) -> &Bytes {
        &self.qualifier
    }

    /// `None` when the service sent the cell without a timestamp.
    pub fn timestamp_micros(&self) -> Option<i64> {
        self.timestamp_micros
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_micros.and_then(micros_to_timestamp)
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// A fully reassembled row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    key: Bytes,
    cells: RowCells,
}

impl Row {
    pub(crate) fn new(key: Bytes, cells: RowCells) -> Self {
        Self { key, cells }
    }

    pub fn key(&self) -> &Bytes {
        &self.key
    }

    pub fn cells(&self) -> &RowCells {
        &self.cells
    }

    pub fn into_cells(self) -> RowCells {
        self.cells
    }

    /// True when every cell of the row was filtered out.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn column(&self, family: &str, qualifier: &[u8]) -> &[Cell] {
        self.cells
            .get(family)
            .and_then(|columns| columns.get(qualifier))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first (most recent) cell of a column.
    pub fn latest(&self, family: &str, qualifier: &[u8]) -> Option<&Cell> {
        self.column(family, qualifier).first()
    }
}

pub fn cells_from_wire_row(row: &WireRow) -> RowCells {
    let mut cells = RowCells::new();
    for family in &row.families {
        let columns = cells.entry(family.name.clone()).or_default();
        for column in &family.columns {
            let entry = columns.entry(column.qualifier.clone()).or_default();
            entry.extend(column.cells.iter().map(|cell| {
                Cell::new(
                    column.qualifier.clone(),
                    Some(cell.timestamp_micros),
                    cell.value.clone(),
                    cell.labels.clone(),
                )
            }));
        }
    }
    cells
}
