use bytes::Bytes;

use crate::{
    error::MutationError,
    row_data::{cells_from_wire_row, RowCells},
    table::Table,
    wire::{ReadModifyWriteRule, ReadModifyWriteRowRequest},
};

/// A row modified atomically on the server with `ReadModifyWriteRow`.
///
/// Each rule reads the latest cell of a column and writes a new cell derived
/// from it, timestamped with the server time or the newest existing timestamp
/// of the column, whichever is greater.
#[derive(Debug, Clone)]
pub struct AppendRow {
    table: Table,
    row_key: Bytes,
    rules: Vec<ReadModifyWriteRule>,
}

impl AppendRow {
    pub(crate) fn new(table: Table, row_key: Bytes) -> Self {
        Self {
            table,
            row_key,
            rules: Vec::new(),
        }
    }

    pub fn row_key(&self) -> &Bytes {
        &self.row_key
    }

    pub fn rules(&self) -> &[ReadModifyWriteRule] {
        &self.rules
    }

    /// Appends `value` to the cell. An unset cell counts as empty.
    pub fn append_cell_value(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> &mut Self {
        self.rules.push(ReadModifyWriteRule::AppendValue {
            family_name: family.to_string(),
            column_qualifier: column.into(),
            value: value.into(),
        });
        self
    }

    /// Adds `amount` to the cell, which must hold a 64-bit big-endian integer
    /// or be unset (counted as zero); otherwise the whole commit fails.
    pub fn increment_cell_value(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        amount: i64,
    ) -> &mut Self {
        self.rules.push(ReadModifyWriteRule::IncrementAmount {
            family_name: family.to_string(),
            column_qualifier: column.into(),
            amount,
        });
        self
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Sends the rules and returns the new contents of every modified cell.
    /// With no rules no request is made and the result is empty.
    pub async fn commit(&mut self) -> Result<RowCells, MutationError> {
        if self.rules.is_empty() {
            return Ok(RowCells::new());
        }

        let request = ReadModifyWriteRowRequest {
            table_name: self.table.name().to_string(),
            row_key: self.row_key.clone(),
            rules: self.rules.clone(),
        };
        tracing::debug!(
            "Committing {} read-modify-write rules to row {:?}",
            request.rules.len(),
            self.row_key
        );

        let row = self
            .table
            .client()
            .read_modify_write_row(request, self.table.timeout())
            .await
            .map_err(MutationError::Transport)?;

        self.rules.clear();
        Ok(cells_from_wire_row(&row))
    }
}
