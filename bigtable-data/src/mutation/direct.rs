use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{
    error::MutationError,
    filter::TimestampRange,
    table::Table,
    wire::{Mutation, MutateRowRequest},
};

use super::{check_mutation_count, Columns, MutationSet};

/// A row whose mutations are applied unconditionally with `MutateRow`.
#[derive(Debug, Clone)]
pub struct DirectRow {
    table: Table,
    row_key: Bytes,
    mutations: MutationSet,
}

impl DirectRow {
    pub(crate) fn new(table: Table, row_key: Bytes) -> Self {
        Self {
            table,
            row_key,
            mutations: MutationSet::new(),
        }
    }

    pub fn row_key(&self) -> &Bytes {
        &self.row_key
    }

    pub fn mutations(&self) -> &[Mutation] {
        self.mutations.as_slice()
    }

    pub fn set_cell(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        value: impl Into<Bytes>,
        timestamp: Option<DateTime<Utc>>,
    ) -> &mut Self {
        self.mutations.set_cell(family, column, value, timestamp);
        self
    }

    pub fn set_cell_int(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        value: i64,
        timestamp: Option<DateTime<Utc>>,
    ) -> &mut Self {
        self.mutations.set_cell_int(family, column, value, timestamp);
        self
    }

    pub fn delete(&mut self) -> &mut Self {
        self.mutations.delete_row();
        self
    }

    pub fn delete_cell(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        time_range: Option<&TimestampRange>,
    ) -> &mut Self {
        self.mutations.delete_cell(family, column, time_range);
        self
    }

    pub fn delete_cells(
        &mut self,
        family: &str,
        columns: Columns,
        time_range: Option<&TimestampRange>,
    ) -> &mut Self {
        self.mutations.delete_cells(family, columns, time_range);
        self
    }

    pub fn clear(&mut self) {
        self.mutations.clear();
    }

    /// Sends the accumulated mutations and clears them on success. No request
    /// is made when there is nothing to send.
    pub async fn commit(&mut self) -> Result<(), MutationError> {
        if self.mutations.is_empty() {
            return Ok(());
        }
        check_mutation_count(self.mutations.len(), self.table.max_mutations())?;

        let request = MutateRowRequest {
            table_name: self.table.name().to_string(),
            row_key: self.row_key.clone(),
            mutations: self.mutations.to_vec(),
        };
        tracing::debug!(
            "Committing {} mutations to row {:?}",
            request.mutations.len(),
            self.row_key
        );

        self.table
            .client()
            .mutate_row(request, self.table.timeout())
            .await
            .map_err(MutationError::Transport)?;

        self.mutations.clear();
        Ok(())
    }
}
