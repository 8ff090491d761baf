use bytes::Bytes;

use crate::{
    error::MutationError,
    filter::Filter,
    table::Table,
    wire::CheckAndMutateRowRequest,
};

use super::{check_mutation_count, MutationSet};

/// A row with two mutation lists, applied with `CheckAndMutateRow`.
///
/// When `predicate` matches any cell of the row the `true` list is applied,
/// otherwise the `false` list. The predicate is evaluated separately from the
/// mutations, not atomically with them.
#[derive(Debug, Clone)]
pub struct ConditionalRow {
    table: Table,
    row_key: Bytes,
    predicate: Filter,
    true_mutations: MutationSet,
    false_mutations: MutationSet,
}

impl ConditionalRow {
    pub(crate) fn new(table: Table, row_key: Bytes, predicate: Filter) -> Self {
        Self {
            table,
            row_key,
            predicate,
            true_mutations: MutationSet::new(),
            false_mutations: MutationSet::new(),
        }
    }

    pub fn row_key(&self) -> &Bytes {
        &self.row_key
    }

    pub fn predicate(&self) -> &Filter {
        &self.predicate
    }

    /// Mutations applied when the predicate outcome equals `state`.
    pub fn mutations(&mut self, state: bool) -> &mut MutationSet {
        if state {
            &mut self.true_mutations
        } else {
            &mut self.false_mutations
        }
    }

    pub fn clear(&mut self) {
        self.true_mutations.clear();
        self.false_mutations.clear();
    }

    /// Sends both mutation lists and clears them on success.
    ///
    /// Returns whether the predicate matched, or `None` when both lists were
    /// empty and no request was made.
    pub async fn commit(&mut self) -> Result<Option<bool>, MutationError> {
        if self.true_mutations.is_empty() && self.false_mutations.is_empty() {
            return Ok(None);
        }
        let max = self.table.max_mutations();
        check_mutation_count(self.true_mutations.len(), max)?;
        check_mutation_count(self.false_mutations.len(), max)?;

        let request = CheckAndMutateRowRequest {
            table_name: self.table.name().to_string(),
            row_key: self.row_key.clone(),
            predicate_filter: self.predicate.compile()?,
            true_mutations: self.true_mutations.to_vec(),
            false_mutations: self.false_mutations.to_vec(),
        };
        tracing::debug!(
            "Committing conditional mutations to row {:?} ({} true, {} false)",
            self.row_key,
            request.true_mutations.len(),
            request.false_mutations.len()
        );

        let response = self
            .table
            .client()
            .check_and_mutate_row(request, self.table.timeout())
            .await
            .map_err(MutationError::Transport)?;

        self.clear();
        Ok(Some(response.predicate_matched))
    }
}
