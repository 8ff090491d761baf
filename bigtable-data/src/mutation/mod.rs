//! Locally accumulated row mutations.
//!
//! Nothing is sent until a row is committed. Mutations are applied by the
//! service atomically and in order, so later mutations may mask earlier ones.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{
    error::MutationError,
    filter::TimestampRange,
    util::{timestamp_to_micros, SERVER_TIME_MICROS},
    wire::Mutation,
};

pub mod append;
pub mod conditional;
pub mod direct;

pub use append::AppendRow;
pub use conditional::ConditionalRow;
pub use direct::DirectRow;

/// Columns targeted by a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Every column of the family.
    All,
    List(Vec<Bytes>),
}

impl<T: Into<Bytes>> From<Vec<T>> for Columns {
    fn from(columns: Vec<T>) -> Self {
        Columns::List(columns.into_iter().map(Into::into).collect())
    }
}

/// An ordered list of mutations for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
}

impl MutationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` into `family:column`. Without a timestamp the service
    /// uses its own clock.
    pub fn set_cell(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        value: impl Into<Bytes>,
        timestamp: Option<DateTime<Utc>>,
    ) -> &mut Self {
        let timestamp_micros = timestamp
            .as_ref()
            .map(timestamp_to_micros)
            .unwrap_or(SERVER_TIME_MICROS);
        self.mutations.push(Mutation::SetCell {
            family_name: family.to_string(),
            column_qualifier: column.into(),
            timestamp_micros,
            value: value.into(),
        });
        self
    }

    /// Writes `value` as a 64-bit big-endian signed integer, the encoding the
    /// service uses for increments.
    pub fn set_cell_int(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        value: i64,
        timestamp: Option<DateTime<Utc>>,
    ) -> &mut Self {
        self.set_cell(
            family,
            column,
            Bytes::copy_from_slice(&value.to_be_bytes()),
            timestamp,
        )
    }

    /// Deletes the whole row.
    pub fn delete_row(&mut self) -> &mut Self {
        self.mutations.push(Mutation::DeleteFromRow);
        self
    }

    pub fn delete_cell(
        &mut self,
        family: &str,
        column: impl Into<Bytes>,
        time_range: Option<&TimestampRange>,
    ) -> &mut Self {
        self.delete_cells(family, Columns::List(vec![column.into()]), time_range)
    }

    /// Deletes cells of `columns` in `family`. `time_range` only applies to
    /// an explicit column list; [`Columns::All`] drops the whole family.
    pub fn delete_cells(
        &mut self,
        family: &str,
        columns: Columns,
        time_range: Option<&TimestampRange>,
    ) -> &mut Self {
        match columns {
            Columns::All => self.mutations.push(Mutation::DeleteFromFamily {
                family_name: family.to_string(),
            }),
            Columns::List(columns) => {
                let time_range = time_range.map(TimestampRange::to_wire);
                self.mutations
                    .extend(columns.into_iter().map(|column| Mutation::DeleteFromColumn {
                        family_name: family.to_string(),
                        column_qualifier: column,
                        time_range: time_range.clone(),
                    }));
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn clear(&mut self) {
        self.mutations.clear();
    }

    pub(crate) fn to_vec(&self) -> Vec<Mutation> {
        self.mutations.clone()
    }
}

pub(crate) fn check_mutation_count(count: usize, max: usize) -> Result<(), MutationError> {
    if count > max {
        return Err(MutationError::TooManyMutations { count, max });
    }
    Ok(())
}
