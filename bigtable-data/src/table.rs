use std::{sync::Arc, time::Duration};

use bigtable_config::Config;
use bytes::Bytes;
use futures::StreamExt;

use crate::{
    client::{ChunkStream, DataClient},
    error::{DataResult, ReadRowsError},
    filter::Filter,
    mutation::{AppendRow, ConditionalRow, DirectRow},
    read::{ReadRowsRequest, RowSet},
    row_data::{ReadRowsStream, Row},
};

/// Handle on one table. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    client: Arc<dyn DataClient>,
    timeout: Duration,
    max_mutations: usize,
}

impl Table {
    pub fn new(client: Arc<dyn DataClient>, config: &Config, table_id: &str) -> Self {
        Self {
            name: config.table_name(table_id),
            client,
            timeout: Duration::from_secs(config.timeout_seconds),
            max_mutations: config.max_mutations,
        }
    }

    /// Fully qualified table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_mutations(&self) -> usize {
        self.max_mutations
    }

    pub(crate) fn client(&self) -> &Arc<dyn DataClient> {
        &self.client
    }

    pub fn row(&self, row_key: impl Into<Bytes>) -> DirectRow {
        DirectRow::new(self.clone(), row_key.into())
    }

    /// A row whose mutations are applied depending on whether `predicate`
    /// matches any of its cells.
    pub fn conditional_row(&self, row_key: impl Into<Bytes>, predicate: Filter) -> ConditionalRow {
        ConditionalRow::new(self.clone(), row_key.into(), predicate)
    }

    pub fn append_row(&self, row_key: impl Into<Bytes>) -> AppendRow {
        AppendRow::new(self.clone(), row_key.into())
    }

    /// Starts a streaming read. Rows are reassembled lazily as the returned
    /// stream is polled.
    pub async fn read_rows(
        &self,
        rows: RowSet,
        filter: Option<&Filter>,
        rows_limit: Option<u64>,
    ) -> DataResult<ReadRowsStream<ChunkStream>> {
        let mut request = ReadRowsRequest::new(self.name.clone(), rows);
        if let Some(filter) = filter {
            request = request.with_filter(filter)?;
        }
        if let Some(limit) = rows_limit {
            request = request.with_rows_limit(limit);
        }
        self.read_rows_request(request).await
    }

    /// Starts a read from a prepared request, e.g. one produced by
    /// [`ReadRowsRequest::resume_after`].
    pub async fn read_rows_request(
        &self,
        request: ReadRowsRequest,
    ) -> DataResult<ReadRowsStream<ChunkStream>> {
        tracing::debug!("Reading rows from {}: {:?}", self.name, request.rows);
        let chunks = self
            .client
            .read_rows(request, self.timeout)
            .await
            .map_err(ReadRowsError::Transport)?;
        Ok(ReadRowsStream::new(chunks))
    }

    /// Reads a single row. `None` when the service returned no row for the key.
    /// A row whose cells were all filtered out comes back as an empty row.
    pub async fn read_row(
        &self,
        row_key: impl Into<Bytes>,
        filter: Option<&Filter>,
    ) -> DataResult<Option<Row>> {
        let mut rows = self
            .read_rows(RowSet::Key(row_key.into()), filter, None)
            .await?;
        Ok(rows.next().await.transpose()?)
    }
}
