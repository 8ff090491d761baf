use std::time::Duration;

use futures::stream::BoxStream;

use crate::{
    read::ReadRowsRequest,
    row_data::ReadRowsChunk,
    wire::{
        CheckAndMutateRowRequest, CheckAndMutateRowResponse, MutateRowRequest,
        ReadModifyWriteRowRequest, WireRow,
    },
};

/// Ordered chunks of a single `ReadRows` call.
pub type ChunkStream = BoxStream<'static, anyhow::Result<ReadRowsChunk>>;

/// The transport seam.
///
/// Implementations own connections, credentials and retries. Every call gets
/// the deadline configured on the [`Table`](crate::table::Table) issuing it.
#[async_trait::async_trait]
pub trait DataClient: std::fmt::Debug + Send + Sync {
    async fn read_rows(
        &self,
        request: ReadRowsRequest,
        timeout: Duration,
    ) -> anyhow::Result<ChunkStream>;

    async fn mutate_row(&self, request: MutateRowRequest, timeout: Duration)
        -> anyhow::Result<()>;

    async fn check_and_mutate_row(
        &self,
        request: CheckAndMutateRowRequest,
        timeout: Duration,
    ) -> anyhow::Result<CheckAndMutateRowResponse>;

    async fn read_modify_write_row(
        &self,
        request: ReadModifyWriteRowRequest,
        timeout: Duration,
    ) -> anyhow::Result<WireRow>;
}
