use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use futures::{ready, stream::FusedStream, Stream, StreamExt};

use crate::{
    error::{ChunkError, ReadRowsError},
    read::ReadRowsRequest,
};

use super::{cell::Row, chunk::ReadRowsChunk, partial_row::PartialRowData};

/// Outcome of feeding one element of the chunk stream.
pub(crate) enum Advance {
    NeedMore,
    Yield(Result<Row, ReadRowsError>),
    Finished,
}

/// Turns an ordered stream of chunks into complete rows.
///
/// Holds at most one row under construction. The only state kept across rows
/// is the key of the last committed row and the number of rows committed,
/// which is what a caller needs to resume a read after a transport failure.
#[derive(Debug, Default)]
pub struct RowReassembler {
    current: Option<PartialRowData>,
    last_committed_key: Option<Bytes>,
    rows_committed: u64,
    terminated: bool,
}

impl RowReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_committed_key(&self) -> Option<&Bytes> {
        self.last_committed_key.as_ref()
    }

    pub fn rows_committed(&self) -> u64 {
        self.rows_committed
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Feeds one chunk, returning the row it completes, if any.
    pub fn push_chunk(&mut self, chunk: ReadRowsChunk) -> Result<Option<Row>, ChunkError> {
        let row = self.current.get_or_insert_with(PartialRowData::new);

        if row.row_key().is_none() {
            if let (Some(key), Some(last)) = (&chunk.row_key, &self.last_committed_key) {
                if key <= last {
                    return Err(ChunkError::Protocol(format!(
                        "row {:?} arrived after row {:?}; keys must be increasing",
                        key, last
                    )));
                }
            }
        }

        match row.apply_chunk(chunk)? {
            Some(done) => {
                tracing::trace!(
                    "Committed row {:?} with {} families",
                    done.key(),
                    done.cells().len()
                );
                self.current = None;
                self.last_committed_key = Some(done.key().clone());
                self.rows_committed += 1;
                Ok(Some(done))
            }
            None => Ok(None),
        }
    }

    /// Signals the end of the chunk stream.
    pub fn finish(&mut self) -> Result<(), ChunkError> {
        match self.current.take() {
            Some(row) if row.row_key().is_some() => Err(ChunkError::Protocol(format!(
                "stream ended while row {:?} was still in progress",
                row.row_key()
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn advance<E>(&mut self, item: Option<Result<ReadRowsChunk, E>>) -> Advance
    where
        E: Into<anyhow::Error>,
    {
        if self.terminated {
            return Advance::Finished;
        }

        let result = match item {
            Some(Ok(chunk)) => match self.push_chunk(chunk) {
                Ok(Some(row)) => return Advance::Yield(Ok(row)),
                Ok(None) => return Advance::NeedMore,
                Err(err) => Err(ReadRowsError::from(err)),
            },
            Some(Err(err)) => Err(ReadRowsError::Transport(err.into())),
            None => self.finish().map_err(ReadRowsError::from),
        };

        self.terminated = true;
        self.current = None;
        match result {
            Ok(()) => Advance::Finished,
            Err(err) => {
                tracing::error!("Read rows failed: {}", err);
                Advance::Yield(Err(err))
            }
        }
    }

    /// Continues `request` after the rows committed so far. `None` when nothing remains.
    pub fn resume_request(&self, request: &ReadRowsRequest) -> Option<ReadRowsRequest> {
        match &self.last_committed_key {
            Some(key) => request.resume_after(key, self.rows_committed),
            None => Some(request.clone()),
        }
    }
}

/// Blocking adapter: pulls chunks from an iterator only until the next row is
/// complete.
///
/// The chunk source is dropped as soon as the read finishes or fails; the
/// reassembler stays available for [`RowReassembler::resume_request`].
pub struct ReadRowsIter<I> {
    chunks: Option<I>,
    reassembler: RowReassembler,
}

impl<I> ReadRowsIter<I> {
    pub fn new(chunks: I) -> Self {
        Self {
            chunks: Some(chunks),
            reassembler: RowReassembler::new(),
        }
    }

    pub fn reassembler(&self) -> &RowReassembler {
        &self.reassembler
    }

    /// Whether the chunk source has been dropped.
    pub fn is_released(&self) -> bool {
        self.chunks.is_none()
    }
}

impl<I, E> Iterator for ReadRowsIter<I>
where
    I: Iterator<Item = Result<ReadRowsChunk, E>>,
    E: Into<anyhow::Error>,
{
    type Item = Result<Row, ReadRowsError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(chunks) = self.chunks.as_mut() {
            let advance = self.reassembler.advance(chunks.next());
            if self.reassembler.is_terminated() {
                self.chunks = None;
            }
            match advance {
                Advance::NeedMore => continue,
                Advance::Yield(row) => return Some(row),
                Advance::Finished => return None,
            }
        }
        None
    }
}

/// Async adapter over a chunk stream supplied by the transport.
///
/// The chunk stream is dropped when the read finishes or fails, or when the
/// adapter itself is dropped. That is how the transport releases a read.
pub struct ReadRowsStream<S> {
    chunks: Option<S>,
    reassembler: RowReassembler,
}

impl<S> ReadRowsStream<S> {
    pub fn new(chunks: S) -> Self {
        Self {
            chunks: Some(chunks),
            reassembler: RowReassembler::new(),
        }
    }

    pub fn reassembler(&self) -> &RowReassembler {
        &self.reassembler
    }

    pub fn last_committed_key(&self) -> Option<&Bytes> {
        self.reassembler.last_committed_key()
    }

    /// Whether the chunk stream has been dropped.
    pub fn is_released(&self) -> bool {
        self.chunks.is_none()
    }
}

impl<S, E> Stream for ReadRowsStream<S>
where
    S: Stream<Item = Result<ReadRowsChunk, E>> + Unpin,
    E: Into<anyhow::Error>,
{
    type Item = Result<Row, ReadRowsError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        while let Some(chunks) = this.chunks.as_mut() {
            let item = ready!(chunks.poll_next_unpin(cx));
            let advance = this.reassembler.advance(item);
            if this.reassembler.is_terminated() {
                this.chunks = None;
            }
            match advance {
                Advance::NeedMore => continue,
                Advance::Yield(row) => return Poll::Ready(Some(row)),
                Advance::Finished => return Poll::Ready(None),
            }
        }
        Poll::Ready(None)
    }
}

impl<S, E> FusedStream for ReadRowsStream<S>
where
    S: Stream<Item = Result<ReadRowsChunk, E>> + Unpin,
    E: Into<anyhow::Error>,
{
    fn is_terminated(&self) -> bool {
        self.reassembler.is_terminated()
    }
}
