//! Bounded-memory batch assembly over asynchronous record sources.
//!
//! A [`BatchProcessor`] pulls records from a [`Stream`] one at a time,
//! groups them into fixed-size batches, and dispatches each batch to a
//! [`BatchHandler`]. Handling is strictly sequential: batch *N+1* is never
//! assembled before batch *N*'s handler has completed, so a slow sink
//! naturally throttles how fast the source is drained.

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::Result;
use crate::record::Record;

/// Receives one batch at a time from a [`BatchProcessor`].
///
/// Batch numbers are 1-based and strictly increasing. The processor awaits
/// each invocation before pulling further records from the source.
#[async_trait]
pub trait BatchHandler: Send {
    /// Handles one assembled batch.
    async fn handle(&mut self, batch: Vec<Record>, batch_number: usize) -> Result<()>;
}

/// Groups a lazy/asynchronous sequence of records into bounded batches.
///
/// # Example
///
/// ```rust
/// use rowpack::stream::{BatchHandler, BatchProcessor, records_from_vec};
/// use rowpack::record::{Record, to_record};
/// use serde_json::json;
///
/// struct Count(Vec<usize>);
///
/// #[async_trait::async_trait]
/// impl BatchHandler for Count {
///     async fn handle(&mut self, batch: Vec<Record>, _n: usize) -> rowpack::Result<()> {
///         self.0.push(batch.len());
///         Ok(())
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> rowpack::Result<()> {
/// let records: Vec<Record> = (0..12)
///     .map(|i| to_record(json!({"id": i})).unwrap())
///     .collect();
///
/// let mut handler = Count(Vec::new());
/// let total = BatchProcessor::new(5)
///     .process(records_from_vec(records), &mut handler)
///     .await?;
///
/// assert_eq!(total, 12);
/// assert_eq!(handler.0, vec![5, 5, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor {
    batch_size: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchProcessor {
    /// Creates a processor with the given batch size (clamped to at least 1).
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Drains `source`, dispatching full batches to `handler` and one final
    /// partial batch if records remain. Returns the total record count.
    ///
    /// An empty source yields zero handler invocations and a total of 0.
    ///
    /// # Errors
    ///
    /// The first handler failure or source error aborts processing and is
    /// returned as-is; no further batches are assembled.
    pub async fn process<S, H>(&self, mut source: S, handler: &mut H) -> Result<usize>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
        H: BatchHandler + ?Sized,
    {
        let mut buffer: Vec<Record> = Vec::with_capacity(self.batch_size);
        let mut batch_number = 0;
        let mut total = 0;

        while let Some(item) = source.next().await {
            buffer.push(item?);
            if buffer.len() == self.batch_size {
                batch_number += 1;
                total += buffer.len();
                handler
                    .handle(std::mem::take(&mut buffer), batch_number)
                    .await?;
            }
        }

        if !buffer.is_empty() {
            batch_number += 1;
            total += buffer.len();
            handler.handle(buffer, batch_number).await?;
        }

        Ok(total)
    }

    /// Materializes the whole source into memory.
    ///
    /// # Errors
    ///
    /// Returns the first source error encountered.
    pub async fn collect_all<S>(mut source: S) -> Result<Vec<Record>>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
    {
        let mut records = Vec::new();
        while let Some(item) = source.next().await {
            records.push(item?);
        }
        Ok(records)
    }

    /// Materializes up to `limit` records, then stops pulling from the
    /// source (it is never over-consumed).
    ///
    /// # Errors
    ///
    /// Returns the first source error encountered before the limit.
    pub async fn collect_limit<S>(mut source: S, limit: usize) -> Result<Vec<Record>>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
    {
        let mut records = Vec::with_capacity(limit);
        while records.len() < limit {
            match source.next().await {
                Some(item) => records.push(item?),
                None => break,
            }
        }
        Ok(records)
    }
}
