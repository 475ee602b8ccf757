//! Streaming orchestration: source → batches → format writer.
//!
//! A [`StreamExporter`] translates an unbounded lazy source into the finite
//! write/append calls a [`FormatWriter`] expects: the first batch goes
//! through the writer's `write` path (initializing headers/content), every
//! subsequent batch through its `append` path. The first-batch flag is local
//! streaming state, reset per `stream` call.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::core::FormatWriter;
use crate::error::{ExportError, Result};
use crate::record::Record;

use super::batch::{BatchHandler, BatchProcessor};

/// Callback receiving the cumulative processed count after each batch.
///
/// Invocations are strictly increasing and delivered in batch order; the
/// orchestrator waits for the callback to return before processing the next
/// batch.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Callback consulted when a batch write fails: `true` skips the batch and
/// continues the stream, `false` aborts.
pub type ErrorCallback = Arc<dyn Fn(&ExportError) -> bool + Send + Sync>;

/// Wires a [`FormatWriter`] to a [`BatchProcessor`] and reports progress.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> rowpack::Result<()> {
/// use rowpack::config::WriterConfig;
/// use rowpack::core::create_writer;
/// use rowpack::record::to_record;
/// use rowpack::stream::{StreamExporter, records_from_vec};
/// use serde_json::json;
///
/// let mut writer = create_writer(WriterConfig::new("out.csv"))?;
/// let records = vec![to_record(json!({"id": 1}))?, to_record(json!({"id": 2}))?];
///
/// let total = StreamExporter::new(writer.as_mut(), 100)
///     .stream(records_from_vec(records))
///     .await?;
/// assert_eq!(total, 2);
/// # Ok(())
/// # }
/// ```
pub struct StreamExporter<'w> {
    writer: &'w mut dyn FormatWriter,
    processor: BatchProcessor,
    progress: Option<ProgressCallback>,
    on_error: Option<ErrorCallback>,
}

impl<'w> StreamExporter<'w> {
    /// Creates an orchestrator around `writer` with the given batch size.
    pub fn new(writer: &'w mut dyn FormatWriter, batch_size: usize) -> Self {
        Self {
            writer,
            processor: BatchProcessor::new(batch_size),
            progress: None,
            on_error: None,
        }
    }

    /// Installs a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Installs an error callback deciding whether a failed batch is
    /// skipped (`true`) or aborts the stream (`false`).
    #[must_use]
    pub fn with_error_handler(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Streams `source` through the writer in bounded batches.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// A writer failure (unless the error callback elects to continue) or a
    /// source error aborts the stream immediately; no further batches are
    /// processed.
    pub async fn stream<S>(&mut self, source: S) -> Result<usize>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
    {
        let processor = self.processor;
        let mut handler = WriterBatchHandler {
            writer: &mut *self.writer,
            first_batch: true,
            written: 0,
            progress: self.progress.clone(),
            on_error: self.on_error.clone(),
        };
        processor.process(source, &mut handler).await?;
        Ok(handler.written)
    }

    /// Streams `source` with a per-record transform applied before
    /// batching. The transform may map a record or drop it (`Ok(None)`);
    /// transform errors fail the stream.
    ///
    /// # Errors
    ///
    /// Same as [`stream`](Self::stream), plus any error the transform
    /// returns.
    pub async fn stream_with_transform<S, F>(&mut self, source: S, mut transform: F) -> Result<usize>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
        F: FnMut(Record) -> Result<Option<Record>> + Send,
    {
        let transformed = source.filter_map(move |item| {
            let mapped = match item {
                Ok(record) => transform(record).transpose(),
                Err(e) => Some(Err(e)),
            };
            futures::future::ready(mapped)
        });
        self.stream(transformed).await
    }
}

/// Routes batch 1 through `write` and later batches through `append`.
struct WriterBatchHandler<'a> {
    writer: &'a mut dyn FormatWriter,
    first_batch: bool,
    written: usize,
    progress: Option<ProgressCallback>,
    on_error: Option<ErrorCallback>,
}

#[async_trait]
impl BatchHandler for WriterBatchHandler<'_> {
    async fn handle(&mut self, batch: Vec<Record>, _batch_number: usize) -> Result<()> {
        let len = batch.len();
        let result = if self.first_batch {
            self.writer.write(&batch).await
        } else {
            self.writer.append(&batch).await
        };

        match result {
            Ok(()) => {
                self.first_batch = false;
                self.written += len;
                if let Some(callback) = &self.progress {
                    callback(self.written);
                }
                Ok(())
            }
            Err(e) => match &self.on_error {
                Some(callback) if callback(&e) => Ok(()),
                _ => Err(e),
            },
        }
    }
}
