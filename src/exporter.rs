//! High-level export builder with lifecycle hooks.
//!
//! The [`Exporter`] is the front door of the crate: it assembles a
//! [`WriterConfig`] through chained setters, optionally installs lifecycle
//! hooks, and exposes terminal operations for one-shot writes, appends, and
//! batched streaming. Each one-shot operation constructs a fresh format
//! writer, so repeated calls on the same [`Exporter`] behave like independent
//! exports; streaming operations hold one writer for the whole stream so the
//! CSV schema stays fixed across batches.
//!
//! All hooks are synchronous closures. The blocking operations therefore
//! invoke every hook before returning their `Result`; callers needing async
//! work inside a hook must bridge it themselves.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> rowpack::Result<()> {
//! use rowpack::Exporter;
//! use rowpack::record::to_record;
//! use serde_json::json;
//!
//! let records = vec![
//!     to_record(json!({"id": 1, "name": "John"}))?,
//!     to_record(json!({"id": 2, "name": "Jane"}))?,
//! ];
//!
//! let count = Exporter::new("users.csv")
//!     .with_delimiter(';')
//!     .on_complete(|ok, total| println!("done: ok={ok} total={total}"))
//!     .write_sync(records)?;
//! assert_eq!(count, 2);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;

use crate::config::{CsvOptions, JsonOptions, WriterConfig};
use crate::core::{FormatWriter, create_writer};
use crate::error::{ExportError, Result};
use crate::format::{ExportFormat, WriteMode};
use crate::record::Record;
use crate::stream::{BatchHandler, BatchProcessor};

/// Transforms or filters the record array before it is written.
pub type BeforeWriteHook = Arc<dyn Fn(Vec<Record>) -> Result<Vec<Record>> + Send + Sync>;

/// Receives `(processed, total)` — `total` is `Some` for one-shot operations
/// and `None` while streaming (the source length is unknown).
pub type ProgressHook = Arc<dyn Fn(usize, Option<usize>) + Send + Sync>;

/// Observes the records just written and the cumulative count.
pub type AfterWriteHook = Arc<dyn Fn(&[Record], usize) + Send + Sync>;

/// Consulted on failure; for streaming operations, returning `true` skips
/// the failed batch and continues the stream.
pub type ErrorHook = Arc<dyn Fn(&ExportError) -> bool + Send + Sync>;

/// Invoked once per terminal operation with `(succeeded, total_written)`.
pub type CompleteHook = Arc<dyn Fn(bool, usize) + Send + Sync>;

#[derive(Clone, Default)]
struct Hooks {
    before_write: Option<BeforeWriteHook>,
    progress: Option<ProgressHook>,
    after_write: Option<AfterWriteHook>,
    on_error: Option<ErrorHook>,
    on_complete: Option<CompleteHook>,
}

impl Hooks {
    fn apply_before(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        match &self.before_write {
            Some(hook) => hook(records),
            None => Ok(records),
        }
    }

    fn notify_success(&self, records: &[Record], total: usize, known_total: Option<usize>) {
        if let Some(hook) = &self.after_write {
            hook(records, total);
        }
        if let Some(hook) = &self.progress {
            hook(total, known_total);
        }
    }

    fn notify_failure(&self, error: &ExportError) -> bool {
        match &self.on_error {
            Some(hook) => hook(error),
            None => false,
        }
    }

    fn notify_complete(&self, succeeded: bool, total: usize) {
        if let Some(hook) = &self.on_complete {
            hook(succeeded, total);
        }
    }
}

/// Fluent export builder.
///
/// Configuration setters mirror [`WriterConfig`]; `on_*` setters install
/// lifecycle hooks; terminal operations perform the export.
#[derive(Clone)]
pub struct Exporter {
    config: WriterConfig,
    hooks: Hooks,
}

impl Exporter {
    /// Creates an exporter targeting `path` with default configuration
    /// (CSV, write mode, batch size 100).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config: WriterConfig::new(path),
            hooks: Hooks::default(),
        }
    }

    /// Creates an exporter whose format is detected from the path
    /// extension, falling back to CSV for unknown extensions.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = path
            .to_str()
            .and_then(|p| ExportFormat::from_path(p).ok())
            .unwrap_or_default();
        Self::new(path).with_format(format)
    }

    /// Returns the assembled configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    // === Configuration ===

    /// Sets the target format.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.config = self.config.with_format(format);
        self
    }

    /// Sets the write mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.config = self.config.with_mode(mode);
        self
    }

    /// Sets the streaming batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config = self.config.with_batch_size(batch_size);
        self
    }

    /// Sets the CSV delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.config = self.config.with_delimiter(delimiter);
        self
    }

    /// Sets the CSV quote character.
    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.config = self.config.with_quote(quote);
        self
    }

    /// Replaces the CSV options wholesale.
    #[must_use]
    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.config = self.config.with_csv_options(csv);
        self
    }

    /// Replaces the JSON options wholesale.
    #[must_use]
    pub fn with_json_options(mut self, json: JsonOptions) -> Self {
        self.config = self.config.with_json_options(json);
        self
    }

    // === Hooks ===

    /// Installs a hook that may transform or filter the records before
    /// each write. For streaming operations it runs once per batch.
    #[must_use]
    pub fn on_before_write<F>(mut self, hook: F) -> Self
    where
        F: Fn(Vec<Record>) -> Result<Vec<Record>> + Send + Sync + 'static,
    {
        self.hooks.before_write = Some(Arc::new(hook));
        self
    }

    /// Installs a progress hook receiving `(processed, total)`.
    #[must_use]
    pub fn on_progress<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, Option<usize>) + Send + Sync + 'static,
    {
        self.hooks.progress = Some(Arc::new(hook));
        self
    }

    /// Installs a hook observing each successfully written batch.
    #[must_use]
    pub fn on_after_write<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[Record], usize) + Send + Sync + 'static,
    {
        self.hooks.after_write = Some(Arc::new(hook));
        self
    }

    /// Installs an error hook. For streaming operations its return value
    /// decides whether the failed batch is skipped (`true`) or the stream
    /// aborts (`false`); for one-shot operations it only observes the
    /// failure, which is returned regardless.
    #[must_use]
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ExportError) -> bool + Send + Sync + 'static,
    {
        self.hooks.on_error = Some(Arc::new(hook));
        self
    }

    /// Installs a completion hook invoked once per terminal operation.
    #[must_use]
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(bool, usize) + Send + Sync + 'static,
    {
        self.hooks.on_complete = Some(Arc::new(hook));
        self
    }

    // === Terminal operations ===

    /// Writes `records` as one array, replacing prior content in write
    /// mode. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty record array, formatting failures,
    /// and sink failures all surface here.
    pub async fn write(&self, records: Vec<Record>) -> Result<usize> {
        let records = self.prepare(records)?;
        let mut writer = create_writer(self.config.clone())?;
        let outcome = writer.write(&records).await;
        self.settle(records, outcome)
    }

    /// Blocking variant of [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Same conditions as [`write`](Self::write).
    pub fn write_sync(&self, records: Vec<Record>) -> Result<usize> {
        let records = self.prepare(records)?;
        let mut writer = create_writer(self.config.clone())?;
        let outcome = writer.write_sync(&records);
        self.settle(records, outcome)
    }

    /// Appends `records` to the target file. An empty array is a no-op
    /// success. Returns the number of records appended.
    ///
    /// # Errors
    ///
    /// Invalid configuration, formatting failures, and sink failures all
    /// surface here.
    pub async fn append(&self, records: Vec<Record>) -> Result<usize> {
        let records = self.prepare(records)?;
        let mut writer = create_writer(self.config.clone())?;
        let outcome = writer.append(&records).await;
        self.settle(records, outcome)
    }

    /// Blocking variant of [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// Same conditions as [`append`](Self::append).
    pub fn append_sync(&self, records: Vec<Record>) -> Result<usize> {
        let records = self.prepare(records)?;
        let mut writer = create_writer(self.config.clone())?;
        let outcome = writer.append_sync(&records);
        self.settle(records, outcome)
    }

    /// Appends a single record.
    ///
    /// # Errors
    ///
    /// Same conditions as [`append`](Self::append).
    pub async fn append_one(&self, record: Record) -> Result<usize> {
        self.append(vec![record]).await
    }

    /// Streams records from an asynchronous source in configured-size
    /// batches: the first batch initializes the file, every later batch is
    /// appended. Returns the total number of records written.
    ///
    /// # Errors
    ///
    /// A source error always aborts the stream. A batch failure aborts
    /// unless the error hook elects to skip it.
    pub async fn from_stream<S>(&self, source: S) -> Result<usize>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
    {
        let mut writer = create_writer(self.config.clone())?;
        let processor = BatchProcessor::new(self.config.batch_size);
        let mut handler = HookedBatchHandler {
            writer: writer.as_mut(),
            hooks: &self.hooks,
            first_batch: true,
            written: 0,
        };

        match processor.process(source, &mut handler).await {
            Ok(_) => {
                let total = handler.written;
                self.hooks.notify_complete(true, total);
                Ok(total)
            }
            Err(e) => {
                self.hooks.notify_complete(false, handler.written);
                Err(e)
            }
        }
    }

    /// Streams from a source produced by `factory`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_stream`](Self::from_stream).
    pub async fn stream<S, F>(&self, factory: F) -> Result<usize>
    where
        S: Stream<Item = Result<Record>> + Unpin + Send,
        F: FnOnce() -> S,
    {
        self.from_stream(factory()).await
    }

    fn prepare(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        self.hooks.apply_before(records).map_err(|e| {
            self.hooks.notify_failure(&e);
            self.hooks.notify_complete(false, 0);
            e
        })
    }

    fn settle(&self, records: Vec<Record>, outcome: Result<()>) -> Result<usize> {
        match outcome {
            Ok(()) => {
                let count = records.len();
                self.hooks.notify_success(&records, count, Some(count));
                self.hooks.notify_complete(true, count);
                Ok(count)
            }
            Err(e) => {
                self.hooks.notify_failure(&e);
                self.hooks.notify_complete(false, 0);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Batch handler running the full hook lifecycle around each batch.
struct HookedBatchHandler<'a> {
    writer: &'a mut dyn FormatWriter,
    hooks: &'a Hooks,
    first_batch: bool,
    written: usize,
}

#[async_trait]
impl BatchHandler for HookedBatchHandler<'_> {
    async fn handle(&mut self, batch: Vec<Record>, _batch_number: usize) -> Result<()> {
        let batch = match self.hooks.apply_before(batch) {
            Ok(batch) => batch,
            Err(e) => {
                return if self.hooks.notify_failure(&e) {
                    Ok(())
                } else {
                    Err(e)
                };
            }
        };
        if batch.is_empty() {
            return Ok(());
        }

        let result = if self.first_batch {
            self.writer.write(&batch).await
        } else {
            self.writer.append(&batch).await
        };

        match result {
            Ok(()) => {
                self.first_batch = false;
                self.written += batch.len();
                self.hooks.notify_success(&batch, self.written, None);
                Ok(())
            }
            Err(e) => {
                if self.hooks.notify_failure(&e) {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }
}
