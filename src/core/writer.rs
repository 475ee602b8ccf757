//! The uniform write/append contract shared by all format writers.
//!
//! A [`FormatWriter`] hides the per-format details (CSV header state, JSON
//! in-memory mirror) behind four operations: `write` / `append` in async and
//! blocking variants. The [`create_writer`] factory selects the concrete
//! writer from a [`WriterConfig`].
//!
//! # Shared-resource discipline
//!
//! A writer instance must have one exclusive owner; its schema and mirror
//! state are not safe for concurrent mutation. Rust's `&mut self` receivers
//! enforce this at compile time.

use async_trait::async_trait;

use crate::config::WriterConfig;
use crate::error::Result;
use crate::record::Record;

/// Uniform write/append contract over CSV and JSON writers.
///
/// All operations return a [`Result`] rather than panicking; the only
/// fail-fast path is configuration validation at construction.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> rowpack::Result<()> {
/// use rowpack::config::WriterConfig;
/// use rowpack::core::create_writer;
/// use rowpack::format::ExportFormat;
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let config = WriterConfig::new("out.json").with_format(ExportFormat::Json);
/// let mut writer = create_writer(config)?;
/// writer.write(&[to_record(json!({"id": 1}))?]).await?;
/// writer.append_one(to_record(json!({"id": 2}))?).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FormatWriter: Send {
    /// Writes a full record array.
    ///
    /// Rejects an empty input with a validation error. In `write` mode this
    /// replaces prior file content; in `append` mode it extends it.
    async fn write(&mut self, records: &[Record]) -> Result<()>;

    /// Appends a batch of records. An empty batch is a no-op success.
    async fn append(&mut self, records: &[Record]) -> Result<()>;

    /// Blocking variant of [`write`](Self::write).
    fn write_sync(&mut self, records: &[Record]) -> Result<()>;

    /// Blocking variant of [`append`](Self::append).
    fn append_sync(&mut self, records: &[Record]) -> Result<()>;

    /// Appends a single record, normalized to a one-element batch.
    async fn append_one(&mut self, record: Record) -> Result<()> {
        self.append(std::slice::from_ref(&record)).await
    }

    /// Blocking variant of [`append_one`](Self::append_one).
    fn append_one_sync(&mut self, record: Record) -> Result<()> {
        self.append_sync(std::slice::from_ref(&record))
    }
}

impl std::fmt::Debug for dyn FormatWriter + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FormatWriter")
    }
}

/// Selects and constructs a format writer from configuration.
///
/// Validates the configuration once; a returned writer never fails a later
/// call because of configuration.
///
/// # Errors
///
/// Returns a validation error for invalid configuration, or when the
/// required output feature is not enabled.
pub fn create_writer(config: WriterConfig) -> Result<Box<dyn FormatWriter>> {
    match config.format {
        #[cfg(feature = "csv-output")]
        crate::format::ExportFormat::Csv => Ok(Box::new(super::CsvWriter::new(config)?)),
        #[cfg(feature = "json-output")]
        crate::format::ExportFormat::Json => Ok(Box::new(super::JsonWriter::new(config)?)),
        #[allow(unreachable_patterns)]
        format => Err(crate::error::ExportError::validation(format!(
            "output format {format} requires the '{}' feature to be enabled",
            match format {
                crate::format::ExportFormat::Csv => "csv-output",
                _ => "json-output",
            }
        ))),
    }
}
