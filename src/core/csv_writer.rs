//! CSV format writer.
//!
//! State machine: `Uninitialized` (no header resolved) → `Initialized`
//! (headers fixed for the writer's remaining lifetime). The transition is
//! triggered by the first successful `write`/`append` call, which resolves
//! the schema from the first record it sees.
//!
//! Header policy:
//! - `write` mode: every `write` call rewrites the header line, truncating
//!   the file, then appends the data rows — repeated `write` calls each
//!   replace prior content.
//! - `append` mode: the header line is written only if the file does not
//!   exist yet, so appends across writer instances never duplicate it.
//!
//! A UTF-8 BOM, when configured, is prepended only to the file-creating
//! header content.

use std::borrow::Cow;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::{CsvOptions, WriterConfig};
use crate::error::{ExportError, Result};
use crate::format::WriteMode;
use crate::record::Record;
use crate::sink::{FileSink, FsSink};

use super::BOM;
use super::schema::HeaderResolver;
use super::value::{CsvFormatter, flatten_record};
use super::writer::FormatWriter;

/// Writes records to a CSV file with resolve-once headers.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> rowpack::Result<()> {
/// use rowpack::config::WriterConfig;
/// use rowpack::core::{CsvWriter, FormatWriter};
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let mut writer = CsvWriter::new(WriterConfig::new("people.csv"))?;
/// writer
///     .write(&[
///         to_record(json!({"id": 1, "name": "John"}))?,
///         to_record(json!({"id": 2, "name": "Jane"}))?,
///     ])
///     .await?;
/// writer.append_one(to_record(json!({"id": 3, "name": "Bob"}))?).await?;
/// # Ok(())
/// # }
/// ```
pub struct CsvWriter<S: FileSink = FsSink> {
    path: PathBuf,
    mode: WriteMode,
    options: CsvOptions,
    resolver: HeaderResolver,
    formatter: CsvFormatter,
    sink: S,
}

impl CsvWriter<FsSink> {
    /// Creates a CSV writer targeting the real filesystem.
    ///
    /// # Errors
    ///
    /// Fails fast with a validation error for invalid configuration; no
    /// later call fails for configuration reasons.
    pub fn new(config: WriterConfig) -> Result<Self> {
        Self::with_sink(config, FsSink::new())
    }
}

impl<S: FileSink> CsvWriter<S> {
    /// Creates a CSV writer over a custom [`FileSink`].
    ///
    /// # Errors
    ///
    /// Fails fast with a validation error for invalid configuration.
    pub fn with_sink(config: WriterConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.path,
            mode: config.mode,
            resolver: HeaderResolver::new(&config.csv),
            formatter: CsvFormatter::new(config.csv.delimiter(), config.csv.quote()),
            options: config.csv,
            sink,
        })
    }

    /// Returns `true` once headers have been resolved.
    pub fn is_initialized(&self) -> bool {
        self.resolver.is_initialized()
    }

    /// Returns the resolved header labels.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] before the first
    /// successful write/append call.
    pub fn headers(&self) -> Result<&[String]> {
        self.resolver.headers()
    }

    /// Returns the resolved record keys.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] before the first
    /// successful write/append call.
    pub fn keys(&self) -> Result<&[String]> {
        self.resolver.keys()
    }

    /// Returns a reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn effective<'a>(&self, record: &'a Record) -> Cow<'a, Record> {
        if self.options.flatten {
            Cow::Owned(flatten_record(record))
        } else {
            Cow::Borrowed(record)
        }
    }

    fn initialize_from(&mut self, records: &[Record]) -> Result<()> {
        if self.resolver.is_initialized() {
            return Ok(());
        }
        let sample = self.effective(&records[0]);
        self.resolver.initialize(&sample)
    }

    fn header_content(&self) -> Result<String> {
        let line = self.formatter.format_fields(self.resolver.headers()?);
        let mut content = String::new();
        if self.options.bom {
            content.push_str(BOM);
        }
        content.push_str(&line);
        content.push('\n');
        Ok(content)
    }

    fn render_rows(&self, records: &[Record]) -> Result<String> {
        let mut rows = String::new();
        for record in records {
            let values = self.resolver.values(&self.effective(record))?;
            rows.push_str(&self.formatter.format_row(&values)?);
            rows.push('\n');
        }
        Ok(rows)
    }

    fn reject_empty(records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Err(ExportError::validation("Cannot write empty data array"));
        }
        Ok(())
    }

    /// Prepares everything a write call needs before touching the sink.
    fn prepare_write(&mut self, records: &[Record]) -> Result<(String, String)> {
        Self::reject_empty(records)?;
        self.initialize_from(records)?;
        Ok((self.header_content()?, self.render_rows(records)?))
    }

    /// Prepares an append; `None` means the empty-batch no-op.
    fn prepare_append(&mut self, records: &[Record]) -> Result<Option<(String, String)>> {
        if records.is_empty() {
            return Ok(None);
        }
        self.initialize_from(records)?;
        Ok(Some((self.header_content()?, self.render_rows(records)?)))
    }
}

#[async_trait]
impl<S: FileSink> FormatWriter for CsvWriter<S> {
    async fn write(&mut self, records: &[Record]) -> Result<()> {
        let (header, rows) = self.prepare_write(records)?;
        match self.mode {
            WriteMode::Write => {
                self.sink.write(&self.path, &header).await?;
            }
            WriteMode::Append => {
                if !self.sink.exists(&self.path).await {
                    self.sink.append(&self.path, &header).await?;
                }
            }
        }
        self.sink.append(&self.path, &rows).await
    }

    async fn append(&mut self, records: &[Record]) -> Result<()> {
        let Some((header, rows)) = self.prepare_append(records)? else {
            return Ok(());
        };
        if !self.sink.exists(&self.path).await {
            self.sink.append(&self.path, &header).await?;
        }
        self.sink.append(&self.path, &rows).await
    }

    fn write_sync(&mut self, records: &[Record]) -> Result<()> {
        let (header, rows) = self.prepare_write(records)?;
        match self.mode {
            WriteMode::Write => {
                self.sink.write_sync(&self.path, &header)?;
            }
            WriteMode::Append => {
                if !self.sink.exists_sync(&self.path) {
                    self.sink.append_sync(&self.path, &header)?;
                }
            }
        }
        self.sink.append_sync(&self.path, &rows)
    }

    fn append_sync(&mut self, records: &[Record]) -> Result<()> {
        let Some((header, rows)) = self.prepare_append(records)? else {
            return Ok(());
        };
        if !self.sink.exists_sync(&self.path) {
            self.sink.append_sync(&self.path, &header)?;
        }
        self.sink.append_sync(&self.path, &rows)
    }
}
