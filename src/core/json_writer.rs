//! JSON format writer.
//!
//! JSON has no row-append primitive: the on-disk representation is a single
//! array literal that must be rewritten wholesale on every append. The
//! writer therefore keeps a full in-memory mirror of the target array.
//!
//! State machine: `Unloaded` (mirror not yet synced with disk) → `Loaded`
//! (mirror equals disk content plus pending additions). The load happens
//! lazily exactly once, on the first call that needs existing content: a
//! UTF-8 BOM prefix is tolerated, a non-array value is coerced to a
//! one-element array, and unparsable content is a formatting error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{JsonOptions, WriterConfig};
use crate::error::{ExportError, Result};
use crate::format::WriteMode;
use crate::record::Record;
use crate::sink::{FileSink, FsSink};

use super::BOM;
use super::json_format::JsonFormatter;
use super::writer::FormatWriter;

/// Writes records to a JSON file as one well-formed array.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> rowpack::Result<()> {
/// use rowpack::config::WriterConfig;
/// use rowpack::core::{FormatWriter, JsonWriter};
/// use rowpack::format::ExportFormat;
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let config = WriterConfig::new("people.json").with_format(ExportFormat::Json);
/// let mut writer = JsonWriter::new(config)?;
/// writer.write(&[to_record(json!({"id": 1}))?]).await?;
/// writer.append_one(to_record(json!({"id": 2}))?).await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonWriter<S: FileSink = FsSink> {
    path: PathBuf,
    mode: WriteMode,
    options: JsonOptions,
    formatter: JsonFormatter,
    /// `None` until the first load; then mirrors disk plus pending records.
    mirror: Option<Vec<Value>>,
    sink: S,
}

impl JsonWriter<FsSink> {
    /// Creates a JSON writer targeting the real filesystem.
    ///
    /// # Errors
    ///
    /// Fails fast with a validation error for invalid configuration; no
    /// later call fails for configuration reasons.
    pub fn new(config: WriterConfig) -> Result<Self> {
        Self::with_sink(config, FsSink::new())
    }
}

impl<S: FileSink> JsonWriter<S> {
    /// Creates a JSON writer over a custom [`FileSink`].
    ///
    /// # Errors
    ///
    /// Fails fast with a validation error for invalid configuration.
    pub fn with_sink(config: WriterConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.path,
            mode: config.mode,
            formatter: JsonFormatter::new(&config.json),
            options: config.json,
            mirror: None,
            sink,
        })
    }

    /// Returns a reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns `true` once the mirror has been synced with disk content.
    pub fn is_loaded(&self) -> bool {
        self.mirror.is_some()
    }

    fn parse_existing(content: &str, path: &Path) -> Result<Vec<Value>> {
        let text = content.strip_prefix(BOM).unwrap_or(content);
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ExportError::json_formatting(format!("file {}", path.display()), e))?;
        Ok(match value {
            Value::Array(items) => items,
            other => vec![other],
        })
    }

    fn ensure_loaded_sync(&mut self) -> Result<()> {
        if self.mirror.is_some() {
            return Ok(());
        }
        let initial = if self.sink.exists_sync(&self.path) {
            let content = self.sink.read_sync(&self.path)?;
            Self::parse_existing(&content, &self.path)?
        } else {
            Vec::new()
        };
        self.mirror = Some(initial);
        Ok(())
    }

    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.mirror.is_some() {
            return Ok(());
        }
        let initial = if self.sink.exists(&self.path).await {
            let content = self.sink.read(&self.path).await?;
            Self::parse_existing(&content, &self.path)?
        } else {
            Vec::new()
        };
        self.mirror = Some(initial);
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let items = self.mirror.as_deref().unwrap_or_default();
        let mut content = String::new();
        if self.options.bom {
            content.push_str(BOM);
        }
        content.push_str(&self.formatter.format_array(items)?);
        Ok(content)
    }

    fn as_values(records: &[Record]) -> Vec<Value> {
        records.iter().cloned().map(Value::Object).collect()
    }

    fn reject_empty(records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Err(ExportError::validation("Cannot write empty data array"));
        }
        Ok(())
    }

    /// Updates the mirror for a `write` call; the caller persists after.
    fn stage_write_sync(&mut self, records: &[Record]) -> Result<()> {
        Self::reject_empty(records)?;
        match self.mode {
            WriteMode::Write => {
                self.mirror = Some(Self::as_values(records));
            }
            WriteMode::Append => {
                self.ensure_loaded_sync()?;
                self.extend(records);
            }
        }
        Ok(())
    }

    fn extend(&mut self, records: &[Record]) {
        self.mirror
            .get_or_insert_with(Vec::new)
            .extend(Self::as_values(records));
    }
}

#[async_trait]
impl<S: FileSink> FormatWriter for JsonWriter<S> {
    async fn write(&mut self, records: &[Record]) -> Result<()> {
        Self::reject_empty(records)?;
        match self.mode {
            WriteMode::Write => {
                self.mirror = Some(Self::as_values(records));
            }
            WriteMode::Append => {
                self.ensure_loaded().await?;
                self.extend(records);
            }
        }
        let content = self.render()?;
        self.sink.write(&self.path, &content).await
    }

    async fn append(&mut self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.ensure_loaded().await?;
        self.extend(records);
        let content = self.render()?;
        self.sink.write(&self.path, &content).await
    }

    fn write_sync(&mut self, records: &[Record]) -> Result<()> {
        self.stage_write_sync(records)?;
        let content = self.render()?;
        self.sink.write_sync(&self.path, &content)
    }

    fn append_sync(&mut self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.ensure_loaded_sync()?;
        self.extend(records);
        let content = self.render()?;
        self.sink.write_sync(&self.path, &content)
    }
}
