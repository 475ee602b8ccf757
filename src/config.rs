//! Writer configuration types.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! A [`WriterConfig`] captures everything a format writer needs: target
//! format, write mode, destination path, batch size for streaming, and the
//! format-specific [`CsvOptions`] / [`JsonOptions`].
//!
//! Configuration is validated exactly once, when a writer is constructed.
//! Invalid configuration fails construction, never a later write call.
//!
//! # Example
//!
//! ```rust
//! use rowpack::config::WriterConfig;
//! use rowpack::format::{ExportFormat, WriteMode};
//!
//! let config = WriterConfig::new("output.csv")
//!     .with_format(ExportFormat::Csv)
//!     .with_mode(WriteMode::Append)
//!     .with_delimiter(';')
//!     .with_batch_size(50);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::format::{ExportFormat, WriteMode};

/// Default batch size for streaming exports.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// CSV-specific writer options.
///
/// # Example
///
/// ```rust
/// use rowpack::config::CsvOptions;
///
/// let options = CsvOptions::new()
///     .with_delimiter(';')
///     .with_headers(vec!["ID".into(), "Name".into()])
///     .with_flatten(true);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter (default `,`).
    pub delimiter: Option<char>,

    /// Quote character (default `"`).
    pub quote: Option<char>,

    /// Explicit header labels, used verbatim when present.
    pub headers: Option<Vec<String>>,

    /// Explicit ordered list of record keys to export. When present it wins
    /// outright over key inference from the first record.
    pub include_keys: Option<Vec<String>>,

    /// Key → display-label mapping, consulted when no explicit header list
    /// is configured.
    pub key_labels: Option<HashMap<String, String>>,

    /// Prepend a UTF-8 BOM to the file-creating write (default false).
    pub bom: bool,

    /// Recursively flatten nested objects into `parent_child` columns
    /// (default false).
    pub flatten: bool,
}

impl CsvOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the effective delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter.unwrap_or(',')
    }

    /// Returns the effective quote character.
    pub fn quote(&self) -> char {
        self.quote.unwrap_or('"')
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the quote character.
    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Sets explicit header labels.
    #[must_use]
    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the explicit ordered key list.
    #[must_use]
    pub fn with_include_keys(mut self, keys: Vec<String>) -> Self {
        self.include_keys = Some(keys);
        self
    }

    /// Adds a key → display-label mapping entry.
    #[must_use]
    pub fn with_key_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.key_labels
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), label.into());
        self
    }

    /// Enables or disables the UTF-8 BOM.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Enables or disables nested-object flattening.
    #[must_use]
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(headers) = &self.headers
            && headers.is_empty()
        {
            return Err(ExportError::validation(
                "explicit headers list must not be empty",
            ));
        }
        if let Some(keys) = &self.include_keys
            && keys.is_empty()
        {
            return Err(ExportError::validation(
                "includeKeys list must not be empty",
            ));
        }
        Ok(())
    }
}

/// JSON-specific writer options.
///
/// # Example
///
/// ```rust
/// use rowpack::config::JsonOptions;
///
/// let options = JsonOptions::new().with_pretty(false);
/// assert_eq!(options.indent, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOptions {
    /// Pretty-print the array literal (default true).
    pub pretty: bool,

    /// Indent width in spaces, 0–10 (default 2). Only used when `pretty`
    /// is enabled.
    pub indent: u8,

    /// Prepend a UTF-8 BOM to the file content (default false).
    pub bom: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            bom: false,
        }
    }
}

impl JsonOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables pretty printing.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the indent width (0–10 spaces).
    #[must_use]
    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables the UTF-8 BOM.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.indent > 10 {
            return Err(ExportError::validation(format!(
                "indent width must be between 0 and 10, got {}",
                self.indent
            )));
        }
        Ok(())
    }
}

/// Complete configuration for one writer instance.
///
/// Immutable per writer: a writer clones the configuration at construction
/// and never consults it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Target format.
    pub format: ExportFormat,

    /// Write mode (truncate vs extend).
    pub mode: WriteMode,

    /// Destination file path.
    pub path: PathBuf,

    /// Batch size for streaming exports (default 100).
    pub batch_size: usize,

    /// CSV-specific options.
    pub csv: CsvOptions,

    /// JSON-specific options.
    pub json: JsonOptions,
}

impl WriterConfig {
    /// Creates a configuration targeting `path` with default options
    /// (CSV format, write mode, batch size 100).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            format: ExportFormat::default(),
            mode: WriteMode::default(),
            path: path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            csv: CsvOptions::default(),
            json: JsonOptions::default(),
        }
    }

    /// Sets the target format.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the write mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the streaming batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the CSV delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv.delimiter = Some(delimiter);
        self
    }

    /// Sets the CSV quote character.
    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.csv.quote = Some(quote);
        self
    }

    /// Replaces the CSV options wholesale.
    #[must_use]
    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    /// Replaces the JSON options wholesale.
    #[must_use]
    pub fn with_json_options(mut self, json: JsonOptions) -> Self {
        self.json = json;
        self
    }

    /// Validates the configuration.
    ///
    /// Called once at writer construction; any later write call can assume
    /// the configuration is sound.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validation`] describing the first problem
    /// found.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ExportError::validation("destination path must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(ExportError::validation("batch size must be at least 1"));
        }
        self.csv.validate()?;
        self.json.validate()?;
        Ok(())
    }
}
