//! Output format and write mode types.
//!
//! This module defines the two axes a writer is selected on:
//! - [`ExportFormat`] - which on-disk representation to produce
//! - [`WriteMode`] - whether a writer truncates or extends existing content
//!
//! # Example
//!
//! ```rust
//! use rowpack::format::{ExportFormat, WriteMode};
//! use std::str::FromStr;
//!
//! let format = ExportFormat::from_str("json").unwrap();
//! assert_eq!(format, ExportFormat::Json);
//! assert_eq!(format.extension(), "json");
//! assert_eq!(WriteMode::default(), WriteMode::Write);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// On-disk output format for an export.
///
/// # Example
///
/// ```rust
/// use rowpack::format::ExportFormat;
/// use std::str::FromStr;
///
/// let format = ExportFormat::from_str("csv").unwrap();
/// assert_eq!(format, ExportFormat::Csv);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExportFormat {
    /// One header line, then one CSV-escaped line per record (default).
    #[default]
    Csv,

    /// A single well-formed JSON array, pretty-printed or compact.
    Json,
}

impl ExportFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowpack::format::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::Csv.extension(), "csv");
    /// assert_eq!(ExportFormat::Json.extension(), "json");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Json]
    }

    /// Returns the MIME type for this format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowpack::format::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    /// ```
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowpack::format::ExportFormat;
    ///
    /// let format = ExportFormat::from_path("output.json").unwrap();
    /// assert_eq!(format, ExportFormat::Json);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validation`] for an unknown extension.
    pub fn from_path(path: &str) -> Result<Self, ExportError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::validation(format!(
                "Unknown file extension: '.{}'. Expected one of: csv, json",
                ext
            ))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                ExportFormat::all_names().join(", ")
            )),
        }
    }
}

/// Whether a writer truncates the target file or extends it.
///
/// Affects both CSV's header-rewrite policy and JSON's full-array-reload
/// policy. See [`crate::core::CsvWriter`] and [`crate::core::JsonWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncate/overwrite the file on each `write` call (default).
    #[default]
    Write,

    /// Extend existing content; headers/arrays pick up where the file
    /// left off.
    Append,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Write => write!(f, "write"),
            WriteMode::Append => write!(f, "append"),
        }
    }
}

impl std::str::FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "write" => Ok(WriteMode::Write),
            "append" => Ok(WriteMode::Append),
            _ => Err(format!(
                "Unknown write mode: '{}'. Expected one of: write, append",
                s
            )),
        }
    }
}
