//! Unified error types for rowpack.
//!
//! This module provides a single [`ExportError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular
//! crates like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Configuration problems surface when a writer is constructed, before any
//! I/O happens. Every operation after construction returns a [`Result`]
//! instead of panicking.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for rowpack operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use rowpack::error::Result;
/// use rowpack::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;

/// The error type for all rowpack operations.
///
/// This enum represents all possible errors that can occur when exporting
/// records. Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// Invalid configuration or empty-input misuse.
    ///
    /// This typically happens when:
    /// - An empty record array is passed to `write`
    /// - The configured indent width is out of range
    /// - An explicit header/key list is empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// The CSV schema could not be resolved, or was accessed before
    /// resolution.
    ///
    /// Header resolution fails when no include-keys are configured and the
    /// first observed record has no keys of its own.
    #[error("Header initialization error: {0}")]
    HeaderInitialization(String),

    /// CSV serialization failure.
    ///
    /// This can occur when a composite value cannot be rendered as a cell.
    #[error("CSV formatting error: {0}")]
    CsvFormatting(String),

    /// JSON serialization or parse failure.
    ///
    /// Carries the context (what was being formatted or which file was being
    /// loaded) and the underlying `serde_json` error.
    #[error("JSON formatting error in {context}: {source}")]
    JsonFormatting {
        /// Description of what was being serialized or parsed
        context: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Sink-level file failure, wrapping the underlying I/O cause.
    #[error("File write error at {}: {source}", path.display())]
    FileWrite {
        /// The file the sink was operating on
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ExportError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ExportError::Validation(message.into())
    }

    /// Creates a header initialization error.
    pub fn header_initialization(message: impl Into<String>) -> Self {
        ExportError::HeaderInitialization(message.into())
    }

    /// Creates a CSV formatting error.
    pub fn csv_formatting(message: impl Into<String>) -> Self {
        ExportError::CsvFormatting(message.into())
    }

    /// Creates a JSON formatting error with context.
    pub fn json_formatting(context: impl Into<String>, source: serde_json::Error) -> Self {
        ExportError::JsonFormatting {
            context: context.into(),
            source,
        }
    }

    /// Creates a file write error for the given path.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExportError::Validation(_))
    }

    /// Returns `true` if this is a header initialization error.
    pub fn is_header_initialization(&self) -> bool {
        matches!(self, ExportError::HeaderInitialization(_))
    }

    /// Returns `true` if this is a CSV formatting error.
    pub fn is_csv_formatting(&self) -> bool {
        matches!(self, ExportError::CsvFormatting(_))
    }

    /// Returns `true` if this is a JSON formatting error.
    pub fn is_json_formatting(&self) -> bool {
        matches!(self, ExportError::JsonFormatting { .. })
    }

    /// Returns `true` if this is a file write error.
    pub fn is_file_write(&self) -> bool {
        matches!(self, ExportError::FileWrite { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
