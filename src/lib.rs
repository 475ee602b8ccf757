//! # Rowpack
//!
//! A Rust library for exporting uniform records to CSV or JSON files, with
//! whole-array writes, incremental appends, and batched streaming from
//! asynchronous sources.
//!
//! ## Overview
//!
//! Rowpack takes an in-memory collection of records (ordered field-name →
//! value mappings) and serializes it to one of two on-disk formats:
//! - **CSV** — one escaped header line followed by data rows, with schema
//!   inference from the first record and configurable delimiter, quote
//!   character, header labels, and nested-object flattening
//! - **JSON** — always a single well-formed array literal, pretty or
//!   compact, rewritten wholesale on every append
//!
//! The library handles the awkward parts of incremental export: resolving
//! the CSV schema exactly once per writer, emitting the header exactly once
//! per file, and producing byte-identical output whether the data arrives as
//! one array or many small batches.
//!
//! ## Quick Start
//!
//! The [`Exporter`] builder is the front door:
//!
//! ```rust,no_run
//! use rowpack::Exporter;
//! use rowpack::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let records = vec![
//!         to_record(json!({"id": 1, "name": "John"}))?,
//!         to_record(json!({"id": 2, "name": "Jane"}))?,
//!     ];
//!
//!     // Writes exactly "id,name\n1,John\n2,Jane\n"
//!     Exporter::new("users.csv").write_sync(records)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming for Large Sources
//!
//! Sources too large (or too slow) to collect up front are consumed in
//! bounded batches — memory stays proportional to the batch size:
//!
//! ```rust,no_run
//! # async fn example() -> rowpack::Result<()> {
//! use rowpack::Exporter;
//! use rowpack::record::to_record;
//! use rowpack::stream::records_from_vec;
//! use serde_json::json;
//!
//! let source = records_from_vec(vec![to_record(json!({"id": 1}))?]);
//!
//! let total = Exporter::new("big.csv")
//!     .with_batch_size(500)
//!     .on_progress(|current, _| println!("{current} records so far"))
//!     .from_stream(source)
//!     .await?;
//! println!("wrote {total} records");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`exporter`] — **High-level builder API** (recommended)
//!   - [`Exporter`] — fluent configuration, lifecycle hooks, terminal
//!     write/append/stream operations
//! - [`config`] — [`WriterConfig`](config::WriterConfig),
//!   [`CsvOptions`](config::CsvOptions), [`JsonOptions`](config::JsonOptions)
//! - [`core`] — Format writers and their collaborators
//!   - [`core::FormatWriter`] — uniform write/append contract,
//!     [`core::create_writer`] factory
//!   - [`CsvWriter`](core::CsvWriter), [`JsonWriter`](core::JsonWriter)
//!   - [`HeaderResolver`](core::HeaderResolver) — one-time CSV schema
//!     resolution
//! - [`stream`] — Batched streaming
//!   - [`BatchProcessor`](stream::BatchProcessor),
//!     [`StreamExporter`](stream::StreamExporter)
//! - [`record`] — The [`Record`] type and JSON conversions
//! - [`sink`] — [`FileSink`](sink::FileSink) file-system abstraction
//! - [`format`] — [`ExportFormat`](format::ExportFormat),
//!   [`WriteMode`](format::WriteMode)
//! - [`error`] — Unified error types ([`ExportError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod exporter;
pub mod format;
pub mod record;
pub mod sink;
pub mod stream;

// Re-export the main types at the crate root for convenience
pub use error::{ExportError, Result};
pub use exporter::Exporter;
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use rowpack::prelude::*;
/// ```
pub mod prelude {
    // Builder API
    pub use crate::Exporter;

    // Record type and conversions
    pub use crate::record::{Record, records_from_value, to_record};

    // Error types
    pub use crate::error::{ExportError, Result};

    // Configuration
    pub use crate::config::{CsvOptions, JsonOptions, WriterConfig};
    pub use crate::format::{ExportFormat, WriteMode};

    // Format writers
    pub use crate::core::{FormatWriter, create_writer};

    // Streaming
    pub use crate::stream::{BatchProcessor, StreamExporter, records_from_vec};

    // File sink abstraction
    pub use crate::sink::{FileSink, FsSink};
}
