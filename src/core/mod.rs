//! Core export machinery.
//!
//! This module contains:
//! - [`schema`] - Resolve-once CSV header/key resolution
//! - [`value`] - CSV cell/row formatting and nested-object flattening
//! - [`json_format`] - JSON array/fragment rendering
//! - [`writer`] - The [`FormatWriter`] contract and the writer factory
//! - [`CsvWriter`] / [`JsonWriter`] - The per-format write/append state
//!   machines
//!
//! # Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # async fn example() -> rowpack::Result<()> {
//! use rowpack::config::WriterConfig;
//! use rowpack::core::{CsvWriter, FormatWriter};
//! use rowpack::record::to_record;
//! use serde_json::json;
//!
//! let mut writer = CsvWriter::new(WriterConfig::new("out.csv"))?;
//! let records = vec![to_record(json!({"id": 1, "name": "John"}))?];
//! writer.write(&records).await?;
//! # Ok(())
//! # }
//! ```

pub mod json_format;
pub mod schema;
pub mod value;
pub mod writer;

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;

pub use json_format::JsonFormatter;
pub use schema::HeaderResolver;
pub use value::{CsvFormatter, flatten_record};
pub use writer::{FormatWriter, create_writer};

#[cfg(feature = "csv-output")]
pub use csv_writer::CsvWriter;
#[cfg(feature = "json-output")]
pub use json_writer::JsonWriter;

/// UTF-8 byte order mark, prepended only by the file-creating write when
/// configured.
pub(crate) const BOM: &str = "\u{feff}";
