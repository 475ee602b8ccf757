//! Batched streaming from async record sources.
//!
//! This module provides the streaming alternative to whole-array writes,
//! designed for sources too large (or too slow) to collect up front. Records
//! arrive as a [`futures::Stream`] and are consumed in bounded batches, so
//! memory stays proportional to the batch size rather than the source.
//!
//! # Architecture
//!
//! The streaming API is built around two layers:
//! - [`BatchProcessor`] / [`BatchHandler`] — pulls records from a source and
//!   delivers them to a handler in fixed-size batches
//! - [`StreamExporter`] — a handler that routes batches into a
//!   [`FormatWriter`](crate::core::FormatWriter): first batch as a write,
//!   every later batch as an append
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> rowpack::Result<()> {
//! use rowpack::config::WriterConfig;
//! use rowpack::core::create_writer;
//! use rowpack::record::to_record;
//! use rowpack::stream::{StreamExporter, records_from_vec};
//! use serde_json::json;
//!
//! let records = vec![
//!     to_record(json!({"id": 1, "name": "John"}))?,
//!     to_record(json!({"id": 2, "name": "Jane"}))?,
//! ];
//!
//! let mut writer = create_writer(WriterConfig::new("users.csv"))?;
//! let total = StreamExporter::new(writer.as_mut(), 100)
//!     .stream(records_from_vec(records))
//!     .await?;
//! println!("Wrote {total} records");
//! # Ok(())
//! # }
//! ```

mod batch;
mod orchestrator;

pub use batch::{BatchHandler, BatchProcessor};
pub use orchestrator::{ErrorCallback, ProgressCallback, StreamExporter};

use futures::Stream;
use futures::stream;

use crate::error::Result;
use crate::record::Record;

/// Wraps an in-memory record collection as a stream source.
///
/// Useful for feeding the streaming pipeline from data already collected,
/// and as the bridge between one-shot and streaming export paths.
pub fn records_from_vec(records: Vec<Record>) -> impl Stream<Item = Result<Record>> + Unpin + Send {
    stream::iter(records.into_iter().map(Ok))
}
