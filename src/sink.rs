//! File sink abstraction consumed by the format writers.
//!
//! Writers never touch the filesystem directly; they go through a
//! [`FileSink`], which exposes overwrite, append, existence-check, and read
//! operations in both blocking and async variants. All text is UTF-8.
//!
//! Two implementations are provided:
//! - [`FsSink`] - the real filesystem (std::fs / tokio::fs)
//! - [`MemorySink`] - an in-memory map, useful for tests and embedders
//!
//! # Example
//!
//! ```rust
//! use rowpack::sink::{FileSink, MemorySink};
//! use std::path::Path;
//!
//! let sink = MemorySink::new();
//! sink.write_sync(Path::new("a.csv"), "id,name\n").unwrap();
//! sink.append_sync(Path::new("a.csv"), "1,John\n").unwrap();
//! assert_eq!(sink.contents("a.csv").unwrap(), "id,name\n1,John\n");
//! ```

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt as _;

use crate::error::{ExportError, Result};

/// Opaque byte sink keyed by path.
///
/// A single write or append either fully succeeds or fully fails; there is
/// no partial-success state exposed, and no internal retry.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Overwrites (creating if necessary) the file at `path`.
    fn write_sync(&self, path: &Path, content: &str) -> Result<()>;

    /// Appends to (creating if necessary) the file at `path`.
    fn append_sync(&self, path: &Path, content: &str) -> Result<()>;

    /// Returns `true` if a file exists at `path`.
    fn exists_sync(&self, path: &Path) -> bool;

    /// Reads the full content of the file at `path`.
    fn read_sync(&self, path: &Path) -> Result<String>;

    /// Asynchronous variant of [`write_sync`](FileSink::write_sync).
    async fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Asynchronous variant of [`append_sync`](FileSink::append_sync).
    async fn append(&self, path: &Path, content: &str) -> Result<()>;

    /// Asynchronous variant of [`exists_sync`](FileSink::exists_sync).
    async fn exists(&self, path: &Path) -> bool;

    /// Asynchronous variant of [`read_sync`](FileSink::read_sync).
    async fn read(&self, path: &Path) -> Result<String>;
}

/// The real filesystem sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FsSink {
    /// Creates a filesystem sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSink for FsSink {
    fn write_sync(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(|e| ExportError::file_write(path, e))
    }

    fn append_sync(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ExportError::file_write(path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ExportError::file_write(path, e))
    }

    fn exists_sync(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_sync(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| ExportError::file_write(path, e))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| ExportError::file_write(path, e))
    }

    async fn append(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| ExportError::file_write(path, e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| ExportError::file_write(path, e))?;
        // tokio::fs::File buffers writes; dropping it does not wait for
        // in-flight data, so flush before returning.
        file.flush()
            .await
            .map_err(|e| ExportError::file_write(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ExportError::file_write(path, e))
    }
}

/// In-memory sink backed by a path → content map.
///
/// The async methods delegate to the blocking ones; nothing here actually
/// suspends.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemorySink {
    /// Creates an empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content stored for `path`, if any.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("sink lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Pre-populates `path` with `content`.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .expect("sink lock poisoned")
            .insert(path.into(), content.into());
    }
}

#[async_trait]
impl FileSink for MemorySink {
    fn write_sync(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .expect("sink lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_sync(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .expect("sink lock poisoned")
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn exists_sync(&self, path: &Path) -> bool {
        self.files
            .lock()
            .expect("sink lock poisoned")
            .contains_key(path)
    }

    fn read_sync(&self, path: &Path) -> Result<String> {
        self.contents(path).ok_or_else(|| {
            ExportError::file_write(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such in-memory file"),
            )
        })
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.write_sync(path, content)
    }

    async fn append(&self, path: &Path, content: &str) -> Result<()> {
        self.append_sync(path, content)
    }

    async fn exists(&self, path: &Path) -> bool {
        self.exists_sync(path)
    }

    async fn read(&self, path: &Path) -> Result<String> {
        self.read_sync(path)
    }
}
