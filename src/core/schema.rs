//! CSV schema/header resolution.
//!
//! A [`HeaderResolver`] decides, once per writer lifetime, which record keys
//! a CSV export exposes and under what display labels. Resolution happens on
//! the first record a writer sees (or entirely from configuration) and is
//! immutable afterwards: later records with different shapes are silently
//! coerced to the original key order.

use serde_json::Value;

use crate::config::CsvOptions;
use crate::error::{ExportError, Result};
use crate::record::Record;

/// Keys and display labels, fixed after the first successful resolution.
#[derive(Debug, Clone)]
struct ResolvedSchema {
    keys: Vec<String>,
    headers: Vec<String>,
}

/// Resolve-once schema state machine for CSV exports.
///
/// Key resolution order: explicit include-keys (wins outright), otherwise
/// all keys of the sample record in the record's own enumeration order.
///
/// Label resolution order: explicit header list (used verbatim), otherwise
/// the key → label mapping with raw key names as per-entry fallback,
/// otherwise raw key names.
///
/// # Example
///
/// ```rust
/// use rowpack::config::CsvOptions;
/// use rowpack::core::HeaderResolver;
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let mut resolver = HeaderResolver::new(&CsvOptions::new());
/// let sample = to_record(json!({"id": 1, "name": "John"})).unwrap();
/// resolver.initialize(&sample).unwrap();
///
/// assert_eq!(resolver.keys().unwrap(), ["id", "name"]);
/// assert_eq!(resolver.headers().unwrap(), ["id", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    options: CsvOptions,
    resolved: Option<ResolvedSchema>,
}

impl HeaderResolver {
    /// Creates a resolver for the given CSV options.
    pub fn new(options: &CsvOptions) -> Self {
        Self {
            options: options.clone(),
            resolved: None,
        }
    }

    /// Returns `true` once the schema has been resolved.
    pub fn is_initialized(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolves the schema from configuration and/or the sample record.
    ///
    /// Idempotent: a second call after a successful first one is a no-op,
    /// even when given a differently shaped record.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] when no include-keys are
    /// configured and the sample record has no keys of its own.
    pub fn initialize(&mut self, sample: &Record) -> Result<()> {
        if self.resolved.is_some() {
            return Ok(());
        }

        let keys: Vec<String> = match &self.options.include_keys {
            Some(keys) => keys.clone(),
            None => sample.keys().cloned().collect(),
        };

        if keys.is_empty() {
            return Err(ExportError::header_initialization(
                "cannot resolve headers from a record with no keys",
            ));
        }

        let headers = match &self.options.headers {
            Some(headers) => headers.clone(),
            None => match &self.options.key_labels {
                Some(labels) => keys
                    .iter()
                    .map(|k| labels.get(k).cloned().unwrap_or_else(|| k.clone()))
                    .collect(),
                None => keys.clone(),
            },
        };

        self.resolved = Some(ResolvedSchema { keys, headers });
        Ok(())
    }

    /// Returns the ordered display labels.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] if called before a
    /// successful [`initialize`](Self::initialize) — a contract violation by
    /// the caller, since writers guarantee initialization first.
    pub fn headers(&self) -> Result<&[String]> {
        self.resolved
            .as_ref()
            .map(|s| s.headers.as_slice())
            .ok_or_else(Self::uninitialized)
    }

    /// Returns the ordered field keys.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] if called before a
    /// successful [`initialize`](Self::initialize).
    pub fn keys(&self) -> Result<&[String]> {
        self.resolved
            .as_ref()
            .map(|s| s.keys.as_slice())
            .ok_or_else(Self::uninitialized)
    }

    /// Aligns a record to the resolved key order.
    ///
    /// Missing keys yield `Null` cells; extra keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HeaderInitialization`] if called before a
    /// successful [`initialize`](Self::initialize).
    pub fn values(&self, record: &Record) -> Result<Vec<Value>> {
        let schema = self.resolved.as_ref().ok_or_else(Self::uninitialized)?;
        Ok(schema
            .keys
            .iter()
            .map(|k| record.get(k).cloned().unwrap_or(Value::Null))
            .collect())
    }

    fn uninitialized() -> ExportError {
        ExportError::header_initialization("headers accessed before initialization")
    }
}
