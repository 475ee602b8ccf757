//! The record type exported by every writer.
//!
//! A [`Record`] is an ordered mapping from field name to a JSON value. Key
//! order is preserved (via `serde_json`'s `preserve_order` feature), which is
//! what CSV header inference relies on when no explicit key list is
//! configured.

use serde_json::{Map, Value};

use crate::error::{ExportError, Result};

/// One exportable item: an ordered field-name → value mapping.
///
/// Records in one export are assumed structurally homogeneous for CSV; JSON
/// tolerates heterogeneity. Values may be scalars, arrays, or nested objects
/// (which CSV can optionally flatten).
///
/// # Example
///
/// ```rust
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let record = to_record(json!({"id": 1, "name": "John"})).unwrap();
/// assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id", "name"]);
/// ```
pub type Record = Map<String, Value>;

/// Converts a JSON value into a [`Record`].
///
/// # Errors
///
/// Returns [`ExportError::Validation`] if the value is not a JSON object.
pub fn to_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExportError::validation(format!(
            "expected a JSON object record, got {other}"
        ))),
    }
}

/// Converts a JSON array value into a vector of [`Record`]s.
///
/// A non-array value is treated as a single-element collection, mirroring the
/// tolerance the JSON writer applies when reloading an existing file.
///
/// # Errors
///
/// Returns [`ExportError::Validation`] if any element is not a JSON object.
pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items.into_iter().map(to_record).collect(),
        other => Ok(vec![to_record(other)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_record_object() {
        let record = to_record(json!({"id": 1, "name": "John"})).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], json!(1));
    }

    #[test]
    fn test_to_record_preserves_key_order() {
        let record = to_record(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_to_record_rejects_scalar() {
        let err = to_record(json!(42)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_records_from_value_array() {
        let records = records_from_value(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_from_value_single_object() {
        let records = records_from_value(json!({"a": 1})).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_records_from_value_rejects_mixed() {
        let err = records_from_value(json!([{"a": 1}, 2])).unwrap_err();
        assert!(err.is_validation());
    }
}
