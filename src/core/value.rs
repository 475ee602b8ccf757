//! CSV value and row formatting.
//!
//! Pure functions: a value becomes its on-disk cell text, a row becomes
//! cells joined by the delimiter. A formatted value is quote-wrapped, with
//! every embedded quote doubled, if and only if it contains the delimiter,
//! the quote character, `\n`, or `\r`. The row carries no trailing delimiter
//! and no terminating newline; line termination is the writer's job.

use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::record::Record;

/// Stateless CSV cell/row formatter for one delimiter + quote pair.
///
/// # Example
///
/// ```rust
/// use rowpack::core::CsvFormatter;
/// use serde_json::json;
///
/// let formatter = CsvFormatter::new(',', '"');
/// let row = formatter.format_row(&[json!(1), json!("a,b"), json!(null)]).unwrap();
/// assert_eq!(row, "1,\"a,b\",");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CsvFormatter {
    delimiter: char,
    quote: char,
}

impl CsvFormatter {
    /// Creates a formatter for the given delimiter and quote character.
    pub fn new(delimiter: char, quote: char) -> Self {
        Self { delimiter, quote }
    }

    /// Renders one raw value as cell text, before escaping.
    ///
    /// `Null` becomes an empty field; booleans and numbers use their
    /// canonical string form; strings are used verbatim; objects and arrays
    /// are JSON-serialized and then treated as strings.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CsvFormatting`] if a composite value cannot be
    /// JSON-serialized.
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s.clone()),
            composite => serde_json::to_string(composite)
                .map_err(|e| ExportError::csv_formatting(format!("cannot serialize cell: {e}"))),
        }
    }

    /// Escapes one rendered field.
    ///
    /// Quote-wraps (doubling embedded quotes) only when the field contains
    /// the delimiter, the quote character, `\n`, or `\r`.
    pub fn escape(&self, field: &str) -> String {
        let needs_quoting = field
            .chars()
            .any(|c| c == self.delimiter || c == self.quote || c == '\n' || c == '\r');

        if !needs_quoting {
            return field.to_string();
        }

        let mut escaped = String::with_capacity(field.len() + 2);
        escaped.push(self.quote);
        for c in field.chars() {
            if c == self.quote {
                escaped.push(self.quote);
            }
            escaped.push(c);
        }
        escaped.push(self.quote);
        escaped
    }

    /// Formats one data row: rendered, escaped, delimiter-joined.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CsvFormatting`] if any cell cannot be
    /// rendered.
    pub fn format_row(&self, values: &[Value]) -> Result<String> {
        let fields = values
            .iter()
            .map(|v| Ok(self.escape(&self.format_value(v)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(fields.join(&self.delimiter.to_string()))
    }

    /// Formats a row of pre-rendered fields (used for the header line).
    pub fn format_fields(&self, fields: &[String]) -> String {
        fields
            .iter()
            .map(|f| self.escape(f))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }
}

/// Recursively flattens nested objects into `parent_child` keys.
///
/// Arrays at any depth stay as leaves (they are later JSON-stringified into
/// a single cell, not expanded). `Null` values flatten to `Null`. Key order
/// follows a depth-first walk of the original record.
///
/// # Example
///
/// ```rust
/// use rowpack::core::flatten_record;
/// use rowpack::record::to_record;
/// use serde_json::json;
///
/// let record = to_record(json!({"user": {"name": "John", "address": {"city": "Oslo"}}})).unwrap();
/// let flat = flatten_record(&record);
/// assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["user_name", "user_address_city"]);
/// ```
pub fn flatten_record(record: &Record) -> Record {
    let mut flat = Record::new();
    flatten_into(&mut flat, "", record);
    flat
}

fn flatten_into(out: &mut Record, prefix: &str, record: &Record) {
    for (key, value) in record {
        let flat_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(out, &flat_key, nested),
            other => {
                out.insert(flat_key, other.clone());
            }
        }
    }
}
