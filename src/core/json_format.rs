//! JSON output formatting.
//!
//! Renders a set of records either as one array literal (the writer's
//! primary path; the writer keeps the full array in memory and re-renders it
//! on every persist, including appends) or as independent one-per-line
//! literals for fragment output.

use serde::Serialize as _;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::config::JsonOptions;
use crate::error::{ExportError, Result};

/// Stateless JSON formatter configured with pretty/indent options.
///
/// # Example
///
/// ```rust
/// use rowpack::config::JsonOptions;
/// use rowpack::core::JsonFormatter;
/// use serde_json::json;
///
/// let formatter = JsonFormatter::new(&JsonOptions::new().with_pretty(false));
/// let out = formatter.format_array(&[json!({"id": 1})]).unwrap();
/// assert_eq!(out, r#"[{"id":1}]"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
    indent: String,
}

impl JsonFormatter {
    /// Creates a formatter from JSON options.
    pub fn new(options: &JsonOptions) -> Self {
        Self {
            pretty: options.pretty,
            indent: " ".repeat(usize::from(options.indent)),
        }
    }

    /// Emits the full array literal, pretty-printed with the configured
    /// indent width when enabled, else single-line compact.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::JsonFormatting`] if serialization fails.
    pub fn format_array(&self, items: &[Value]) -> Result<String> {
        if self.pretty {
            let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
            let mut buf = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            items
                .serialize(&mut serializer)
                .map_err(|e| ExportError::json_formatting("array output", e))?;
            String::from_utf8(buf)
                .map_err(|e| ExportError::validation(format!("array output is not UTF-8: {e}")))
        } else {
            serde_json::to_string(items)
                .map_err(|e| ExportError::json_formatting("array output", e))
        }
    }

    /// Emits each record as an independent compact literal, one per line,
    /// with no enclosing brackets and no separating commas.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::JsonFormatting`] if any record fails to
    /// serialize.
    pub fn format_items(&self, items: &[Value]) -> Result<String> {
        let mut out = String::new();
        for item in items {
            out.push_str(&self.format_item(item)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Emits one record as a compact literal.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::JsonFormatting`] if serialization fails.
    pub fn format_item(&self, item: &Value) -> Result<String> {
        serde_json::to_string(item).map_err(|e| ExportError::json_formatting("record output", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_array() {
        let formatter = JsonFormatter::new(&JsonOptions::new().with_pretty(false));
        let out = formatter
            .format_array(&[json!({"id": 1}), json!({"id": 2})])
            .unwrap();
        assert_eq!(out, r#"[{"id":1},{"id":2}]"#);
    }

    #[test]
    fn test_pretty_array_default_indent() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        let out = formatter.format_array(&[json!({"id": 1})]).unwrap();
        assert_eq!(out, "[\n  {\n    \"id\": 1\n  }\n]");
    }

    #[test]
    fn test_pretty_array_custom_indent() {
        let formatter = JsonFormatter::new(&JsonOptions::new().with_indent(4));
        let out = formatter.format_array(&[json!({"id": 1})]).unwrap();
        assert_eq!(out, "[\n    {\n        \"id\": 1\n    }\n]");
    }

    #[test]
    fn test_pretty_array_zero_indent() {
        let formatter = JsonFormatter::new(&JsonOptions::new().with_indent(0));
        let out = formatter.format_array(&[json!({"id": 1})]).unwrap();
        assert_eq!(out, "[\n{\n\"id\": 1\n}\n]");
    }

    #[test]
    fn test_empty_array() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        assert_eq!(formatter.format_array(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_format_items_one_per_line() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        let out = formatter
            .format_items(&[json!({"a": 1}), json!({"b": 2})])
            .unwrap();
        assert_eq!(out, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn test_format_items_ignores_pretty_setting() {
        let formatter = JsonFormatter::new(&JsonOptions::new().with_indent(4));
        let out = formatter.format_items(&[json!({"a": [1, 2]})]).unwrap();
        assert_eq!(out, "{\"a\":[1,2]}\n");
    }

    #[test]
    fn test_format_items_empty() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        assert_eq!(formatter.format_items(&[]).unwrap(), "");
    }

    #[test]
    fn test_format_item_compact() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        let out = formatter.format_item(&json!({"a": [1, 2]})).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_parses_back() {
        let formatter = JsonFormatter::new(&JsonOptions::new());
        let items = vec![json!({"id": 1, "tags": ["x"]}), json!({"id": 2})];
        let out = formatter.format_array(&items).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, items);
    }
}
