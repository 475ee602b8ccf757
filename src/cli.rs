//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//!
//! # Using OutputFormat in Libraries
//!
//! The type is designed to be usable outside of CLI context:
//!
//! ```rust
//! use rowpack::cli::OutputFormat;
//!
//! let format = OutputFormat::Csv;
//! println!("Format: {}", format); // "CSV"
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Export a JSON file of records to CSV or JSON, with configurable
/// delimiters, headers, pretty-printing, and batched streaming.
#[derive(Parser, Debug, Clone)]
#[command(name = "rowpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    rowpack records.json
    rowpack records.json -o users.csv --delimiter ';'
    rowpack records.json -o users.json --format json --no-pretty
    rowpack records.json --append -o users.csv
    rowpack records.json --streaming --batch-size 500")]
pub struct Args {
    /// Path to input file (a JSON array of records)
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = "export.csv")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Append to the output file instead of overwriting it
    #[arg(short, long)]
    pub append: bool,

    /// CSV field delimiter
    #[arg(long, value_name = "CHAR", default_value = ",")]
    pub delimiter: char,

    /// CSV quote character
    #[arg(long, value_name = "CHAR", default_value = "\"")]
    pub quote: char,

    /// Flatten nested objects into parent_child CSV columns
    #[arg(long)]
    pub flatten: bool,

    /// Disable JSON pretty-printing (emit a compact single line)
    #[arg(long)]
    pub no_pretty: bool,

    /// JSON indent width in spaces (0-10)
    #[arg(long, value_name = "N", default_value = "2")]
    pub indent: u8,

    /// Prepend a UTF-8 BOM to the output file
    #[arg(long)]
    pub bom: bool,

    /// Stream the input in batches instead of one whole-array write
    #[arg(long)]
    pub streaming: bool,

    /// Batch size for streaming mode
    #[arg(long, value_name = "N", default_value = "100")]
    pub batch_size: usize,
}

/// Output format options.
///
/// - [`Csv`](OutputFormat::Csv) - Header line plus one row per record
/// - [`Json`](OutputFormat::Json) - A single well-formed JSON array
///
/// # Example
///
/// ```rust
/// use rowpack::cli::OutputFormat;
///
/// let format = OutputFormat::Json;
/// println!("Extension: {}", format.extension()); // "json"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with configurable delimiter (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json"]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::ExportFormat {
    fn from(format: OutputFormat) -> crate::format::ExportFormat {
        match format {
            OutputFormat::Csv => crate::format::ExportFormat::Csv,
            OutputFormat::Json => crate::format::ExportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(OutputFormat::Json.to_string(), "JSON");
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(
            <OutputFormat as FromStr>::from_str("csv").unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            <OutputFormat as FromStr>::from_str("JSON").unwrap(),
            OutputFormat::Json
        );
        assert!(<OutputFormat as FromStr>::from_str("xml").is_err());
    }

    #[test]
    fn test_format_serde() {
        let format = OutputFormat::Json;
        let json = serde_json::to_string(&format).unwrap();
        assert_eq!(json, "\"json\"");

        let parsed: OutputFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(parsed, OutputFormat::Csv);
    }

    #[test]
    fn test_format_into_library_type() {
        let format: crate::format::ExportFormat = OutputFormat::Json.into();
        assert_eq!(format, crate::format::ExportFormat::Json);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["rowpack", "records.json"]);
        assert_eq!(args.input, "records.json");
        assert_eq!(args.output, "export.csv");
        assert_eq!(args.format, OutputFormat::Csv);
        assert!(!args.append);
        assert_eq!(args.delimiter, ',');
        assert_eq!(args.quote, '"');
        assert_eq!(args.batch_size, 100);
        assert!(!args.streaming);
    }

    #[test]
    fn test_args_full_invocation() {
        let args = Args::parse_from([
            "rowpack",
            "in.json",
            "-o",
            "out.json",
            "--format",
            "json",
            "--append",
            "--no-pretty",
            "--indent",
            "4",
            "--bom",
            "--streaming",
            "--batch-size",
            "500",
        ]);
        assert_eq!(args.output, "out.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.append);
        assert!(args.no_pretty);
        assert_eq!(args.indent, 4);
        assert!(args.bom);
        assert!(args.streaming);
        assert_eq!(args.batch_size, 500);
    }
}
