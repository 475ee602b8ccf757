//! Tests for the format writers (CSV, JSON) against real files.

use rowpack::Exporter;
use rowpack::config::{CsvOptions, JsonOptions, WriterConfig};
use rowpack::core::create_writer;
use rowpack::format::{ExportFormat, WriteMode};
use rowpack::record::{Record, to_record};
use serde_json::{Value, json};
use std::fs;
use tempfile::tempdir;

fn sample_records() -> Vec<Record> {
    vec![
        to_record(json!({"id": 1, "name": "John"})).unwrap(),
        to_record(json!({"id": 2, "name": "Jane"})).unwrap(),
    ]
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

mod csv_writer_tests {
    use super::*;

    #[test]
    fn test_write_csv_exact_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");

        Exporter::new(&path).write_sync(sample_records()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,name\n1,John\n2,Jane\n"
        );
    }

    #[test]
    fn test_append_same_file_no_duplicate_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");

        Exporter::new(&path).write_sync(sample_records()).unwrap();
        Exporter::new(&path)
            .with_mode(WriteMode::Append)
            .append_sync(vec![to_record(json!({"id": 3, "name": "Bob"})).unwrap()])
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,name\n1,John\n2,Jane\n3,Bob\n"
        );
    }

    #[test]
    fn test_append_to_fresh_file_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.csv");

        Exporter::new(&path)
            .with_mode(WriteMode::Append)
            .append_sync(sample_records())
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,name\n1,John\n2,Jane\n"
        );
    }

    #[test]
    fn test_repeated_write_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");

        let exporter = Exporter::new(&path);
        exporter.write_sync(sample_records()).unwrap();
        exporter
            .write_sync(vec![to_record(json!({"id": 9, "name": "Mia"})).unwrap()])
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "id,name\n9,Mia\n");
    }

    #[test]
    fn test_custom_delimiter_and_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labeled.csv");

        Exporter::new(&path)
            .with_csv_options(
                CsvOptions::new()
                    .with_delimiter(';')
                    .with_key_label("id", "ID")
                    .with_key_label("name", "Full Name"),
            )
            .write_sync(sample_records())
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "ID;Full Name\n1;John\n2;Jane\n"
        );
    }

    #[test]
    fn test_include_keys_selects_and_orders_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selected.csv");

        let records = vec![
            to_record(json!({"id": 1, "name": "John", "secret": "x"})).unwrap(),
            to_record(json!({"id": 2, "name": "Jane", "secret": "y"})).unwrap(),
        ];

        Exporter::new(&path)
            .with_csv_options(
                CsvOptions::new().with_include_keys(vec!["name".into(), "id".into()]),
            )
            .write_sync(records)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,id\nJohn,1\nJane,2\n"
        );
    }

    #[test]
    fn test_round_trip_through_csv_parser() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.csv");

        let records = vec![
            to_record(json!({"id": 1, "name": "John, Jr.", "bio": "said \"hi\""})).unwrap(),
            to_record(json!({"id": 2, "name": "Jane\nDoe", "bio": "plain"})).unwrap(),
        ];
        Exporter::new(&path).write_sync(records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["id", "name", "bio"]
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "John, Jr.");
        assert_eq!(&rows[0][2], "said \"hi\"");
        assert_eq!(&rows[1][1], "Jane\nDoe");
    }

    #[test]
    fn test_bom_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");

        Exporter::new(&path)
            .with_mode(WriteMode::Append)
            .with_csv_options(CsvOptions::new().with_bom(true))
            .append_sync(sample_records())
            .unwrap();
        Exporter::new(&path)
            .with_mode(WriteMode::Append)
            .with_csv_options(CsvOptions::new().with_bom(true))
            .append_sync(vec![to_record(json!({"id": 3, "name": "Bob"})).unwrap()])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{feff}'));
        assert_eq!(content.matches('\u{feff}').count(), 1);
    }
}

// ============================================================================
// JSON Writer Tests
// ============================================================================

mod json_writer_tests {
    use super::*;

    #[test]
    fn test_write_json_pretty_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        Exporter::new(&path)
            .with_format(ExportFormat::Json)
            .write_sync(sample_records())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n"));
        assert!(content.contains("  {\n    \"id\": 1"));

        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_json_compact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compact.json");

        Exporter::new(&path)
            .with_format(ExportFormat::Json)
            .with_json_options(JsonOptions::new().with_pretty(false))
            .write_sync(sample_records())
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"[{"id":1,"name":"John"},{"id":2,"name":"Jane"}]"#
        );
    }

    #[test]
    fn test_json_append_across_writer_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grow.json");

        // First writer instance
        Exporter::new(&path)
            .with_format(ExportFormat::Json)
            .with_mode(WriteMode::Append)
            .append_sync(sample_records())
            .unwrap();

        // Second, independent writer instance on the same file
        Exporter::new(&path)
            .with_format(ExportFormat::Json)
            .with_mode(WriteMode::Append)
            .append_sync(vec![to_record(json!({"id": 3, "name": "Bob"})).unwrap()])
            .unwrap();

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], json!("John"));
        assert_eq!(items[1]["name"], json!("Jane"));
        assert_eq!(items[2]["name"], json!("Bob"));
    }

    #[test]
    fn test_json_file_always_well_formed_after_many_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("many.json");

        for i in 0..5 {
            Exporter::new(&path)
                .with_format(ExportFormat::Json)
                .with_mode(WriteMode::Append)
                .append_sync(vec![to_record(json!({"id": i})).unwrap()])
                .unwrap();
        }

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_json_custom_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("indent.json");

        Exporter::new(&path)
            .with_format(ExportFormat::Json)
            .with_json_options(JsonOptions::new().with_indent(4))
            .write_sync(vec![to_record(json!({"id": 1})).unwrap()])
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[\n    {\n        \"id\": 1\n    }\n]"
        );
    }
}

// ============================================================================
// Factory and Validation Tests
// ============================================================================

mod factory_tests {
    use super::*;

    #[test]
    fn test_empty_write_rejected_by_both_formats() {
        let dir = tempdir().unwrap();

        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let path = dir.path().join(format!("empty.{}", format.extension()));
            let err = Exporter::new(&path)
                .with_format(format)
                .write_sync(vec![])
                .unwrap_err();
            assert!(
                err.to_string().contains("Cannot write empty data array"),
                "unexpected message for {format}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let config = WriterConfig::new("").with_format(ExportFormat::Csv);
        assert!(create_writer(config).unwrap_err().is_validation());

        let config = WriterConfig::new("out.csv").with_batch_size(0);
        assert!(create_writer(config).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_async_and_sync_writes_are_identical() {
        let dir = tempdir().unwrap();
        let sync_path = dir.path().join("sync.csv");
        let async_path = dir.path().join("async.csv");

        Exporter::new(&sync_path).write_sync(sample_records()).unwrap();
        Exporter::new(&async_path).write(sample_records()).await.unwrap();

        assert_eq!(
            fs::read_to_string(&sync_path).unwrap(),
            fs::read_to_string(&async_path).unwrap()
        );
    }
}
