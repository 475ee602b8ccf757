//! Tests for the batched streaming pipeline against real files.

use futures::StreamExt;
use rowpack::config::JsonOptions;
use rowpack::error::ExportError;
use rowpack::format::{ExportFormat, WriteMode};
use rowpack::record::{Record, to_record};
use rowpack::stream::records_from_vec;
use rowpack::{Exporter, Result};
use serde_json::{Value, json};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn numbered(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| to_record(json!({"id": i, "name": format!("user{i}")})).unwrap())
        .collect()
}

// ============================================================================
// Byte-Equivalence Tests
// ============================================================================

#[tokio::test]
async fn test_csv_streaming_equals_single_write_for_various_batch_sizes() {
    let dir = tempdir().unwrap();
    let direct_path = dir.path().join("direct.csv");
    let records = numbered(23);

    Exporter::new(&direct_path).write(records.clone()).await.unwrap();
    let expected = fs::read_to_string(&direct_path).unwrap();

    for batch_size in [1, 2, 5, 23, 100] {
        let path = dir.path().join(format!("streamed_{batch_size}.csv"));
        let total = Exporter::new(&path)
            .with_batch_size(batch_size)
            .from_stream(records_from_vec(records.clone()))
            .await
            .unwrap();

        assert_eq!(total, 23);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            expected,
            "batch size {batch_size} diverged"
        );
    }
}

#[tokio::test]
async fn test_json_streaming_equals_single_write() {
    let dir = tempdir().unwrap();
    let direct_path = dir.path().join("direct.json");
    let streamed_path = dir.path().join("streamed.json");
    let records = numbered(11);

    Exporter::new(&direct_path)
        .with_format(ExportFormat::Json)
        .write(records.clone())
        .await
        .unwrap();

    Exporter::new(&streamed_path)
        .with_format(ExportFormat::Json)
        .with_batch_size(4)
        .from_stream(records_from_vec(records))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&streamed_path).unwrap(),
        fs::read_to_string(&direct_path).unwrap()
    );
}

#[tokio::test]
async fn test_streaming_into_existing_file_in_append_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grow.json");

    Exporter::new(&path)
        .with_format(ExportFormat::Json)
        .with_json_options(JsonOptions::new().with_pretty(false))
        .write(numbered(3))
        .await
        .unwrap();

    Exporter::new(&path)
        .with_format(ExportFormat::Json)
        .with_mode(WriteMode::Append)
        .with_batch_size(2)
        .from_stream(records_from_vec(numbered(5)))
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 8);
}

// ============================================================================
// Schema Stability Tests
// ============================================================================

#[tokio::test]
async fn test_schema_fixed_by_first_batch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.csv");

    let records = vec![
        to_record(json!({"id": 1, "name": "John"})).unwrap(),
        to_record(json!({"id": 2, "name": "Jane", "extra": "ignored"})).unwrap(),
        to_record(json!({"id": 3})).unwrap(),
    ];

    Exporter::new(&path)
        .with_batch_size(1)
        .from_stream(records_from_vec(records))
        .await
        .unwrap();

    // Later shapes are coerced to the first record's columns.
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "id,name\n1,John\n2,Jane\n3,\n"
    );
}

// ============================================================================
// Failure and Hook Tests
// ============================================================================

#[tokio::test]
async fn test_source_error_aborts_and_keeps_prior_batches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.csv");

    let items: Vec<Result<Record>> = numbered(4)
        .into_iter()
        .map(Ok)
        .chain(std::iter::once(Err(ExportError::validation(
            "source failed mid-iteration",
        ))))
        .collect();

    let err = Exporter::new(&path)
        .with_batch_size(2)
        .from_stream(futures::stream::iter(items))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("source failed mid-iteration"));
    // Both full batches landed before the failure surfaced.
    assert_eq!(
        fs::read_to_string(&path).unwrap().lines().count(),
        5 // header + 4 rows
    );
}

#[tokio::test]
async fn test_progress_strictly_increasing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.csv");

    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_in_hook = Arc::clone(&seen);

    Exporter::new(&path)
        .with_batch_size(4)
        .on_progress(move |current, total| {
            assert!(total.is_none());
            seen_in_hook.lock().unwrap().push(current);
        })
        .from_stream(records_from_vec(numbered(10)))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![4, 8, 10]);
}

#[tokio::test]
async fn test_transform_filters_records_before_batching() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("filtered.csv");

    let source = records_from_vec(numbered(10)).filter_map(|item| {
        futures::future::ready(match item {
            Ok(record) if record["id"].as_u64().unwrap() % 2 == 0 => Some(Ok(record)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
    });

    let total = Exporter::new(&path)
        .with_batch_size(3)
        .from_stream(Box::pin(source))
        .await
        .unwrap();

    assert_eq!(total, 5);
}

#[tokio::test]
async fn test_empty_source_writes_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nothing.csv");

    let total = Exporter::new(&path)
        .from_stream(records_from_vec(vec![]))
        .await
        .unwrap();

    assert_eq!(total, 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_error_hook_skips_bad_batch_and_continues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("skipped.csv");

    // The empty record cannot seed the CSV schema, failing its batch.
    let mut records = vec![Record::new()];
    records.extend(numbered(3));

    let skipped = Arc::new(Mutex::new(Vec::new()));
    let skipped_in_hook = Arc::clone(&skipped);

    let total = Exporter::new(&path)
        .with_batch_size(1)
        .on_error(move |e| {
            skipped_in_hook.lock().unwrap().push(e.to_string());
            true
        })
        .from_stream(records_from_vec(records))
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(skipped.lock().unwrap().len(), 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap().lines().count(),
        4 // header + 3 rows
    );
}
