//! Integration tests running the full pipeline against temp export dirs.

use std::fs;
use std::path::{Path, PathBuf};

use bililinks::output::aggregate_table;
use bililinks::prelude::*;
use tempfile::{TempDir, tempdir};

/// Builds an export directory with a manifest and one chunk file.
fn make_export(manifest: &str, chunk_name: &str, chunk_content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("export_chunked");
    let chunks = root.join("chunks");
    fs::create_dir_all(&chunks).unwrap();
    fs::write(root.join("manifest.json"), manifest).unwrap();
    fs::write(chunks.join(chunk_name), chunk_content).unwrap();
    (dir, root)
}

fn read_rows(path: &Path) -> Vec<OutputRow> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.deserialize().map(|r| r.unwrap()).collect()
}

const MANIFEST: &str = r#"{
  "chatInfo": {"name": "test_chat"},
  "chunked": {
    "chunksDir": "chunks",
    "chunks": [{"fileName": "chunk1.jsonl"}]
  }
}"#;

#[test]
fn test_end_to_end_video_and_short() {
    let chunk = concat!(
        r#"{"sender": {"name": "Alice"}, "time": "2026-01-03T00:00:00", "text": "hello https://www.bilibili.com/video/BV1xK4y1x7x7"}"#,
        "\n",
        r#"{"sender": {"name": "Bob"}, "time": "2026-01-04T00:00:00", "text": "look https://b23.tv/abc123"}"#,
        "\n",
    );
    let (_dir, root) = make_export(MANIFEST, "chunk1.jsonl", chunk);
    let out = root.join("out.csv");

    let report = process_export_dir(&ProcessOptions::new(&root, &out)).unwrap();
    assert_eq!(report.rows_written, 2);

    let rows = read_rows(&out);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].chat_name, "test_chat");
    assert_eq!(rows[0].chunk, "chunk1.jsonl");
    assert_eq!(rows[0].sender, "Alice");
    assert_eq!(rows[0].time, "2026-01-03T00:00:00");
    assert!(rows[0].link.contains("bilibili.com"));
    assert_eq!(rows[0].link_type, "video");
    assert_eq!(rows[0].video_id, "BV1xK4y1x7x7");
    // Fetch disabled: metadata columns stay empty
    assert_eq!(rows[0].bili_title, "");
    assert_eq!(rows[0].bili_uploader, "");

    assert_eq!(rows[1].sender, "Bob");
    assert_eq!(rows[1].link_type, "short");
    assert_eq!(rows[1].video_id, "");
    assert!(rows[1].context.contains("look"));
}

#[test]
fn test_end_to_end_deep_nesting_and_raw_message() {
    // Links buried in exporter-specific element structures are still found
    let chunk = concat!(
        r#"{"elements": [{"textElement": {"content": "deep https://www.bilibili.com/video/av12345 link"}}], "senderName": "Nested"}"#,
        "\n",
    );
    let (_dir, root) = make_export(MANIFEST, "chunk1.jsonl", chunk);
    let out = root.join("out.csv");

    process_export_dir(&ProcessOptions::new(&root, &out)).unwrap();
    let rows = read_rows(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sender, "Nested");
    assert_eq!(rows[0].video_id, "av12345");
    assert!(rows[0].raw_message.contains("textElement"));
}

#[test]
fn test_end_to_end_aggregation() {
    // Seed a table directly, then aggregate: the aggregator reads what was
    // persisted, not in-memory rows
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("table.csv");
    let agg_path = dir.path().join("agg.csv");

    let base = OutputRow {
        chat_name: "chat".into(),
        chunk: "chunk1.jsonl".into(),
        link_type: "video".into(),
        raw_message: "{}".into(),
        ..OutputRow::default()
    };
    let rows = vec![
        OutputRow {
            time: "2021-01-01T00:00:00".into(),
            sender: "Alice".into(),
            link: "https://www.bilibili.com/video/BV1".into(),
            video_id: "BV1".into(),
            bili_title: "Funny Cats".into(),
            bili_uploader: "UpA".into(),
            context: "ctx1".into(),
            ..base.clone()
        },
        OutputRow {
            time: "2021-01-02T00:00:00".into(),
            sender: "Bob".into(),
            link: "https://b23.tv/short1".into(),
            link_type: "short".into(),
            bili_title: "Funny Cats".into(),
            bili_uploader: "UpA".into(),
            context: "ctx2".into(),
            ..base.clone()
        },
        OutputRow {
            time: "2021-01-03T00:00:00".into(),
            sender: "Carol".into(),
            link: "https://www.bilibili.com/other".into(),
            link_type: "other".into(),
            context: "ctx3".into(),
            ..base.clone()
        },
    ];

    let mut writer = csv::Writer::from_path(&csv_path).unwrap();
    for row in &rows {
        writer.serialize(row).unwrap();
    }
    writer.flush().unwrap();

    let count = aggregate_table(&csv_path, &agg_path).unwrap();
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_path(&agg_path).unwrap();
    let aggregated: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(aggregated.len(), 2);

    // Merged "Funny Cats" row combines both senders and keeps the video id
    let merged = &aggregated[0];
    assert!(merged[1].contains("Alice") && merged[1].contains("Bob"));
    assert!(merged[1].contains("; "));
    assert!(merged[4].contains("BV1"));
    assert_eq!(&merged[0], "2021-01-01T00:00:00");

    // Empty-title row survives unmerged
    let empty = &aggregated[1];
    assert_eq!(&empty[5], "");
    assert_eq!(&empty[1], "Carol");
}

#[test]
fn test_manifest_missing_is_fatal() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let err = process_export_dir(&ProcessOptions::new(dir.path(), &out)).unwrap_err();
    assert!(matches!(err, BililinksError::ManifestMissing { .. }));
    // No partial output on fatal setup errors
    assert!(!out.exists());
}

#[test]
fn test_unlisted_chunks_fallback_sorted() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("export");
    let chunks = root.join("chunks");
    fs::create_dir_all(&chunks).unwrap();
    fs::write(root.join("manifest.json"), "{}").unwrap();
    fs::write(
        chunks.join("b.jsonl"),
        "{\"text\": \"https://b23.tv/from-b\"}\n",
    )
    .unwrap();
    fs::write(
        chunks.join("a.jsonl"),
        "{\"text\": \"https://b23.tv/from-a\"}\n",
    )
    .unwrap();

    let out = root.join("out.csv");
    process_export_dir(&ProcessOptions::new(&root, &out)).unwrap();

    let rows = read_rows(&out);
    assert_eq!(rows.len(), 2);
    // Name-sorted fallback order: a.jsonl before b.jsonl
    assert!(rows[0].link.ends_with("from-a"));
    assert!(rows[1].link.ends_with("from-b"));
}

#[cfg(feature = "xlsx")]
#[test]
fn test_aggregate_to_xlsx() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("table.csv");
    let agg_path = dir.path().join("agg.xlsx");

    let mut writer = csv::Writer::from_path(&csv_path).unwrap();
    writer
        .serialize(OutputRow {
            bili_title: "Title".into(),
            ..OutputRow::default()
        })
        .unwrap();
    writer.flush().unwrap();

    aggregate_table(&csv_path, &agg_path).unwrap();
    assert!(agg_path.exists());
}
