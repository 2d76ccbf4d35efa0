//! Integration tests for reading cache artifacts from disk.

use lineage_cache::{decode_document, decode_lines, read_artifact, CacheFormat, Error};
use serde::Deserialize;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record {
    Metadata { version: String },
    Object { id: String },
}

#[derive(Debug, Deserialize)]
struct Document {
    objects: Vec<String>,
}

#[tokio::test]
async fn reads_tagged_jsonl_records_in_order() {
    let mut file = NamedTempFile::with_suffix(".jsonl").unwrap();
    writeln!(file, r#"{{"record":"metadata","version":"1.0.0"}}"#).unwrap();
    writeln!(file, r#"{{"record":"object","id":"DWH.A"}}"#).unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"record":"object","id":"DWH.B"}}"#).unwrap();

    let artifact = read_artifact(file.path()).await.unwrap();
    let records: Vec<Record> = decode_lines(&artifact).await.unwrap();

    assert_eq!(
        records,
        vec![
            Record::Metadata {
                version: "1.0.0".into()
            },
            Record::Object { id: "DWH.A".into() },
            Record::Object { id: "DWH.B".into() },
        ]
    );
}

#[tokio::test]
async fn unknown_record_tag_fails_with_line_number() {
    let mut file = NamedTempFile::with_suffix(".jsonl").unwrap();
    writeln!(file, r#"{{"record":"object","id":"DWH.A"}}"#).unwrap();
    writeln!(file, r#"{{"record":"mystery"}}"#).unwrap();

    let artifact = read_artifact(file.path()).await.unwrap();
    let err = decode_lines::<Record>(&artifact).await.unwrap_err();

    assert!(matches!(err, Error::Malformed { line: 2, .. }), "{err}");
}

#[tokio::test]
async fn reads_json_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lineage_cache.json");
    std::fs::write(&path, r#"{"objects":["A","B"]}"#).unwrap();

    let artifact = read_artifact(&path).await.unwrap();
    assert_eq!(artifact.format(), CacheFormat::Json);

    let doc: Document = decode_document(&artifact).unwrap();
    assert_eq!(doc.objects, vec!["A", "B"]);
}

#[tokio::test]
async fn identical_content_has_identical_checksum() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");
    std::fs::write(&first, r#"{"objects":[]}"#).unwrap();
    std::fs::write(&second, r#"{"objects":[]}"#).unwrap();

    let a = read_artifact(&first).await.unwrap();
    let b = read_artifact(&second).await.unwrap();
    assert_eq!(a.checksum(), b.checksum());
}

#[tokio::test]
async fn unsupported_extension_is_rejected_before_reading() {
    let err = read_artifact("lineage_cache.csv").await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}
