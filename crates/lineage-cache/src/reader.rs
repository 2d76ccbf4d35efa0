//! Decoding cache artifacts.
//!
//! Whole-document artifacts are decoded in one `serde_json` call. JSON Lines
//! artifacts go through [`JsonlReader`], which reads line by line and tracks
//! line numbers so a bad record can be reported precisely. Decoding is strict:
//! the first malformed record fails the whole read.

use crate::{Error, RawArtifact, Result};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for JSON Lines cache data.
///
/// Wraps an async reader in a [`BufReader`] and yields one decoded record per
/// non-blank line.
///
/// # Examples
///
/// ```no_run
/// use lineage_cache::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("lineage_cache.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(record) = reader.next_record::<serde_json::Value>().await? {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based, 0 before any lines are read).
    line_number: usize,
    /// Reused line buffer.
    line: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            line: String::new(),
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            line: String::new(),
        }
    }

    /// Returns the line number of the last line read (0 before any reads).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read and decode the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails and [`Error::Malformed`] with the
    /// offending line number if the line is not a valid `T`.
    pub async fn next_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|source| Error::Malformed {
                    line: self.line_number,
                    source,
                });
        }
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Decode a whole-document artifact.
///
/// # Errors
///
/// Returns [`Error::Json`] if the document is not a valid `T`.
pub fn decode_document<T: DeserializeOwned>(artifact: &RawArtifact) -> Result<T> {
    Ok(serde_json::from_slice(artifact.bytes())?)
}

/// Decode every record of a JSON Lines artifact, in file order.
///
/// # Errors
///
/// Fails on the first malformed line, see [`JsonlReader::next_record`].
pub async fn decode_lines<T: DeserializeOwned>(artifact: &RawArtifact) -> Result<Vec<T>> {
    let mut reader = JsonlReader::new(artifact.bytes());
    let mut records = Vec::new();

    while let Some(record) = reader.next_record().await? {
        records.push(record);
    }

    tracing::trace!(
        records = records.len(),
        lines = reader.line_number(),
        "Decoded JSON Lines artifact"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheFormat;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
        name: String,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b""));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn reads_records_and_skips_blank_lines() {
        let data = b"{\"id\":1,\"name\":\"a\"}\n\n   \n{\"id\":2,\"name\":\"b\"}\n";
        let mut reader = JsonlReader::with_capacity(Cursor::new(&data[..]), 64);

        let first: Row = reader.next_record().await.unwrap().unwrap();
        assert_eq!(first, Row { id: 1, name: "a".into() });
        assert_eq!(reader.line_number(), 1);

        let second: Row = reader.next_record().await.unwrap().unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(reader.line_number(), 4);

        assert!(reader.next_record::<Row>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_line_reports_line_number() {
        let artifact = RawArtifact::from_bytes(
            CacheFormat::JsonLines,
            b"{\"id\":1,\"name\":\"a\"}\n{\"id\":\"oops\"}\n".to_vec(),
        );

        let err = decode_lines::<Row>(&artifact).await.unwrap_err();
        assert!(matches!(err, Error::Malformed { line: 2, .. }));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let artifact =
            RawArtifact::from_bytes(CacheFormat::JsonLines, b"{\"id\":7,\"name\":\"x\"}".to_vec());
        let rows: Vec<Row> = decode_lines(&artifact).await.unwrap();
        assert_eq!(rows, vec![Row { id: 7, name: "x".into() }]);
    }

    #[test]
    fn decodes_document() {
        let artifact =
            RawArtifact::from_bytes(CacheFormat::Json, br#"{"id":3,"name":"doc"}"#.to_vec());
        let row: Row = decode_document(&artifact).unwrap();
        assert_eq!(row.id, 3);
    }

    #[test]
    fn invalid_document_is_json_error() {
        let artifact = RawArtifact::from_bytes(CacheFormat::Json, b"{not json".to_vec());
        assert!(matches!(decode_document::<Row>(&artifact), Err(Error::Json(_))));
    }
}
