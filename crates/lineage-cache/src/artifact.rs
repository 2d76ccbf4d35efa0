//! Raw cache artifacts and their content fingerprint.

use crate::{CacheFormat, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// The undecoded bytes of a cache artifact together with its encoding and
/// a SHA-256 fingerprint of the content.
///
/// The checksum lets callers skip rebuilding a snapshot when a reload finds
/// the same artifact again.
#[derive(Debug, Clone)]
pub struct RawArtifact {
    format: CacheFormat,
    bytes: Vec<u8>,
    checksum: String,
}

impl RawArtifact {
    /// Wrap bytes that were obtained elsewhere (object storage, tests, ...).
    #[must_use]
    pub fn from_bytes(format: CacheFormat, bytes: Vec<u8>) -> Self {
        let checksum = sha256_hex(&bytes);
        Self {
            format,
            bytes,
            checksum,
        }
    }

    /// Encoding of the artifact.
    #[must_use]
    pub fn format(&self) -> CacheFormat {
        self.format
    }

    /// Raw content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lower-case hex SHA-256 of the content.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the artifact has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read a cache artifact from disk, inferring its encoding from the extension.
///
/// # Errors
///
/// Returns an error if the extension is unknown or the file cannot be read.
pub async fn read_artifact(path: impl AsRef<Path>) -> Result<RawArtifact> {
    let path = path.as_ref();
    let format = CacheFormat::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;

    tracing::debug!(
        path = %path.display(),
        %format,
        bytes = bytes.len(),
        "Read cache artifact"
    );

    Ok(RawArtifact::from_bytes(format, bytes))
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn checksum_of_empty_input_is_well_known() {
        let artifact = RawArtifact::from_bytes(CacheFormat::Json, Vec::new());
        assert_eq!(
            artifact.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(artifact.is_empty());
    }

    #[test]
    fn checksum_is_lowercase_hex_of_content() {
        let artifact = RawArtifact::from_bytes(CacheFormat::Json, b"abc".to_vec());
        assert_eq!(
            artifact.checksum(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn checksum_changes_with_content() {
        let a = RawArtifact::from_bytes(CacheFormat::Json, b"{}".to_vec());
        let b = RawArtifact::from_bytes(CacheFormat::Json, b"{ }".to_vec());
        assert_ne!(a.checksum(), b.checksum());
        assert_eq!(a.checksum().len(), 64);
    }

    #[tokio::test]
    async fn reads_artifact_from_disk() {
        let mut file = NamedTempFile::with_suffix(".jsonl").unwrap();
        writeln!(file, r#"{{"record":"metadata"}}"#).unwrap();

        let artifact = read_artifact(file.path()).await.unwrap();
        assert_eq!(artifact.format(), CacheFormat::JsonLines);
        assert!(artifact.len() > 0);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = read_artifact("/definitely/not/here/cache.json")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
