//! Byte-level persistence for binary documents.
//!
//! Thin adapter over the filesystem: exactly the bytes `encode` produced
//! go to disk and come back, no framing or metadata. I/O failures
//! propagate verbatim inside [`ConvertError::Io`], keeping the original
//! error kind (not-found, permission-denied, …) observable.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::doc_codec::ConvertError;

/// Read a stored binary document.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ConvertError> {
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), len = bytes.len(), "read document bytes");
    Ok(bytes)
}

/// Write a binary document, replacing any previous content.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    fs::write(path, bytes)?;
    debug!(path = %path.display(), len = bytes.len(), "wrote document bytes");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn write_then_read_returns_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.bin");
        let bytes = vec![0x85, 0x6f, 0x4a, 0x83, 0x00, 0xff];
        write_bytes(&path, &bytes).unwrap();
        assert_eq!(read_bytes(&path).unwrap(), bytes);
    }

    #[test]
    fn missing_file_preserves_the_io_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_bytes(&dir.path().join("absent.bin")).unwrap_err();
        match err {
            ConvertError::Io(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn missing_directory_fails_the_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("doc.bin");
        assert!(matches!(
            write_bytes(&path, b"x").unwrap_err(),
            ConvertError::Io(_)
        ));
    }
}
