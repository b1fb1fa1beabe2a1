//! Whole-file storage for record collections.
//!
//! Every read loads the full file and every write replaces the full file. Writes go to a
//! temporary file next to the destination which is then renamed over it, so a failed write
//! never leaves a truncated or half-written destination behind.
//!
//! ```text
//! <dir>/
//! ├── patients.json        # destination, replaced in one rename
//! └── .tmpXXXXXX           # temporary file, exists only during a write
//! ```

use crate::{FormatError, PatientError, PatientResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads the whole file as UTF-8 text.
///
/// # Errors
///
/// Returns `PatientError::FileRead` if the file cannot be opened or read, and
/// `FormatError::MalformedDocument` if its content is not valid UTF-8.
pub fn read_text(path: &Path) -> PatientResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => PatientError::Format(FormatError::MalformedDocument(format!(
            "{} is not valid UTF-8: {}",
            path.display(),
            e
        ))),
        _ => PatientError::FileRead(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        )),
    })
}

/// Reads the whole file as raw bytes.
///
/// # Errors
///
/// Returns `PatientError::FileRead` if the file cannot be opened or read.
pub fn read_bytes(path: &Path) -> PatientResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        PatientError::FileRead(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })
}

/// Replaces the destination with `contents`.
///
/// The bytes are written and flushed to a temporary file in the destination's directory, then
/// renamed over the destination. On failure the temporary file is removed and the destination
/// keeps its previous content (or stays absent).
///
/// # Errors
///
/// Returns `PatientError::FileWrite` if:
/// - the destination's directory does not exist or is not writable,
/// - writing or flushing the temporary file fails,
/// - the rename onto the destination fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> PatientResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        PatientError::FileWrite(std::io::Error::new(
            e.kind(),
            format!(
                "Failed to create temporary file in {}: {}",
                dir.display(),
                e
            ),
        ))
    })?;

    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| {
            PatientError::FileWrite(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", path.display(), e),
            ))
        })?;

    tmp.persist(path).map_err(|e| {
        PatientError::FileWrite(std::io::Error::new(
            e.error.kind(),
            format!("Failed to replace {}: {}", path.display(), e.error),
        ))
    })?;

    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");

        write_atomic(&path, b"[]").unwrap();

        assert_eq!(read_text(&path).unwrap(), "[]");
        assert_eq!(read_bytes(&path).unwrap(), b"[]");
    }

    #[test]
    fn write_replaces_previous_content_entirely() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.csv");
        fs::write(&path, "a much longer previous content\n").unwrap();

        write_atomic(&path, b"short\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing-dir").join("records.json");

        let result = write_atomic(&path, b"[]");

        assert!(matches!(result, Err(PatientError::FileWrite(_))));
        assert!(!path.exists());
    }

    #[test]
    fn write_leaves_no_temporary_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");

        write_atomic(&path, b"[]").unwrap();
        write_atomic(&path, b"[1]").unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn read_text_of_invalid_utf8_is_format_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");
        fs::write(&path, [b'[', 0xff, 0xfe, b']']).unwrap();

        let err = read_text(&path).unwrap_err();

        assert!(matches!(
            err,
            PatientError::Format(FormatError::MalformedDocument(_))
        ));
        assert_eq!(read_bytes(&path).unwrap().len(), 4);
    }

    #[test]
    fn read_missing_file_is_file_read_error() {
        let temp = TempDir::new().unwrap();
        let result = read_text(&temp.path().join("nope.json"));

        match result {
            Err(PatientError::FileRead(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected FileRead error, got {other:?}"),
        }
    }
}
