//! Shared file reading utilities for the scanner
//!
//! Reads source files as UTF-8 text with a configurable size limit,
//! surfacing unreadable content as a decode failure the coordinator
//! can report and skip.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::FileError;

/// Default maximum file size for extraction operations (1MB).
/// Files larger than this are skipped to prevent excessive memory usage.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Global configurable max file size. Set via `set_max_file_size()`.
static MAX_FILE_SIZE: AtomicU64 = AtomicU64::new(DEFAULT_MAX_FILE_SIZE);

/// Set the maximum file size for extraction operations.
/// This affects all subsequent calls to `read_source`.
pub fn set_max_file_size(size: u64) {
    MAX_FILE_SIZE.store(size, Ordering::SeqCst);
}

/// Get the current maximum file size setting.
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE.load(Ordering::SeqCst)
}

/// Read a source file as UTF-8 text.
///
/// Returns `FileError::TooLarge` when the file exceeds the configured
/// size limit, and `FileError::Decode` when the content cannot be read
/// or is not valid UTF-8.
pub fn read_source(path: &Path) -> Result<String, FileError> {
    if let Ok(metadata) = path.metadata() {
        let limit = get_max_file_size();
        if metadata.len() > limit {
            return Err(FileError::TooLarge(limit));
        }
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FileError::Decode(e.utf8_error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Global mutex to serialize tests that modify MAX_FILE_SIZE
    static MAX_FILE_SIZE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_read_source_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.py");
        fs::write(&file_path, "import os\n").unwrap();

        let content = read_source(&file_path).unwrap();
        assert_eq!(content, "import os\n");
    }

    #[test]
    fn test_read_source_nonexistent() {
        let result = read_source(Path::new("/nonexistent/file.py"));
        assert!(matches!(result, Err(FileError::Decode(_))));
    }

    #[test]
    fn test_read_source_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("binary.py");
        fs::write(&file_path, [0xFF, 0xFE, 0x00, 0x01]).unwrap();

        let result = read_source(&file_path);
        assert!(matches!(result, Err(FileError::Decode(_))));
    }

    #[test]
    fn test_read_source_empty_file() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("empty.py");
        fs::write(&file_path, "").unwrap();

        assert_eq!(read_source(&file_path).unwrap(), "");
    }

    #[test]
    fn test_file_at_max_size_boundary() {
        let _lock = MAX_FILE_SIZE_TEST_LOCK.lock().unwrap();

        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("boundary.py");

        let original_max = get_max_file_size();
        let test_max_size = 50_000u64;
        set_max_file_size(test_max_size);

        // File exactly at limit should be read (uses > not >=)
        let content = "#".repeat(test_max_size as usize);
        fs::write(&file_path, &content).unwrap();
        assert!(read_source(&file_path).is_ok());

        // File one byte over should be rejected
        let content = "#".repeat((test_max_size + 1) as usize);
        fs::write(&file_path, &content).unwrap();
        assert!(matches!(
            read_source(&file_path),
            Err(FileError::TooLarge(_))
        ));

        set_max_file_size(original_max);
    }

    #[test]
    fn test_set_max_file_size() {
        let _lock = MAX_FILE_SIZE_TEST_LOCK.lock().unwrap();

        let original = get_max_file_size();

        set_max_file_size(500_000);
        assert_eq!(get_max_file_size(), 500_000);

        set_max_file_size(original);
    }

    #[test]
    fn test_bom_is_preserved() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bom.py");

        let mut content = vec![0xEF, 0xBB, 0xBF]; // UTF-8 BOM
        content.extend_from_slice(b"import os\n");
        fs::write(&file_path, &content).unwrap();

        let text = read_source(&file_path).unwrap();
        assert!(text.contains("import os"));
    }
}
