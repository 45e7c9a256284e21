//! Bounded file reads.

use crate::diagnostics::{CoreError, LintResult};
use std::path::Path;

/// Largest file the linter will read (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Read a regular UTF-8 file, refusing anything over [`DEFAULT_MAX_FILE_SIZE`].
pub fn safe_read_file(path: &Path) -> LintResult<String> {
    safe_read_file_with_limit(path, DEFAULT_MAX_FILE_SIZE)
}

/// Read a regular UTF-8 file no larger than `limit` bytes.
pub fn safe_read_file_with_limit(path: &Path, limit: u64) -> LintResult<String> {
    let metadata = std::fs::metadata(path).map_err(|e| CoreError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !metadata.is_file() {
        return Err(CoreError::FileNotRegular {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() > limit {
        return Err(CoreError::FileTooBig {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    std::fs::read_to_string(path).map_err(|e| CoreError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_regular_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("SKILL.md");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(safe_read_file(&path).unwrap(), "hello");
    }

    #[test]
    fn test_rejects_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = safe_read_file(temp.path()).unwrap_err();
        assert!(matches!(err, CoreError::FileNotRegular { .. }));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("big.md");
        std::fs::write(&path, "x".repeat(64)).unwrap();
        let err = safe_read_file_with_limit(&path, 16).unwrap_err();
        assert!(matches!(err, CoreError::FileTooBig { size: 64, limit: 16, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = safe_read_file(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, CoreError::FileRead { .. }));
    }
}
