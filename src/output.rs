//! Output location and file writing

use crate::error::{ReportError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default output directory: the parent of the directory holding the
/// executable. Falls back to the current directory when that cannot be
/// determined.
pub fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write `content` to `path` via a sibling temp file and a rename, so a
/// failed run never leaves a half-written report behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = fs::write(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(ReportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Run - 2024-01-01.html");
        write_atomic(&path, "<html>報告</html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>報告</html>");
        assert!(!dir.path().join("nested").join("Run - 2024-01-01.html.tmp").exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.html");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_into_file_as_directory_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = write_atomic(&blocker.join("r.html"), "x").unwrap_err();
        assert!(matches!(err, ReportError::OutputDir { .. }));
    }

    #[test]
    fn test_default_output_dir_is_above_executable() {
        let exe = std::env::current_exe().unwrap();
        let expected = exe.parent().unwrap().parent().unwrap();
        assert_eq!(default_output_dir(), expected);
    }
}
