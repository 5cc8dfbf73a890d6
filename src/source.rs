use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;

/// One candidate file, decoded and ready for classification. Transient.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub name: String,
    pub content: String,
}

/// Immediate children of `dir` that are regular files, any extension,
/// sorted by file name so enumeration order is deterministic for a given
/// directory snapshot.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ScanError::ReadDir {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Read a file as text. Decoding is lossy and never fails; undecodable bytes
/// cannot match any marker, so classification still behaves.
pub fn read_record(path: &Path) -> io::Result<FileRecord> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(FileRecord {
        name,
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_fatal() {
        let err = list_files(Path::new("/nonexistent/logsift-test")).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.log");
        fs::write(&file, "x").unwrap();

        let err = list_files(&file).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(list_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn lists_flat_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.log"), "x").unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("c"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d.log"), "x").unwrap();

        let names: Vec<String> = list_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.log", "c"]);
    }

    #[test]
    fn read_record_is_lossy_on_bad_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.log");
        fs::write(&path, [b'S', b'N', 0xFF, 0xFE, b':', b'x']).unwrap();

        let record = read_record(&path).unwrap();
        assert_eq!(record.name, "binary.log");
        assert!(record.content.starts_with("SN"));
        assert!(record.content.ends_with(":x"));
    }
}
