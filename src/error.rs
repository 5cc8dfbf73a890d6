use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Scan-fatal failures. Per-file read errors are not errors at this level;
/// they travel as [`crate::engine::FileNotice`]s instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
