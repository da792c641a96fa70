//! Reading and writing session buffers to disk.
//!
//! Files are plain UTF-8. Nothing is normalized: line endings and a missing final newline are
//! preserved byte for byte.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// File I/O failures, carrying the offending path.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read (missing, permissions, ...).
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 {
        /// Path that was read.
        path: PathBuf,
    },
    /// The file could not be written (permissions, missing directory, disk full, ...).
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Path that was written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// The path involved in the failed operation.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::InvalidUtf8 { path } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

/// Read the full UTF-8 contents of `path`.
pub fn open_file(path: &Path) -> Result<String, FileError> {
    let bytes = fs::read(path).map_err(|source| {
        warn!(path = %path.display(), error = %source, "open failed");
        FileError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let content = String::from_utf8(bytes).map_err(|_| {
        warn!(path = %path.display(), "open failed: invalid UTF-8");
        FileError::InvalidUtf8 {
            path: path.to_path_buf(),
        }
    })?;

    info!(path = %path.display(), bytes = content.len(), "opened file");
    Ok(content)
}

/// Write `content` to `path`, replacing any existing file.
pub fn save_file(path: &Path, content: &str) -> Result<(), FileError> {
    fs::write(path, content).map_err(|source| {
        warn!(path = %path.display(), error = %source, "save failed");
        FileError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(path = %path.display(), bytes = content.len(), "saved file");
    Ok(())
}
