//! Reading documents from disk.
//!
//! Encoding sniffing is out of scope: input must be UTF-8. A leading byte
//! order mark is stripped, as the decoder would.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read file
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// File is not valid UTF-8
    #[error("'{}' is not valid UTF-8 (byte offset {offset})", path.display())]
    InvalidUtf8 {
        /// The offending path.
        path: PathBuf,
        /// Offset of the first invalid byte.
        offset: usize,
    },
}

/// Read the markup stored at `path`.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read and
/// [`SourceError::InvalidUtf8`] if its contents are not UTF-8.
pub fn read_document(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| SourceError::InvalidUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
