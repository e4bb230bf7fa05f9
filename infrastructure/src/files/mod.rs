//! Local file system document loader
//!
//! Reads a file picked by the user into a [`DocumentFile`]. The declared
//! content type comes from the file extension, the way a browser file
//! picker declares it; whether it is acceptable is decided later by the
//! session and the upload client.

use docqa_domain::{DocumentFile, PDF_CONTENT_TYPE, ValidationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Content type declared for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Errors raised while reading a local file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error(transparent)]
    TooLarge(#[from] ValidationError),

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Document loader that reads from the local file system.
///
/// With a size limit set, oversized files are refused from their metadata
/// and never read into memory.
#[derive(Debug, Clone, Default)]
pub struct LocalDocumentLoader {
    max_bytes: Option<u64>,
}

impl LocalDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Read `path` into a [`DocumentFile`] named after its file name.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DocumentFile, LoadError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| Self::io_error(path, e))?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if let Some(limit) = self.max_bytes
            && metadata.len() > limit
        {
            return Err(ValidationError::TooLarge {
                name,
                size: metadata.len(),
                limit,
            }
            .into());
        }

        let bytes = fs::read(path).map_err(|e| Self::io_error(path, e))?;
        let content_type = Self::content_type_for(path);

        debug!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            content_type
        );
        Ok(DocumentFile::new(name, content_type, bytes))
    }

    /// Content type declared for a path, by extension.
    pub fn content_type_for(path: &Path) -> &'static str {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => PDF_CONTENT_TYPE,
            Some("txt") => "text/plain",
            Some("md") => "text/markdown",
            Some("html" | "htm") => "text/html",
            Some("json") => "application/json",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            _ => OCTET_STREAM,
        }
    }

    fn io_error(path: &Path, source: io::Error) -> LoadError {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
