//! Document file value object

use super::error::ValidationError;
use std::fmt;

/// Declared content type accepted for upload
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file picked for upload (Value Object)
///
/// Carries the display name, the content type the picker declared for it,
/// and the raw bytes. Only the declared type is checked; the bytes are
/// opaque to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Create a file declared as `application/pdf`
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, PDF_CONTENT_TYPE, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared content type is PDF.
    ///
    /// Parameters (`; charset=...`) are ignored and the comparison is
    /// case-insensitive.
    pub fn is_pdf(&self) -> bool {
        let essence = self.content_type.split(';').next().unwrap_or("").trim();
        essence.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }

    pub fn ensure_pdf(&self) -> Result<(), ValidationError> {
        if self.is_pdf() {
            Ok(())
        } else {
            Err(ValidationError::NotPdf {
                name: self.name.clone(),
                content_type: if self.content_type.is_empty() {
                    "of unknown type".to_string()
                } else {
                    self.content_type.clone()
                },
            })
        }
    }
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}
