//! Upload Document use case.
//!
//! The upload client: validates the picked file locally, then sends it to
//! the [`DocumentService`] in a single request.

use crate::config::ClientConfig;
use crate::ports::document_service::{DocumentService, ServiceError};
use docqa_domain::{DocumentFile, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during an upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Rejected locally, nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error uploading file: {0}")]
    Failed(#[from] ServiceError),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Display name of the local file (the response body is not consulted)
    pub name: String,
}

/// Use case for uploading a document.
#[derive(Clone)]
pub struct UploadDocumentUseCase {
    service: Arc<dyn DocumentService>,
    config: ClientConfig,
}

impl UploadDocumentUseCase {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            service,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Local checks applied before any request is sent.
    pub fn validate(&self, file: &DocumentFile) -> Result<(), ValidationError> {
        file.ensure_pdf()?;

        if file.size() == 0 {
            return Err(ValidationError::EmptyFile {
                name: file.name().to_string(),
            });
        }
        if file.size() > self.config.max_upload_bytes {
            return Err(ValidationError::TooLarge {
                name: file.name().to_string(),
                size: file.size(),
                limit: self.config.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Validate and upload the file.
    pub async fn execute(&self, file: &DocumentFile) -> Result<UploadedDocument, UploadError> {
        if let Err(e) = self.validate(file) {
            debug!("Upload of {} rejected locally: {}", file.name(), e);
            return Err(e.into());
        }

        info!("Uploading {} ({} bytes)", file.name(), file.size());

        match self.service.upload(file).await {
            Ok(()) => {
                info!("Upload of {} accepted", file.name());
                Ok(UploadedDocument {
                    name: file.name().to_string(),
                })
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", file.name(), e);
                Err(UploadError::Failed(e))
            }
        }
    }
}
