//! Ask Question use case.
//!
//! The query client: sends one question to the [`DocumentService`] and maps
//! the outcome. No retries and no session mutation.

use crate::ports::document_service::{Answer, DocumentService, ServiceError};
use docqa_domain::util::preview;
use docqa_domain::{Query, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while asking a question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error querying document: {0}")]
    Failed(#[from] ServiceError),
}

impl QueryError {
    /// The reason without the "Error querying document" prefix
    pub fn reason(&self) -> String {
        match self {
            QueryError::Validation(e) => e.to_string(),
            QueryError::Failed(e) => e.to_string(),
        }
    }
}

/// Use case for asking a question about the uploaded document.
#[derive(Clone)]
pub struct AskQuestionUseCase {
    service: Arc<dyn DocumentService>,
}

impl AskQuestionUseCase {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }

    /// Ask an already validated question.
    pub async fn execute(&self, query: &Query) -> Result<Answer, QueryError> {
        info!("Querying document: {}", preview(query.text(), 100));

        match self.service.query(query).await {
            Ok(answer) => {
                info!(
                    "Answer received ({} bytes, source: {})",
                    answer.answer.len(),
                    answer.source.as_deref().unwrap_or("none")
                );
                Ok(answer)
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                Err(QueryError::Failed(e))
            }
        }
    }
}
