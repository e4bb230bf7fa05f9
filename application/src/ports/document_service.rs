//! Document service port
//!
//! Defines the interface to the remote service that indexes an uploaded
//! document and answers questions about it.

use async_trait::async_trait;
use docqa_domain::{DocumentFile, Query};
use thiserror::Error;

/// Errors that can occur while talking to the document service
///
/// The `Display` text is the user-facing reason: the server's `detail`
/// when it sent one, otherwise the transport-level message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Non-2xx response
    #[error("{}", server_message(.status, .detail))]
    Server { status: u16, detail: Option<String> },

    #[error("{0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status code {}", status),
    }
}

impl ServiceError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// An answer returned by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    /// Opaque pointer to the excerpt backing the answer
    pub source: Option<String>,
}

impl Answer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Remote document indexing and question-answering service
///
/// Implementations (adapters) live in the infrastructure layer. They must
/// not retry; every call is a single request.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Send the file for indexing
    async fn upload(&self, file: &DocumentFile) -> Result<(), ServiceError>;

    /// Ask a question about the indexed document
    async fn query(&self, query: &Query) -> Result<Answer, ServiceError>;
}
