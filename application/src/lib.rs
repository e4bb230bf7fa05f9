//! Application layer for docqa
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.
//!
//! - [`UploadDocumentUseCase`] and [`AskQuestionUseCase`] wrap one outbound
//!   request each (the upload and query clients).
//! - [`SessionController`] owns the [`Session`](docqa_domain::Session) and
//!   drives it through those clients, one request at a time.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ClientConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_service::{Answer, DocumentService, ServiceError},
    progress::{NoProgress, RequestProgress},
};
pub use use_cases::ask_question::{AskQuestionUseCase, QueryError};
pub use use_cases::session_controller::{SessionController, SubmitError};
pub use use_cases::upload_document::{UploadDocumentUseCase, UploadError, UploadedDocument};
