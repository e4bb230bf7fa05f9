//! Domain error types

use crate::session::entities::RequestKind;
use thiserror::Error;

/// Locally detected bad input.
///
/// Raised before any network call; never mutates the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a PDF file (\"{name}\" is {content_type})")]
    NotPdf { name: String, content_type: String },

    #[error("\"{name}\" is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("\"{name}\" is empty")]
    EmptyFile { name: String },

    #[error("Query cannot be empty")]
    EmptyQuery,
}

/// A transition the session refused to make.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A request is already in progress")]
    Busy,

    #[error("Please upload a document first")]
    NoDocument,

    #[error("\"{0}\" is already loaded; reset the session to upload another document")]
    DocumentLoaded(String),

    #[error("No {0} request is pending")]
    NotAwaiting(RequestKind),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
