//! Core domain concepts shared across the session subdomain.
//!
//! - [`document::DocumentFile`]: a file picked for upload
//! - [`query::Query`]: a validated, trimmed user query
//! - [`error`]: validation and session errors

pub mod document;
pub mod error;
pub mod query;
