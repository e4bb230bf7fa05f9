//! HTTP adapter for the document service.
//!
//! [`HttpDocumentService`] implements the
//! [`DocumentService`](docqa_application::DocumentService) port over
//! `POST {base_url}/upload` (multipart) and `POST {base_url}/query` (JSON).

mod client;

pub use client::HttpDocumentService;
