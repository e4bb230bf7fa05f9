//! Infrastructure layer for docqa
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod files;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, DEFAULT_BASE_URL, FileApiConfig, FileConfig,
    FileLoggingConfig, FileOutputConfig, FileReplConfig,
};
pub use files::{LoadError, LocalDocumentLoader};
pub use http::HttpDocumentService;
pub use logging::JsonlConversationLogger;
