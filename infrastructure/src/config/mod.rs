//! Configuration file loading for docqa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `DOCQA_API_URL`, then `DOCQA_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./docqa.toml` or `./.docqa.toml`
//! 4. Global: `$XDG_CONFIG_HOME/docqa/config.toml` (or the platform equivalent)
//! 5. Default values
//!
//! Command line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, DEFAULT_MAX_UPLOAD_MB, DEFAULT_TIMEOUT_SECONDS,
    FileApiConfig, FileConfig, FileLoggingConfig, FileOutputConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
