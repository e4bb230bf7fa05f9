//! Application-level configuration.
//!
//! Controls local checks the clients apply before any request is sent.

/// Default upload size limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Client behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Largest file the upload client will send.
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Creates a ClientConfig with the upload limit given in mebibytes.
    pub fn with_max_upload_mb(megabytes: u64) -> Self {
        Self {
            max_upload_bytes: megabytes.saturating_mul(1024 * 1024),
        }
    }
}
