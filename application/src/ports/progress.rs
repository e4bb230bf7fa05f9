//! Progress notification port
//!
//! Defines how front ends learn that a request is outstanding, so they can
//! show a spinner while it runs.

use docqa_domain::RequestKind;

/// Callback for request lifecycle updates
///
/// Implementations live in the presentation layer. `on_request_end` is
/// called exactly once for every `on_request_start`.
pub trait RequestProgress: Send + Sync {
    /// Called when a request is sent. `label` is the file name or query.
    fn on_request_start(&self, kind: RequestKind, label: &str);

    /// Called when the request resolved, failed or was abandoned
    fn on_request_end(&self, kind: RequestKind, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RequestProgress for NoProgress {
    fn on_request_start(&self, _kind: RequestKind, _label: &str) {}
    fn on_request_end(&self, _kind: RequestKind, _success: bool) {}
}
