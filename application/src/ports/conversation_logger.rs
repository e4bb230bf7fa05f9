//! Port for structured conversation logging.
//!
//! Records what happened to the session (uploads, transcript appends,
//! resets, cancellations) in a machine-readable form. This is separate from
//! `tracing` diagnostics: tracing is for humans reading operation logs,
//! this port captures the conversation itself.

use docqa_domain::{Message, RequestKind};
use serde_json::{Value, json};

/// A structured conversation event for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message", "upload_failed", "reset").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A transcript entry was appended
    pub fn message(message: &Message) -> Self {
        Self::new(
            "message",
            json!({
                "role": message.role().as_str(),
                "text": message.text(),
                "source": message.source_ref(),
            }),
        )
    }

    pub fn upload_started(file_name: &str, bytes: u64) -> Self {
        Self::new(
            "upload_started",
            json!({ "file_name": file_name, "bytes": bytes }),
        )
    }

    /// Upload failures never reach the transcript, so they are logged here
    pub fn upload_failed(file_name: &str, reason: &str) -> Self {
        Self::new(
            "upload_failed",
            json!({ "file_name": file_name, "reason": reason }),
        )
    }

    pub fn cancelled(kind: RequestKind) -> Self {
        Self::new("cancelled", json!({ "request": kind.to_string() }))
    }

    pub fn reset(document_name: Option<&str>) -> Self {
        Self::new("reset", json!({ "document_name": document_name }))
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures are ignored
/// and never disturb the session.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
