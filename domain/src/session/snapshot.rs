//! Read-only session view

use super::entities::{Phase, SessionState};
use super::message::Message;
use serde::{Deserialize, Serialize};

/// A point-in-time copy of a [`Session`](super::entities::Session).
///
/// Front ends render from snapshots and never touch the session itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub document_name: Option<String>,
    pub transcript: Vec<Message>,
    pub busy: bool,
}

impl SessionSnapshot {
    pub fn phase(&self) -> Phase {
        match self.state {
            SessionState::Idle | SessionState::AwaitingUpload => Phase::Idle,
            SessionState::DocumentReady | SessionState::AwaitingAnswer => Phase::DocumentReady,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }
}
