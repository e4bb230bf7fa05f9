//! Session state machine

use super::message::Message;
use super::snapshot::SessionSnapshot;
use crate::core::document::DocumentFile;
use crate::core::error::SessionError;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};

/// Coarse workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No document uploaded yet
    #[default]
    Idle,
    /// A document is indexed and can be queried
    DocumentReady,
}

/// Kind of outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Upload,
    Query,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Upload => write!(f, "upload"),
            RequestKind::Query => write!(f, "query"),
        }
    }
}

/// The single outstanding request, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingRequest {
    Upload { file_name: String },
    Query,
}

/// Fine-grained observable state: [`Phase`] combined with the pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingUpload,
    DocumentReady,
    AwaitingAnswer,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingUpload => "awaiting upload",
            SessionState::DocumentReady => "document ready",
            SessionState::AwaitingAnswer => "awaiting answer",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side upload/conversation session (Aggregate Root)
///
/// All mutation goes through the transition methods below. Each request
/// is a two-phase transition: a `begin_*` call that validates and marks
/// the request pending, then exactly one `*_succeeded` or `*_failed`.
/// At most one request is pending at any time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
    document_name: Option<String>,
    transcript: Vec<Message>,
    pending: Option<PendingRequest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> SessionState {
        match (&self.pending, self.phase) {
            (Some(PendingRequest::Upload { .. }), _) => SessionState::AwaitingUpload,
            (Some(PendingRequest::Query), _) => SessionState::AwaitingAnswer,
            (None, Phase::Idle) => SessionState::Idle,
            (None, Phase::DocumentReady) => SessionState::DocumentReady,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            document_name: self.document_name.clone(),
            transcript: self.transcript.clone(),
            busy: self.is_busy(),
        }
    }

    // ==================== Upload ====================

    /// `Idle --submitFile--> AwaitingUpload`
    pub fn begin_upload(&mut self, file: &DocumentFile) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if let Some(name) = &self.document_name {
            return Err(SessionError::DocumentLoaded(name.clone()));
        }
        file.ensure_pdf()?;

        self.pending = Some(PendingRequest::Upload {
            file_name: file.name().to_string(),
        });
        Ok(())
    }

    /// `AwaitingUpload --uploadSucceeded--> DocumentReady`
    ///
    /// The document name is the one recorded by [`begin_upload`](Self::begin_upload).
    pub fn upload_succeeded(&mut self) -> Result<&Message, SessionError> {
        let file_name = match &self.pending {
            Some(PendingRequest::Upload { file_name }) => file_name.clone(),
            _ => return Err(SessionError::NotAwaiting(RequestKind::Upload)),
        };

        let notice = Message::upload_succeeded(&file_name);
        self.pending = None;
        self.phase = Phase::DocumentReady;
        self.document_name = Some(file_name);
        Ok(self.append(notice))
    }

    /// `AwaitingUpload --uploadFailed--> Idle`
    ///
    /// The failure is not recorded in the transcript.
    pub fn upload_failed(&mut self) -> Result<(), SessionError> {
        match self.pending {
            Some(PendingRequest::Upload { .. }) => {
                self.pending = None;
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(SessionError::NotAwaiting(RequestKind::Upload)),
        }
    }

    // ==================== Query ====================

    /// `DocumentReady --submitQuery--> AwaitingAnswer`
    ///
    /// Appends the user message before any response arrives.
    pub fn begin_query(&mut self, text: &str) -> Result<Query, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.phase != Phase::DocumentReady {
            return Err(SessionError::NoDocument);
        }
        let query = Query::parse(text)?;

        self.append(Message::user(query.text()));
        self.pending = Some(PendingRequest::Query);
        Ok(query)
    }

    /// `AwaitingAnswer --querySucceeded--> DocumentReady`
    pub fn query_succeeded(
        &mut self,
        answer: impl Into<String>,
        source: Option<String>,
    ) -> Result<&Message, SessionError> {
        self.take_query()?;
        Ok(self.append(Message::assistant(answer, source)))
    }

    /// `AwaitingAnswer --queryFailed--> DocumentReady`
    ///
    /// Unlike upload failures, the failure is recorded in the transcript.
    pub fn query_failed(&mut self, reason: &str) -> Result<&Message, SessionError> {
        self.take_query()?;
        Ok(self.append(Message::query_failed(reason)))
    }

    // ==================== Reset ====================

    /// `DocumentReady --reset--> Idle`
    ///
    /// Refused while a request is outstanding. From `Idle` this is a no-op.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        *self = Session::new();
        Ok(())
    }

    fn take_query(&mut self) -> Result<(), SessionError> {
        match self.pending {
            Some(PendingRequest::Query) => {
                self.pending = None;
                Ok(())
            }
            _ => Err(SessionError::NotAwaiting(RequestKind::Query)),
        }
    }

    fn append(&mut self, message: Message) -> &Message {
        let index = self.transcript.len();
        self.transcript.push(message);
        &self.transcript[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::session::message::Role;

    fn report() -> DocumentFile {
        DocumentFile::pdf("report.pdf", b"%PDF-1.7".to_vec())
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.begin_upload(&report()).unwrap();
        session.upload_succeeded().unwrap();
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
        assert!(session.document_name().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_upload_success_flow() {
        let mut session = Session::new();
        session.begin_upload(&report()).unwrap();
        assert!(session.is_busy());
        assert_eq!(session.state(), SessionState::AwaitingUpload);
        assert_eq!(session.phase(), Phase::Idle);

        let notice = session.upload_succeeded().unwrap().clone();
        assert_eq!(notice.role(), Role::System);
        assert_eq!(
            notice.text(),
            "Successfully uploaded \"report.pdf\". You can now ask questions about the document."
        );
        assert_eq!(session.transcript(), &[notice]);
        assert_eq!(session.phase(), Phase::DocumentReady);
        assert_eq!(session.document_name(), Some("report.pdf"));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_non_pdf_rejected_without_transition() {
        let mut session = Session::new();
        let file = DocumentFile::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = session.begin_upload(&file).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::NotPdf { .. })
        ));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_upload_failure_returns_to_idle() {
        let mut session = Session::new();
        session.begin_upload(&report()).unwrap();
        session.upload_failed().unwrap();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
        assert!(session.document_name().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_second_upload_while_busy_rejected() {
        let mut session = Session::new();
        session.begin_upload(&report()).unwrap();
        assert_eq!(session.begin_upload(&report()), Err(SessionError::Busy));
    }

    #[test]
    fn test_upload_after_document_loaded_rejected() {
        let mut session = ready_session();
        assert_eq!(
            session.begin_upload(&report()),
            Err(SessionError::DocumentLoaded("report.pdf".to_string()))
        );
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_query_before_upload_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.begin_query("What is the total?"),
            Err(SessionError::NoDocument)
        );
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_query_success_appends_user_then_assistant() {
        let mut session = ready_session();

        let query = session.begin_query("What is the total?").unwrap();
        assert_eq!(query.text(), "What is the total?");
        assert_eq!(session.state(), SessionState::AwaitingAnswer);
        // Optimistic update is visible while pending
        assert_eq!(
            session.transcript().last(),
            Some(&Message::user("What is the total?"))
        );

        session
            .query_succeeded("42", Some("page 3".to_string()))
            .unwrap();
        assert_eq!(
            &session.transcript()[1..],
            &[
                Message::user("What is the total?"),
                Message::assistant("42", Some("page 3".to_string())),
            ]
        );
        assert_eq!(session.state(), SessionState::DocumentReady);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_query_failure_appends_user_then_error() {
        let mut session = ready_session();
        session.begin_query("What is the total?").unwrap();
        session.query_failed("index not ready").unwrap();

        let tail = &session.transcript()[1..];
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].role(), Role::User);
        assert_eq!(tail[1].role(), Role::Error);
        assert_eq!(tail[1].text(), "Error querying document: index not ready");
        assert_eq!(session.phase(), Phase::DocumentReady);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_empty_query_is_a_noop() {
        let mut session = ready_session();
        assert_eq!(
            session.begin_query("   "),
            Err(SessionError::Validation(ValidationError::EmptyQuery))
        );
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_query_while_busy_rejected() {
        let mut session = ready_session();
        session.begin_query("first").unwrap();
        assert_eq!(session.begin_query("second"), Err(SessionError::Busy));
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_query_text_is_trimmed_in_transcript() {
        let mut session = ready_session();
        session.begin_query("  hello  ").unwrap();
        assert_eq!(session.transcript()[1].text(), "hello");
    }

    #[test]
    fn test_resolution_without_pending_request() {
        let mut session = ready_session();
        assert_eq!(
            session.query_succeeded("42", None).unwrap_err(),
            SessionError::NotAwaiting(RequestKind::Query)
        );
        assert_eq!(
            session.upload_succeeded().unwrap_err(),
            SessionError::NotAwaiting(RequestKind::Upload)
        );
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_mismatched_resolution_keeps_pending() {
        let mut session = ready_session();
        session.begin_query("q").unwrap();
        assert!(session.upload_failed().is_err());
        assert_eq!(session.state(), SessionState::AwaitingAnswer);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = ready_session();
        session.begin_query("q").unwrap();
        session.query_succeeded("a", None).unwrap();

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
        assert!(session.document_name().is_none());
    }

    #[test]
    fn test_reset_is_idempotent_from_idle() {
        let mut session = Session::new();
        session.reset().unwrap();
        session.reset().unwrap();
        assert_eq!(session.snapshot(), Session::new().snapshot());
    }

    #[test]
    fn test_reset_while_busy_is_ignored() {
        let mut session = ready_session();
        session.begin_query("q").unwrap();
        let before = session.snapshot();

        assert_eq!(session.reset(), Err(SessionError::Busy));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_session_usable_after_failures() {
        let mut session = Session::new();
        session.begin_upload(&report()).unwrap();
        session.upload_failed().unwrap();
        session.begin_upload(&report()).unwrap();
        session.upload_succeeded().unwrap();
        session.begin_query("q").unwrap();
        session.query_failed("boom").unwrap();
        session.begin_query("q again").unwrap();
        session.query_succeeded("ok", None).unwrap();

        let roles: Vec<Role> = session.transcript().iter().map(|m| m.role()).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Error, Role::User, Role::Assistant]
        );
    }
}
