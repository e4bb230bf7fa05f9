//! Session controller.
//!
//! Owns the [`Session`] and drives it through the upload and query clients.
//! Front ends call [`submit_file`](SessionController::submit_file),
//! [`submit_query`](SessionController::submit_query),
//! [`reset`](SessionController::reset) and [`cancel`](SessionController::cancel),
//! and render from [`snapshot`](SessionController::snapshot).
//!
//! # Request lifecycle
//!
//! ```text
//! lock ─ begin_* ─ unlock ─┬─ await client ─ lock ─ *_succeeded / *_failed ─ unlock
//!                          ├─ cancel()     ─ lock ─ *_failed ("Request cancelled")
//!                          └─ future drop  ─ lock ─ *_failed ("Request cancelled")
//! ```
//!
//! The session lock is never held across an `.await`. The session's own
//! busy check makes "at most one outstanding request" hold even when the
//! controller is shared between tasks.

use crate::config::ClientConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::document_service::{DocumentService, ServiceError};
use crate::ports::progress::{NoProgress, RequestProgress};
use crate::use_cases::ask_question::AskQuestionUseCase;
use crate::use_cases::upload_document::{UploadDocumentUseCase, UploadError, UploadedDocument};
use docqa_domain::util::preview;
use docqa_domain::{DocumentFile, Message, RequestKind, Session, SessionError, SessionSnapshot};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned by [`SessionController::submit_file`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Refused before anything was sent; the session is unchanged
    #[error(transparent)]
    Rejected(#[from] SessionError),

    /// The upload was sent and failed; the session is back to idle
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Owner of the session and its single outstanding request.
pub struct SessionController {
    session: Mutex<Session>,
    in_flight: Mutex<Option<CancellationToken>>,
    uploader: UploadDocumentUseCase,
    asker: AskQuestionUseCase,
    progress: Arc<dyn RequestProgress>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SessionController {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            in_flight: Mutex::new(None),
            uploader: UploadDocumentUseCase::new(service.clone()),
            asker: AskQuestionUseCase::new(service),
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.uploader = self.uploader.with_config(config);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn RequestProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Read-only copy of the current session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.session().is_busy()
    }

    // ==================== Upload ====================

    /// Upload a document and make it the subject of the conversation.
    ///
    /// Local validation failures and busy/already-loaded refusals come back
    /// as [`SubmitError::Rejected`] with no state change. Upload failures
    /// return the session to idle and are not added to the transcript.
    pub async fn submit_file(&self, file: DocumentFile) -> Result<UploadedDocument, SubmitError> {
        self.uploader
            .validate(&file)
            .map_err(SessionError::Validation)?;
        self.session().begin_upload(&file)?;

        let flight = InFlight::start(self, RequestKind::Upload);
        self.conversation_logger
            .log(ConversationEvent::upload_started(file.name(), file.size()));
        self.progress
            .on_request_start(RequestKind::Upload, file.name());

        let outcome = cancellable(flight.token(), self.uploader.execute(&file)).await;
        flight.finish();

        match outcome {
            Ok(uploaded) => {
                let notice = self.session().upload_succeeded()?.clone();
                self.progress.on_request_end(RequestKind::Upload, true);
                self.conversation_logger
                    .log(ConversationEvent::message(&notice));
                info!("Document ready: {}", uploaded.name);
                Ok(uploaded)
            }
            Err(err) => {
                self.session().upload_failed()?;
                self.progress.on_request_end(RequestKind::Upload, false);
                self.conversation_logger
                    .log(ConversationEvent::upload_failed(file.name(), &err.to_string()));
                Err(SubmitError::Upload(err))
            }
        }
    }

    // ==================== Query ====================

    /// Ask a question about the loaded document.
    ///
    /// The user message is appended before the request is sent. On success
    /// the returned message is the assistant answer; on failure it is the
    /// error entry that was appended. `Err` means the query was refused and
    /// nothing was appended.
    pub async fn submit_query(&self, text: &str) -> Result<Message, SessionError> {
        let (query, user_message) = {
            let mut session = self.session();
            let query = session.begin_query(text)?;
            let user_message = session.transcript().last().cloned();
            (query, user_message)
        };
        if let Some(user_message) = &user_message {
            self.conversation_logger
                .log(ConversationEvent::message(user_message));
        }

        let flight = InFlight::start(self, RequestKind::Query);
        self.progress
            .on_request_start(RequestKind::Query, &preview(query.text(), 60));

        let outcome = cancellable(flight.token(), self.asker.execute(&query)).await;
        flight.finish();

        let message = {
            let mut session = self.session();
            match &outcome {
                Ok(answer) => session
                    .query_succeeded(answer.answer.clone(), answer.source.clone())?
                    .clone(),
                Err(err) => session.query_failed(&err.reason())?.clone(),
            }
        };
        self.progress
            .on_request_end(RequestKind::Query, outcome.is_ok());
        self.conversation_logger
            .log(ConversationEvent::message(&message));
        Ok(message)
    }

    // ==================== Reset / Cancel ====================

    /// Forget the document and the transcript.
    ///
    /// Refused with [`SessionError::Busy`] while a request is outstanding;
    /// the session is left untouched in that case.
    pub fn reset(&self) -> Result<(), SessionError> {
        let previous = {
            let mut session = self.session();
            let previous = session.document_name().map(str::to_string);
            session.reset()?;
            previous
        };
        info!(
            "Session reset (document: {})",
            previous.as_deref().unwrap_or("none")
        );
        self.conversation_logger
            .log(ConversationEvent::reset(previous.as_deref()));
        Ok(())
    }

    /// Abort the outstanding request, if any.
    ///
    /// The request then resolves through its normal failure path. Returns
    /// `false` when nothing was in flight.
    pub fn cancel(&self) -> bool {
        match self.in_flight().as_ref() {
            Some(token) => {
                debug!("Cancelling outstanding request");
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Failure transition for a request whose future went away unresolved.
    fn abandon(&self, kind: RequestKind) {
        let reason = ServiceError::Cancelled.to_string();
        let appended = {
            let mut session = self.session();
            match kind {
                RequestKind::Upload => session.upload_failed().map(|_| None),
                RequestKind::Query => session.query_failed(&reason).map(|m| Some(m.clone())),
            }
        };

        match appended {
            Ok(message) => {
                warn!("Outstanding {} request abandoned", kind);
                self.progress.on_request_end(kind, false);
                self.conversation_logger
                    .log(ConversationEvent::cancelled(kind));
                if let Some(message) = message {
                    self.conversation_logger
                        .log(ConversationEvent::message(&message));
                }
            }
            Err(e) => debug!("Nothing to abandon: {}", e),
        }
    }
}

/// Race a client call against the cancellation token.
async fn cancellable<T, E, F>(token: &CancellationToken, request: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<ServiceError>,
{
    tokio::select! {
        _ = token.cancelled() => Err(ServiceError::Cancelled.into()),
        result = request => result,
    }
}

/// Tracks one outstanding request.
///
/// Dropping it without [`finish`](Self::finish) applies the failure
/// transition, so the busy flag cannot leak when the submitting future is
/// dropped mid-request.
struct InFlight<'a> {
    controller: &'a SessionController,
    kind: RequestKind,
    token: CancellationToken,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(controller: &'a SessionController, kind: RequestKind) -> Self {
        let token = CancellationToken::new();
        *controller.in_flight() = Some(token.clone());
        Self {
            controller,
            kind,
            token,
            finished: false,
        }
    }

    fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The caller applies the resolution itself.
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.controller.in_flight() = None;
        if !self.finished {
            self.controller.abandon(self.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::document_service::Answer;
    use crate::use_cases::test_support::{Delay, MockService, report_pdf};
    use docqa_domain::{Phase, Role, SessionState, ValidationError};
    use std::time::Duration;
    use tokio::sync::Notify;

    // ==================== Test Doubles ====================

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RequestProgress for RecordingProgress {
        fn on_request_start(&self, kind: RequestKind, label: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} {}", kind, label));
        }

        fn on_request_end(&self, kind: RequestKind, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("end {} {}", kind, success));
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl RecordingLogger {
        fn types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }
    }

    async fn ready_controller(service: MockService) -> (SessionController, Arc<MockService>) {
        let service = Arc::new(service.with_upload(Ok(())));
        let controller = SessionController::new(service.clone());
        controller.submit_file(report_pdf()).await.unwrap();
        (controller, service)
    }

    // ==================== Upload ====================

    #[tokio::test]
    async fn test_upload_report_pdf() {
        let service = Arc::new(MockService::new().with_upload(Ok(())));
        let controller = SessionController::new(service.clone());

        let uploaded = controller.submit_file(report_pdf()).await.unwrap();
        assert_eq!(uploaded.name, "report.pdf");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SessionState::DocumentReady);
        assert_eq!(snapshot.document_name.as_deref(), Some("report.pdf"));
        assert_eq!(snapshot.transcript.len(), 1);
        assert_eq!(snapshot.transcript[0].role(), Role::System);
        assert!(
            snapshot.transcript[0]
                .text()
                .starts_with("Successfully uploaded \"report.pdf\"")
        );
        assert!(!snapshot.busy);
    }

    #[tokio::test]
    async fn test_txt_upload_makes_no_call() {
        let service = Arc::new(MockService::new().with_upload(Ok(())));
        let controller = SessionController::new(service.clone());
        let file = DocumentFile::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = controller.submit_file(file).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Rejected(SessionError::Validation(ValidationError::NotPdf { .. }))
        ));
        assert_eq!(service.upload_calls(), 0);
        assert_eq!(controller.snapshot(), Session::new().snapshot());
    }

    #[tokio::test]
    async fn test_failed_upload_returns_to_idle() {
        let service = Arc::new(MockService::new().with_upload(Err(ServiceError::Server {
            status: 500,
            detail: Some("disk full".to_string()),
        })));
        let logger = Arc::new(RecordingLogger::default());
        let controller =
            SessionController::new(service.clone()).with_conversation_logger(logger.clone());

        let err = controller.submit_file(report_pdf()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error uploading file: disk full");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase(), Phase::Idle);
        assert!(snapshot.transcript.is_empty());
        assert!(!snapshot.busy);
        assert_eq!(logger.types(), vec!["upload_started", "upload_failed"]);
    }

    #[tokio::test]
    async fn test_upload_after_failure_succeeds() {
        let service = Arc::new(
            MockService::new()
                .with_upload(Err(ServiceError::Transport("connection reset".to_string())))
                .with_upload(Ok(())),
        );
        let controller = SessionController::new(service.clone());

        assert!(controller.submit_file(report_pdf()).await.is_err());
        assert!(controller.submit_file(report_pdf()).await.is_ok());
        assert_eq!(service.upload_calls(), 2);
        assert_eq!(controller.snapshot().state, SessionState::DocumentReady);
    }

    // ==================== Query ====================

    #[tokio::test]
    async fn test_query_before_upload_makes_no_call() {
        let service = Arc::new(MockService::new());
        let controller = SessionController::new(service.clone());

        let err = controller.submit_query("What is the total?").await.unwrap_err();
        assert_eq!(err, SessionError::NoDocument);
        assert_eq!(err.to_string(), "Please upload a document first");
        assert_eq!(service.query_calls(), 0);
        assert!(controller.snapshot().transcript.is_empty());
    }

    #[tokio::test]
    async fn test_successful_query_appends_user_then_assistant() {
        let (controller, _service) = ready_controller(
            MockService::new().with_answer(Ok(Answer::new("42").with_source("page 3"))),
        )
        .await;

        let message = controller.submit_query("What is the total?").await.unwrap();
        assert_eq!(message, Message::assistant("42", Some("page 3".to_string())));

        let snapshot = controller.snapshot();
        assert_eq!(
            &snapshot.transcript[1..],
            &[
                Message::user("What is the total?"),
                Message::assistant("42", Some("page 3".to_string())),
            ]
        );
        assert!(!snapshot.busy);
    }

    #[tokio::test]
    async fn test_failed_query_appends_user_then_error() {
        let (controller, _service) =
            ready_controller(MockService::new().with_answer(Err(ServiceError::Server {
                status: 500,
                detail: Some("index not ready".to_string()),
            })))
            .await;

        let message = controller.submit_query("What is the total?").await.unwrap();
        assert_eq!(message.role(), Role::Error);
        assert_eq!(message.text(), "Error querying document: index not ready");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.transcript.len(), 3);
        assert_eq!(snapshot.transcript[1], Message::user("What is the total?"));
        assert_eq!(snapshot.state, SessionState::DocumentReady);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let (controller, service) = ready_controller(MockService::new()).await;

        let err = controller.submit_query("  ").await.unwrap_err();
        assert_eq!(err, SessionError::Validation(ValidationError::EmptyQuery));
        assert_eq!(service.query_calls(), 0);
        assert_eq!(controller.snapshot().transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_pending_state_is_observable() {
        let gate = Arc::new(Notify::new());
        let (controller, _service) = ready_controller(
            MockService::new()
                .with_query_delay(Delay::Gate(gate.clone()))
                .with_answer(Ok(Answer::new("42"))),
        )
        .await;

        let observe = async {
            tokio::task::yield_now().await;
            let snapshot = controller.snapshot();
            assert_eq!(snapshot.state, SessionState::AwaitingAnswer);
            assert!(snapshot.busy);
            assert_eq!(snapshot.last_message(), Some(&Message::user("q")));

            // Second request and reset are both refused while busy
            assert_eq!(
                controller.submit_query("again").await.unwrap_err(),
                SessionError::Busy
            );
            assert_eq!(controller.reset(), Err(SessionError::Busy));
            assert_eq!(controller.snapshot(), snapshot);

            gate.notify_one();
        };

        let (result, ()) = tokio::join!(controller.submit_query("q"), observe);
        assert_eq!(result.unwrap(), Message::assistant("42", None));
        assert!(!controller.is_busy());
    }

    // ==================== Cancel / Drop ====================

    #[tokio::test]
    async fn test_cancel_resolves_query_as_error() {
        let (controller, _service) =
            ready_controller(MockService::new().with_query_delay(Delay::Forever)).await;
        assert!(!controller.cancel());

        let cancel = async {
            tokio::task::yield_now().await;
            assert!(controller.cancel());
        };

        let (result, ()) = tokio::join!(controller.submit_query("q"), cancel);
        let message = result.unwrap();
        assert_eq!(message.role(), Role::Error);
        assert_eq!(message.text(), "Error querying document: Request cancelled");
        assert!(!controller.is_busy());
        assert!(!controller.cancel());
    }

    #[tokio::test]
    async fn test_cancel_upload_returns_to_idle() {
        let service = Arc::new(MockService::new().with_upload_delay(Delay::Forever));
        let controller = SessionController::new(service);

        let cancel = async {
            tokio::task::yield_now().await;
            assert_eq!(controller.snapshot().state, SessionState::AwaitingUpload);
            assert!(controller.cancel());
        };

        let (result, ()) = tokio::join!(controller.submit_file(report_pdf()), cancel);
        assert_eq!(
            result.unwrap_err(),
            SubmitError::Upload(UploadError::Failed(ServiceError::Cancelled))
        );
        assert_eq!(controller.snapshot(), Session::new().snapshot());
    }

    #[tokio::test]
    async fn test_dropped_query_future_clears_busy() {
        let (controller, _service) =
            ready_controller(MockService::new().with_query_delay(Delay::Forever)).await;

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), controller.submit_query("q")).await;
        assert!(timed_out.is_err());

        let snapshot = controller.snapshot();
        assert!(!snapshot.busy);
        assert_eq!(snapshot.state, SessionState::DocumentReady);
        assert_eq!(
            snapshot.last_message().map(|m| m.text()),
            Some("Error querying document: Request cancelled")
        );
    }

    // ==================== Reset ====================

    #[tokio::test]
    async fn test_reset_returns_to_idle_and_allows_new_upload() {
        let (controller, service) = ready_controller(MockService::new().with_upload(Ok(()))).await;

        controller.reset().unwrap();
        assert_eq!(controller.snapshot(), Session::new().snapshot());

        controller.submit_file(report_pdf()).await.unwrap();
        assert_eq!(service.upload_calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_twice_from_idle() {
        let controller = SessionController::new(Arc::new(MockService::new()));
        controller.reset().unwrap();
        controller.reset().unwrap();
        assert_eq!(controller.snapshot(), Session::new().snapshot());
    }

    // ==================== Ports ====================

    #[tokio::test]
    async fn test_progress_start_and_end_are_paired() {
        let progress = Arc::new(RecordingProgress::default());
        let service = Arc::new(
            MockService::new()
                .with_upload(Ok(()))
                .with_answer(Err(ServiceError::Timeout)),
        );
        let controller = SessionController::new(service).with_progress(progress.clone());

        controller.submit_file(report_pdf()).await.unwrap();
        controller.submit_query("What is the total?").await.unwrap();

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "start upload report.pdf",
                "end upload true",
                "start query What is the total?",
                "end query false",
            ]
        );
    }

    #[tokio::test]
    async fn test_conversation_log_follows_transcript() {
        let logger = Arc::new(RecordingLogger::default());
        let service = Arc::new(
            MockService::new()
                .with_upload(Ok(()))
                .with_answer(Ok(Answer::new("42"))),
        );
        let controller = SessionController::new(service).with_conversation_logger(logger.clone());

        controller.submit_file(report_pdf()).await.unwrap();
        controller.submit_query("q").await.unwrap();
        controller.reset().unwrap();

        assert_eq!(
            logger.types(),
            vec!["upload_started", "message", "message", "message", "reset"]
        );
    }
}
