//! Scripted [`DocumentService`] for use case tests

use crate::ports::document_service::{Answer, DocumentService, ServiceError};
use async_trait::async_trait;
use docqa_domain::{DocumentFile, Query};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// How the mock behaves before answering
pub(crate) enum Delay {
    None,
    /// Wait until the gate is notified
    Gate(Arc<Notify>),
    /// Never answer
    Forever,
}

pub(crate) struct MockService {
    uploads: Mutex<VecDeque<Result<(), ServiceError>>>,
    answers: Mutex<VecDeque<Result<Answer, ServiceError>>>,
    upload_calls: AtomicUsize,
    query_calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
    upload_delay: Delay,
    query_delay: Delay,
}

impl MockService {
    pub(crate) fn new() -> Self {
        Self {
            uploads: Mutex::new(VecDeque::new()),
            answers: Mutex::new(VecDeque::new()),
            upload_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            upload_delay: Delay::None,
            query_delay: Delay::None,
        }
    }

    pub(crate) fn with_upload(self, result: Result<(), ServiceError>) -> Self {
        self.uploads.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn with_answer(self, result: Result<Answer, ServiceError>) -> Self {
        self.answers.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn with_upload_delay(mut self, delay: Delay) -> Self {
        self.upload_delay = delay;
        self
    }

    pub(crate) fn with_query_delay(mut self, delay: Delay) -> Self {
        self.query_delay = delay;
        self
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    async fn wait(delay: &Delay) {
        match delay {
            Delay::None => {}
            Delay::Gate(gate) => gate.notified().await,
            Delay::Forever => std::future::pending::<()>().await,
        }
    }
}

#[async_trait]
impl DocumentService for MockService {
    async fn upload(&self, _file: &DocumentFile) -> Result<(), ServiceError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        Self::wait(&self.upload_delay).await;
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ServiceError::Transport("no scripted upload".to_string())))
    }

    async fn query(&self, query: &Query) -> Result<Answer, ServiceError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.text().to_string());
        Self::wait(&self.query_delay).await;
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ServiceError::Transport("no scripted answer".to_string())))
    }
}

pub(crate) fn report_pdf() -> DocumentFile {
    DocumentFile::pdf("report.pdf", b"%PDF-1.7 fake".to_vec())
}
