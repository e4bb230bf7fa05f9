//! reqwest-backed [`DocumentService`] implementation

use async_trait::async_trait;
use docqa_application::ports::document_service::{Answer, DocumentService, ServiceError};
use docqa_domain::{DocumentFile, Query};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "file";

/// Success body of `POST /query`
#[derive(Debug, Deserialize)]
struct QueryResponse {
    answer: String,
    #[serde(default)]
    source: Option<String>,
}

/// Document service reached over HTTP.
///
/// Holds one shared [`reqwest::Client`] with the configured timeout. Every
/// call is a single request; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpDocumentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentService {
    /// Create a service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docqa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Pass 2xx responses through; turn anything else into [`ServiceError::Server`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(
            "Document service answered {} (detail: {})",
            status.as_u16(),
            detail.as_deref().unwrap_or("<none>")
        );
        Err(ServiceError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Pull a user-facing message out of an error body.
///
/// A string `detail` is used verbatim. Other truthy values (such as a list
/// of validation errors) are rendered as compact JSON. A falsy `detail`
/// (`null`, `""`, `false`, `0`) counts as absent, as does a missing or
/// unparsable body.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(detail) if detail.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn transport_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(error.to_string())
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn upload(&self, file: &DocumentFile) -> Result<(), ServiceError> {
        let url = self.endpoint("upload");
        debug!("POST {} ({}, {} bytes)", url, file.name(), file.size());

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        // The success body carries nothing the client needs
        Self::check_status(response).await.map(|_| ())
    }

    async fn query(&self, query: &Query) -> Result<Answer, ServiceError> {
        let url = self.endpoint("query");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": query.text() }))
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: QueryResponse = serde_json::from_slice(&body)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        Ok(Answer {
            answer: parsed.answer,
            source: parsed.source,
        })
    }
}
