//! Transcript messages

use serde::{Deserialize, Serialize};

/// Prefix of query failure transcript entries
pub const QUERY_ERROR_PREFIX: &str = "Error querying document";

/// Who a transcript entry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Error,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transcript entry (Entity)
///
/// Immutable once constructed. `source_ref` is only ever set on
/// [`Role::Assistant`] messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_ref: Option<String>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
            source_ref: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            source_ref: None,
        }
    }

    /// An answer, optionally citing a source excerpt.
    ///
    /// A blank source is treated as no source.
    pub fn assistant(text: impl Into<String>, source_ref: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            source_ref: source_ref.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: Role::Error,
            text: text.into(),
            source_ref: None,
        }
    }

    /// The system notice appended after a successful upload
    pub fn upload_succeeded(document_name: &str) -> Self {
        Self::system(format!(
            "Successfully uploaded \"{}\". You can now ask questions about the document.",
            document_name
        ))
    }

    /// The error entry appended after a failed query
    pub fn query_failed(reason: &str) -> Self {
        Self::error(format!("{}: {}", QUERY_ERROR_PREFIX, reason))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }
}
