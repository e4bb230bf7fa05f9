//! Query value object

use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A question about the uploaded document (Value Object)
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    text: String,
}

impl Query {
    /// Trim the input and reject it if nothing is left
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(ValidationError::EmptyQuery)
        } else {
            Ok(Self {
                text: trimmed.to_string(),
            })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<&str> for Query {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Query::parse(s)
    }
}

impl TryFrom<String> for Query {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Query::parse(&s)
    }
}

impl From<Query> for String {
    fn from(q: Query) -> Self {
        q.text
    }
}
