use super::catalog::ErrorKind;

use common::HttpStatusCode;

use thiserror::Error;

/// Key for uncatalogued upstream errors that arrived without a code.
pub const UNKNOWN_ERROR_KEY: &str = "UNKNOWN_ERROR";

/// Key for failures whose body could not be classified at all.
pub const UNEXPECTED_RESPONSE_KEY: &str = "UNEXPECTED_RESPONSE";

/// The SDK's stable description of a rejected API call.
///
/// Branch on [`kind`](Self::kind) (or [`key`](Self::key) for uncatalogued
/// errors); show [`messages`](Self::messages) to people.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key} (HTTP {http_status}): {}", .messages.join("; "))]
pub struct DomainError {
    kind: Option<ErrorKind>,
    key: String,
    http_status: HttpStatusCode,
    messages: Vec<String>,
}

impl DomainError {
    /// The catalog entry with its default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind: Some(kind),
            key: kind.key().to_string(),
            http_status: kind.http_status(),
            messages: vec![kind.default_message().to_string()],
        }
    }

    /// Upstream code absent from every table: 409 with the upstream text.
    pub fn unmapped<S: AsRef<str>>(code: &str, messages: &[S]) -> Self {
        let code = code.trim();
        Self {
            kind: None,
            key: if code.is_empty() {
                UNKNOWN_ERROR_KEY.to_string()
            } else {
                code.to_string()
            },
            http_status: HttpStatusCode::CONFLICT,
            messages: messages.iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    /// Failure that no handler could interpret; keeps the original status and body.
    pub fn unexpected_response(status: HttpStatusCode, body: &str) -> Self {
        let body = body.trim();
        Self {
            kind: None,
            key: UNEXPECTED_RESPONSE_KEY.to_string(),
            http_status: status,
            messages: if body.is_empty() {
                vec![format!("HTTP {status}")]
            } else {
                vec![body.to_string()]
            },
        }
    }

    /// Replace the messages, e.g. with upstream wording.
    pub fn with_messages<S: AsRef<str>>(mut self, messages: &[S]) -> Self {
        if !messages.is_empty() {
            self.messages = messages.iter().map(|m| m.as_ref().to_string()).collect();
        }
        self
    }

    /// Catalog entry this error resolved to; `None` for fallbacks.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == Some(kind)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn http_status(&self) -> HttpStatusCode {
        self.http_status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl From<ErrorKind> for DomainError {
    fn from(kind: ErrorKind) -> Self {
        DomainError::from_kind(kind)
    }
}
