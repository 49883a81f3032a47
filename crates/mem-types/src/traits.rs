//! Error taxonomy and the MemoryApi capability trait.

use crate::{
    conversation_endpoint, ConversationMessage, Params, RetrieveMemoryQuery,
    RETRIEVE_MEMORY_ENDPOINT,
};
use async_trait::async_trait;
use serde_json::Value;

/// Boxed transport error (keeps this crate independent of the HTTP library).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The memory service answered with a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// Connection refused, timeout, DNS failure or an undecodable response body.
    #[error("request error: {0}")]
    Request(#[source] BoxError),
    #[error("client is closed")]
    Closed,
    /// A blocking call was made from inside an async runtime.
    #[error("blocking call inside an async runtime; use the async client instead")]
    RuntimeActive,
    #[error("runtime error: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    /// A query parameter value that has no query-string form (e.g. an object).
    #[error("invalid query parameter `{key}`: {reason}")]
    InvalidParam { key: String, reason: String },
    #[error("request task failed: {0}")]
    Join(String),
}

impl ClientError {
    pub fn request(e: impl Into<BoxError>) -> Self {
        Self::Request(e.into())
    }

    /// HTTP status code for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Capability exposed by a conversation memory client.
///
/// Callers depend on this trait instead of a concrete client; the entry point
/// constructs one client and passes it down.
#[async_trait]
pub trait MemoryApi: Send + Sync {
    /// GET `{base_url}{endpoint}` with `params` as query parameters; returns the JSON body.
    async fn get(&self, endpoint: &str, params: Option<&Params>) -> Result<Value, ClientError>;

    /// POST `data` as JSON to `{base_url}{endpoint}`; returns the JSON body.
    async fn post(&self, endpoint: &str, data: &Value) -> Result<Value, ClientError>;

    /// Release the connection pool. Later calls fail with `ClientError::Closed`.
    async fn close(&self);

    /// Append a message to a user's conversation.
    async fn add_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        message: &ConversationMessage,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_value(message).map_err(ClientError::request)?;
        self.post(&conversation_endpoint(user_id, conversation_id), &body)
            .await
    }

    /// Retrieve memory relevant to `query.text` for `query.user_id`.
    async fn retrieve_memory(&self, query: &RetrieveMemoryQuery) -> Result<Value, ClientError> {
        self.get(RETRIEVE_MEMORY_ENDPOINT, Some(&query.to_params()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_for_http_errors() {
        let e = ClientError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(e.status(), Some(500));
        assert_eq!(e.to_string(), "HTTP error 500: boom");
        assert_eq!(ClientError::Closed.status(), None);
    }

    #[test]
    fn request_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = ClientError::request(io);
        assert!(matches!(e, ClientError::Request(_)));
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.to_string(), "request error: refused");
    }
}
