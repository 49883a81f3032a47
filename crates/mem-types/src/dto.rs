//! Request DTOs for the conversation memory HTTP API.

use serde::{Deserialize, Serialize};

/// Query parameters for GET requests (insertion order is kept on the wire).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Endpoint used to retrieve memory relevant to a query.
pub const RETRIEVE_MEMORY_ENDPOINT: &str = "/retrieve_memory/";

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    Ai,
}

/// Single conversation message, the body of `POST /conversation/{user_id}/{conversation_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
}

impl ConversationMessage {
    pub fn new(kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn human(text: impl Into<String>) -> Self {
        Self::new(MessageType::Human, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(MessageType::Ai, text)
    }
}

/// Memory retrieval query (`GET /retrieve_memory/?user_id=..&text=..`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveMemoryQuery {
    pub user_id: String,
    pub text: String,
}

impl RetrieveMemoryQuery {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
        }
    }

    /// Query parameters in wire order: user_id, then text.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("user_id".to_string(), self.user_id.clone().into());
        params.insert("text".to_string(), self.text.clone().into());
        params
    }
}

/// Path of the add-message endpoint for a user's conversation.
///
/// Ids are inserted verbatim; the server accepts e.g. e-mail addresses as user ids.
pub fn conversation_endpoint(user_id: &str, conversation_id: &str) -> String {
    format!("/conversation/{}/{}", user_id, conversation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_type_then_text() {
        let msg = ConversationMessage::human("Hello.");
        let s = serde_json::to_string(&msg).unwrap();
        assert_eq!(s, r#"{"type":"human","text":"Hello."}"#);

        let ai = ConversationMessage::ai("Hello, how can I help you?");
        let v = serde_json::to_value(&ai).unwrap();
        assert_eq!(v["type"], "ai");
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["type", "text"]);
    }

    #[test]
    fn message_deserializes_from_wire() {
        let msg: ConversationMessage =
            serde_json::from_str(r#"{"type":"ai","text":"Sure."}"#).unwrap();
        assert_eq!(msg.kind, MessageType::Ai);
        assert_eq!(msg.text, "Sure.");
        let unknown =
            serde_json::from_str::<ConversationMessage>(r#"{"type":"bot","text":"x"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn retrieve_query_params_keep_order() {
        let q = RetrieveMemoryQuery::new("u1@example.com", "Recommend places to visit in India.");
        let params = q.to_params();
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, ["user_id", "text"]);
        assert_eq!(params["user_id"], "u1@example.com");
    }

    #[test]
    fn conversation_endpoint_formats_ids_verbatim() {
        assert_eq!(
            conversation_endpoint("u1@example.com", "conversation_1"),
            "/conversation/u1@example.com/conversation_1"
        );
    }
}
