use bon::Builder;
use serde::Serialize;

/// Body for `POST /v1/chat/`.
#[derive(Debug, Clone, Serialize, Builder)]
pub struct ChatRequest {
    /// The user's question.
    #[builder(into)]
    pub query: String,
    /// Conversation/session identifier the server scopes history to.
    #[builder(into)]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// How many retrieved chunks the RAG pipeline should consider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_k: Option<u32>,
}
