use serde::{Deserialize, Serialize};

/// One event from the chat SSE stream, tagged by the server's `type` field.
///
/// The enumeration is closed: payloads with an unknown `type` fail to
/// deserialize and are dropped by the stream decoder, so consumers only ever
/// see these four shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Pipeline progress (retrieving context, selecting model, ...).
    Status {
        status: String,
        step: String,
        message: String,
    },
    /// An incremental piece of the generated answer.
    Chunk { content: String },
    /// The stream is finished.
    Complete {
        #[serde(default)]
        metadata: CompleteMetadata,
    },
    /// The server failed mid-stream.
    Error { error: String },
}

/// Metadata attached to the terminal `complete` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompleteMetadata {
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Answer to a successful (201) document upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentUploadResponse {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Snapshot of a document's processing pipeline, polled from
/// `GET /v1/documents/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentStatus {
    /// Open set of server-defined states. Only `completed` and `failed` are
    /// terminal; anything else (including values this client has never seen)
    /// means "keep polling".
    pub processing_status: String,
    pub processing_step: String,
    #[serde(default)]
    pub progress_percentage: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_metadata: Option<StatusMetadata>,
}

impl DocumentStatus {
    /// Whether processing has reached a state that will never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self.processing_status.as_str(), "completed" | "failed")
    }
}

/// Counters the server attaches once chunking finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// One row of a conversation's status history, returned in server order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntry {
    /// Server-side timestamp, rendered verbatim; the serialization format is
    /// not part of the published contract.
    pub created_at: String,
    pub status: String,
    pub step: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_id: Option<String>,
}

/// Answer to `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
