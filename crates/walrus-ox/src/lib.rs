#![cfg_attr(not(test), deny(unsafe_code))]

pub mod error;
mod internal;
pub mod monitor;
pub mod request;
pub mod response;
mod streaming;

// Re-export main types
pub use error::WalrusRequestError;
pub use monitor::StatusMonitor;
pub use request::ChatRequest;
pub use response::{
    ChatEvent, CompleteMetadata, DocumentStatus, DocumentUploadResponse, HealthResponse,
    StatusHistoryEntry, StatusMetadata,
};

use bon::Builder;
use core::fmt;
use futures_util::stream::BoxStream;

use crate::internal::WalrusRequestHelper;

const BASE_URL: &str = "http://localhost:8000";

/// Client for the Walrus document/chat API.
///
/// Holds nothing but the configured base URL and a pooled `reqwest` client;
/// every operation is an independent awaited call.
#[derive(Clone, Builder)]
pub struct Walrus {
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
}

impl Default for Walrus {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Walrus {
    /// Create a client against the default local server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client, honoring a `WALRUS_BASE_URL` override when present.
    pub fn load_from_env() -> Self {
        match std::env::var("WALRUS_BASE_URL") {
            Ok(base_url) => Self::builder().base_url(base_url).build(),
            Err(_) => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> WalrusRequestHelper {
        WalrusRequestHelper::new(self.client.clone(), &self.base_url)
    }

    /// Stream chat events for the given request.
    ///
    /// `stream: true` is forced into the body regardless of what the request
    /// carries, and the SSE accept header is set. Events the server emits
    /// that fail to decode are skipped, not surfaced, so the stream only ever
    /// yields well-formed [`ChatEvent`]s or a single terminal error.
    pub fn stream(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatEvent, WalrusRequestError>> {
        self.request_helper().stream_chat(request)
    }

    /// Upload a document for indexing. Success is HTTP 201.
    pub async fn upload_document(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<DocumentUploadResponse, WalrusRequestError> {
        self.request_helper()
            .upload_document(filename, content)
            .await
    }

    /// Fetch the current processing status of an uploaded document.
    ///
    /// A 404 means the status record has not been written yet; callers can
    /// detect it with [`WalrusRequestError::is_not_found`].
    pub async fn document_status(
        &self,
        document_id: &str,
    ) -> Result<DocumentStatus, WalrusRequestError> {
        self.request_helper().document_status(document_id).await
    }

    /// Fetch a conversation's status history, oldest entry first.
    pub async fn chat_status_history(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Vec<StatusHistoryEntry>, WalrusRequestError> {
        self.request_helper()
            .chat_status_history(user_id, conversation_id)
            .await
    }

    /// Check API health and connectivity.
    pub async fn health(&self) -> Result<HealthResponse, WalrusRequestError> {
        self.request_helper().health().await
    }
}

impl fmt::Debug for Walrus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walrus")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
