use crate::{
    error::{self, WalrusRequestError},
    request::ChatRequest,
    response::{
        ChatEvent, DocumentStatus, DocumentUploadResponse, HealthResponse, StatusHistoryEntry,
    },
    streaming::SseDecoder,
};
use async_stream::try_stream;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

const CHAT_URL: &str = "v1/chat/";
const DOCUMENTS_URL: &str = "v1/documents";
const CONVERSATIONS_URL: &str = "v1/chat/conversations";
const HEALTH_URL: &str = "health";

/// HTTP method for API endpoints
#[derive(Debug, Clone)]
pub(crate) enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// An API endpoint with optional per-endpoint headers.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            extra_headers: None,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers = self.extra_headers.unwrap_or_default();
        headers.insert(key.into(), value.into());
        self.extra_headers = Some(headers);
        self
    }
}

/// Walrus client helper: URL building, request dispatch, response decoding.
#[derive(Clone)]
pub(crate) struct WalrusRequestHelper {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for WalrusRequestHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalrusRequestHelper")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WalrusRequestHelper {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn build_request(&self, endpoint: &Endpoint) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        );
        let method: Method = endpoint.method.clone().into();

        let mut req = self.client.request(method, &url);
        if let Some(ref headers) = endpoint.extra_headers {
            for (key, value) in headers {
                req = req.header(key, value);
            }
        }
        req
    }

    /// Execute a GET-style request and decode the JSON answer.
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, WalrusRequestError> {
        let res = self.build_request(endpoint).send().await?;
        handle_response(res).await
    }

    /// Decode the chat stream. Forces `stream: true` into the body and sets
    /// the SSE accept header; a non-200 answer becomes the stream's only item.
    fn stream_events(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatEvent, WalrusRequestError>> {
        let body = match serde_json::to_value(request) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return stream::once(async move {
                    Err(WalrusRequestError::Json(format!(
                        "streaming body must be a JSON object, got {other}"
                    )))
                })
                .boxed();
            }
            Err(e) => {
                return stream::once(async move { Err(WalrusRequestError::Json(e.to_string())) })
                    .boxed();
            }
        };

        let helper = self.clone();
        let endpoint = Endpoint::new(CHAT_URL, HttpMethod::Post)
            .with_header("accept", "text/event-stream");

        Box::pin(try_stream! {
            let mut body = body;
            body.insert("stream".to_string(), Value::Bool(true));

            let response = helper
                .build_request(&endpoint)
                .json(&Value::Object(body))
                .send()
                .await?;
            let status = response.status();

            if !status.is_success() {
                let bytes = response.bytes().await?;
                Err(error::parse_error_response(status, &bytes))?;
            } else {
                let mut decoder = SseDecoder::new(response);
                while let Some(event) = decoder.next_event::<ChatEvent>().await? {
                    yield event;
                }
            }
        })
    }

    pub fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatEvent, WalrusRequestError>> {
        self.stream_events(request)
    }

    /// Upload a document as multipart form data. The server signals success
    /// with 201 specifically; any other status is an API error.
    pub async fn upload_document(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<DocumentUploadResponse, WalrusRequestError> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let endpoint = Endpoint::new(format!("{DOCUMENTS_URL}/"), HttpMethod::Post);
        let res = self.build_request(&endpoint).multipart(form).send().await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        if status != StatusCode::CREATED {
            return Err(error::parse_error_response(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            WalrusRequestError::UnexpectedResponse(format!(
                "HTTP 201 but failed to decode upload response: {e}; body: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })
    }

    pub async fn document_status(
        &self,
        document_id: &str,
    ) -> Result<DocumentStatus, WalrusRequestError> {
        let endpoint = Endpoint::new(
            format!("{DOCUMENTS_URL}/{document_id}/status"),
            HttpMethod::Get,
        );
        self.request(&endpoint).await
    }

    pub async fn chat_status_history(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Vec<StatusHistoryEntry>, WalrusRequestError> {
        let endpoint = Endpoint::new(
            format!("{CONVERSATIONS_URL}/{user_id}/{conversation_id}/status"),
            HttpMethod::Get,
        );
        self.request(&endpoint).await
    }

    pub async fn health(&self) -> Result<HealthResponse, WalrusRequestError> {
        let endpoint = Endpoint::new(HEALTH_URL, HttpMethod::Get);
        self.request(&endpoint).await
    }
}

/// Decode a success body, or turn a non-success status into an API error.
async fn handle_response<T: DeserializeOwned>(
    res: reqwest::Response,
) -> Result<T, WalrusRequestError> {
    let status = res.status();
    let bytes = res.bytes().await?;

    if status.is_success() {
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            WalrusRequestError::UnexpectedResponse(format!(
                "HTTP {} but failed to decode JSON: {}; body: {}",
                status.as_u16(),
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })
    } else {
        Err(error::parse_error_response(status, &bytes))
    }
}
