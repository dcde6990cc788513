use thiserror::Error;

/// Errors that can occur while talking to the Walrus API.
#[derive(Error, Debug)]
pub enum WalrusRequestError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file I/O failed (reading a document before upload)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(String),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Success status but the body could not be decoded
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// UTF-8 conversion error in a stream line
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl WalrusRequestError {
    /// True for a 404 answer. Document status polling treats this as
    /// "status record not written yet" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Build an `Api` error from a non-success response body.
pub(crate) fn parse_error_response(
    status: reqwest::StatusCode,
    body: &bytes::Bytes,
) -> WalrusRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    WalrusRequestError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract a human-readable message from the error body.
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // FastAPI format: {"detail": "..."}
    if let Some(detail) = json.get("detail") {
        if let Some(text) = detail.as_str() {
            return Some(text.to_string());
        }
        // Validation errors come back as a detail array; keep them readable.
        if detail.is_array() {
            return Some(detail.to_string());
        }
    }

    // Generic message field
    if let Some(message) = json.get("message") {
        if let Some(text) = message.as_str() {
            return Some(text.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fastapi_detail_is_extracted() {
        let body = bytes::Bytes::from_static(b"{\"detail\":\"file too large\"}");
        let err = parse_error_response(reqwest::StatusCode::PAYLOAD_TOO_LARGE, &body);
        match err {
            WalrusRequestError::Api { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "file too large");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_falls_back_to_raw_text() {
        let body = bytes::Bytes::from_static(b"internal server error");
        let err = parse_error_response(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert_eq!(err.to_string(), "HTTP 500: internal server error");
    }

    #[test]
    fn not_found_is_recognized() {
        let body = bytes::Bytes::from_static(b"{\"detail\":\"Not Found\"}");
        let err = parse_error_response(reqwest::StatusCode::NOT_FOUND, &body);
        assert!(err.is_not_found());

        let other = parse_error_response(reqwest::StatusCode::BAD_REQUEST, &body);
        assert!(!other.is_not_found());
    }
}
