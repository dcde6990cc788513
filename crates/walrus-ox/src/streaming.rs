use crate::error::WalrusRequestError;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;

/// Incremental decoder for the `data: <json>` event lines the chat endpoint
/// streams. The Walrus server emits exactly one JSON payload per `data:` line,
/// so decoding is line-based rather than event-block based.
///
/// The decoder is lossy by contract: lines without the `data:` prefix, SSE
/// comments, and payloads that fail to deserialize are all dropped without
/// terminating the stream. Drops are logged at debug level.
pub struct SseDecoder {
    byte_stream: std::pin::Pin<
        Box<dyn futures_util::Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>,
    >,
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            byte_stream: Box::pin(response.bytes_stream()),
            buffer: Vec::new(),
        }
    }

    /// Get the next decodable event from the stream, or `None` when the
    /// response body is exhausted.
    pub async fn next_event<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<T>, WalrusRequestError> {
        loop {
            if let Some(event) = self.decode_buffered_lines::<T>()? {
                return Ok(Some(event));
            }

            if let Some(chunk_result) = self.byte_stream.next().await {
                let chunk = chunk_result?;
                self.buffer.extend_from_slice(&chunk);
            } else {
                // Stream ended; a final line may lack the trailing newline.
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = String::from_utf8(std::mem::take(&mut self.buffer))?;
                return Ok(decode_line(&line));
            }
        }
    }

    /// Drain complete lines out of the buffer until one decodes.
    fn decode_buffered_lines<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<T>, WalrusRequestError> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line = String::from_utf8(line_bytes)?;

            if let Some(event) = decode_line(&line) {
                return Ok(Some(event));
            }
        }

        Ok(None)
    }
}

/// Decode a single stream line. Returns `None` for anything that is not a
/// well-formed `data: <json>` line matching `T`.
pub(crate) fn decode_line<T: DeserializeOwned>(line: &str) -> Option<T> {
    let line = line.trim_end_matches(['\n', '\r']);

    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let Some(rest) = line.strip_prefix("data:") else {
        // Other SSE fields (event, id, retry) carry nothing for us.
        return None;
    };
    let data = rest.trim_start();
    if data.is_empty() {
        return None;
    }

    match serde_json::from_str(data) {
        Ok(event) => Some(event),
        Err(err) => {
            log::debug!("dropping undecodable stream line: {err}");
            None
        }
    }
}
