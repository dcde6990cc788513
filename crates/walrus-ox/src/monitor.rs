//! Console status monitoring on top of the [`Walrus`] client.
//!
//! The monitor owns all rendering; the client stays print-free. Rendering is
//! factored into pure `render_*` functions so output can be asserted without
//! capturing stdout.

use crate::{
    ChatRequest, Walrus,
    error::WalrusRequestError,
    response::{ChatEvent, DocumentStatus, StatusHistoryEntry},
};
use bon::Builder;
use futures_util::StreamExt;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Default delay between document status polls, the original script's "check
/// every second".
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches chat streams and document processing, printing progress lines.
///
/// Every failure is terminal for the operation in progress and is surfaced as
/// console text; the monitor never retries.
#[derive(Debug, Clone, Builder)]
pub struct StatusMonitor {
    #[builder(default)]
    client: Walrus,
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    poll_interval: Duration,
}

impl StatusMonitor {
    pub fn new(client: Walrus) -> Self {
        Self::builder().client(client).build()
    }

    pub fn client(&self) -> &Walrus {
        &self.client
    }

    /// Stream a chat response, printing every event until the server closes
    /// the stream or an error ends it. No retry, no timeout: the call
    /// suspends for as long as the server keeps the stream open.
    pub async fn monitor_chat_stream(&self, session_id: &str, query: &str) {
        println!("Starting chat stream for session: {session_id}");
        println!("Query: {query}");

        let request = ChatRequest::builder()
            .query(query)
            .session_id(session_id)
            .build();

        let mut stream = self.client.stream(&request);
        while let Some(result) = stream.next().await {
            match result {
                Ok(event) => print_rendered(&render_chat_event(&event)),
                Err(err) => {
                    println!("Error: {err}");
                    return;
                }
            }
        }
    }

    /// Upload a document and follow its processing to a terminal state.
    ///
    /// Returns `Ok(Some(document_id))` on an accepted upload and `Ok(None)`
    /// when the server rejects it (the rejection is printed, not raised).
    /// Only a local read failure before any request is made becomes an `Err`.
    pub async fn monitor_document_upload(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<String>, WalrusRequestError> {
        let path = path.as_ref();
        println!("Uploading document: {}", path.display());

        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        match self.client.upload_document(&filename, content).await {
            Ok(response) => {
                println!("Upload accepted. Document ID: {}", response.document_id);
                self.poll_document_status(&response.document_id).await;
                Ok(Some(response.document_id))
            }
            Err(err) => {
                println!("Upload failed: {err}");
                Ok(None)
            }
        }
    }

    /// Poll a document's status until it reaches `completed` or `failed`.
    ///
    /// A 404 means the status record is not written yet and polling
    /// continues; any other error stops the loop. There is no iteration cap:
    /// a server that never reaches a terminal state keeps this looping, one
    /// request per poll interval.
    pub async fn poll_document_status(&self, document_id: &str) {
        println!("Monitoring processing status...");

        loop {
            match self.client.document_status(document_id).await {
                Ok(status) => {
                    println!("{}", render_document_status(&status));
                    if status.is_terminal() {
                        break;
                    }
                }
                Err(err) if err.is_not_found() => {
                    println!("Status not available yet...");
                }
                Err(err) => {
                    println!("Error checking status: {err}");
                    break;
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Print a conversation's status history in server order.
    pub async fn chat_status_history(&self, user_id: &str, conversation_id: &str) {
        println!("Status history for conversation: {conversation_id}");

        match self.client.chat_status_history(user_id, conversation_id).await {
            Ok(entries) => {
                for entry in &entries {
                    println!("{}", render_history_entry(entry));
                }
            }
            Err(err) => println!("Error: {err}"),
        }
    }
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A rendered console fragment. `newline: false` marks incremental content
/// that must stay on the current line (chunked answer text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub newline: bool,
}

fn print_rendered(rendered: &Rendered) {
    if rendered.newline {
        println!("{}", rendered.text);
    } else {
        print!("{}", rendered.text);
        // Chunks arrive mid-line; without a flush they sit in the buffer.
        let _ = std::io::stdout().flush();
    }
}

/// Render one chat stream event.
pub fn render_chat_event(event: &ChatEvent) -> Rendered {
    match event {
        ChatEvent::Status {
            status,
            step,
            message,
        } => Rendered {
            text: format!("Status: {status} | Step: {step} | {message}"),
            newline: true,
        },
        ChatEvent::Chunk { content } => Rendered {
            text: content.clone(),
            newline: false,
        },
        ChatEvent::Complete { metadata } => Rendered {
            // Leading newline terminates the chunk line in progress.
            text: format!("\nChat completed in {}ms", metadata.latency_ms),
            newline: true,
        },
        ChatEvent::Error { error } => Rendered {
            text: format!("Error: {error}"),
            newline: true,
        },
    }
}

/// Render one document status poll result.
pub fn render_document_status(status: &DocumentStatus) -> String {
    format!(
        "[{:>3}%] {} | {} | {}",
        status.progress_percentage,
        status.processing_status,
        status.processing_step,
        status.status_message
    )
}

/// Render one status history row.
pub fn render_history_entry(entry: &StatusHistoryEntry) -> String {
    format!(
        "{} | {} | {} | {}",
        entry.created_at, entry.status, entry.step, entry.message
    )
}
