//! Sequential demonstration of the three monitoring operations: chat stream,
//! document upload with progress polling, and status history retrieval.
//!
//! Run against a local Walrus server (override with `WALRUS_BASE_URL`):
//!
//! ```sh
//! cargo run --example status_monitor [path/to/document.pdf]
//! ```

use walrus_ox::{StatusMonitor, Walrus};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let client = Walrus::load_from_env();
    println!("Walrus status tracking demo ({})", client.base_url());

    let monitor = StatusMonitor::new(client);

    println!("\n1. Chat status monitoring (SSE stream)");
    monitor
        .monitor_chat_stream(
            "demo_session_001",
            "What is artificial intelligence and how does machine learning work?",
        )
        .await;

    println!("\n2. Document upload progress monitoring");
    match std::env::args().nth(1) {
        Some(path) => match monitor.monitor_document_upload(&path).await {
            Ok(Some(document_id)) => println!("Document processed: {document_id}"),
            Ok(None) => {}
            Err(err) => println!("Could not read {path}: {err}"),
        },
        None => println!("Skipping upload demo (pass a file path to enable it)"),
    }

    println!("\n3. Chat status history retrieval");
    monitor
        .chat_status_history("demo_session_001", "demo_session_001")
        .await;

    println!("\nDemo completed");
}
