use futures_util::StreamExt;
use walrus_ox::{ChatEvent, ChatRequest, Walrus, WalrusRequestError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_request() -> ChatRequest {
    ChatRequest::builder()
        .query("What is a walrus?")
        .session_id("session-1")
        .build()
}

async fn collect_events(
    client: &Walrus,
    request: &ChatRequest,
) -> Vec<Result<ChatEvent, WalrusRequestError>> {
    let mut stream = client.stream(request);
    let mut events = Vec::new();
    while let Some(item) = stream.next().await {
        events.push(item);
    }
    events
}

#[tokio::test]
async fn stream_decodes_known_events_and_skips_noise() {
    let server = MockServer::start().await;

    let body = concat!(
        "data: {\"type\":\"status\",\"status\":\"processing\",\"step\":\"retrieving_context\",\"message\":\"searching index\"}\n",
        ": keep-alive\n",
        "data: {not json}\n",
        "event: something\n",
        "data: {\"type\":\"chunk\",\"content\":\"Hello\"}\n",
        "data: {\"type\":\"heartbeat\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\" world\"}\n",
        "data: {\"type\":\"complete\",\"metadata\":{\"latency_ms\":120,\"session_id\":\"session-1\"}}\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/"))
        .and(header("accept", "text/event-stream"))
        .and(body_partial_json(serde_json::json!({
            "query": "What is a walrus?",
            "session_id": "session-1",
            "stream": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Walrus::builder().base_url(server.uri()).build();
    let events = collect_events(&client, &chat_request()).await;

    let events: Vec<ChatEvent> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(events.len(), 4, "noise lines must not become events");

    assert!(matches!(&events[0], ChatEvent::Status { step, .. } if step == "retrieving_context"));
    assert_eq!(
        events[1],
        ChatEvent::Chunk {
            content: "Hello".to_string()
        }
    );
    assert_eq!(
        events[2],
        ChatEvent::Chunk {
            content: " world".to_string()
        }
    );
    match &events[3] {
        ChatEvent::Complete { metadata } => assert_eq!(metadata.latency_ms, 120),
        other => panic!("expected complete event, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_lines_do_not_abort_the_stream() {
    let server = MockServer::start().await;

    // Garbage first, valid event after: the stream must survive to deliver it.
    let body = concat!(
        "data: {\"type\":\n",
        "data: [1,2,3]\n",
        "data: {\"type\":\"chunk\",\"content\":\"still alive\"}\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = Walrus::builder().base_url(server.uri()).build();
    let events = collect_events(&client, &chat_request()).await;

    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].as_ref().unwrap(),
        &ChatEvent::Chunk {
            content: "still alive".to_string()
        }
    );
}

#[tokio::test]
async fn final_event_without_trailing_newline_is_delivered() {
    let server = MockServer::start().await;

    let body = "data: {\"type\":\"complete\",\"metadata\":{\"latency_ms\":7}}";

    Mock::given(method("POST"))
        .and(path("/v1/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = Walrus::builder().base_url(server.uri()).build();
    let events = collect_events(&client, &chat_request()).await;

    assert_eq!(events.len(), 1);
    match events[0].as_ref().unwrap() {
        ChatEvent::Complete { metadata } => assert_eq!(metadata.latency_ms, 7),
        other => panic!("expected complete event, got {other:?}"),
    }
}

#[tokio::test]
async fn non_200_open_yields_a_single_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_raw("{\"detail\":\"pipeline unavailable\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let client = Walrus::builder().base_url(server.uri()).build();
    let events = collect_events(&client, &chat_request()).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        Err(WalrusRequestError::Api { status, message }) => {
            assert_eq!(*status, 503);
            assert_eq!(message, "pipeline unavailable");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}
