//! Chat bridge contract tests
//!
//! Verify the HTTP request the bridge sends and how each kind of response is
//! unpacked, against a local mock of the Messages API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use productivity::config::LlmConfig;
use productivity::llm::{Chat, ChatBridge, ChatError};
use serde_json::{Value, json};
use tracing_subscriber::layer::SubscriberExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn config_for(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: server.uri(),
        api_key_env: "PB_CONTRACT_TEST_NO_KEY".to_string(),
        ..Default::default()
    }
}

/// Counts error-level events emitted while installed
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_errors() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (count, guard)
}

async fn mount_reply(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Request shaping
// =============================================================================

#[tokio::test]
async fn test_request_has_fixed_model_cap_and_single_user_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1000,
            "messages": [{"role": "user", "content": "Summarize my day"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": [{"text": "hello"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();
    assert_eq!(bridge.send("Summarize my day").await, Some("hello".to_string()));
}

#[tokio::test]
async fn test_prompt_is_sent_verbatim() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"content": [{"type": "text", "text": "ok"}]})),
    )
    .await;

    let prompt = "Line one\n\t\"quoted\" and {braces} and émojis 🚀";
    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();
    bridge.send(prompt).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], prompt);
}

#[tokio::test]
async fn test_configured_model_and_cap_are_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_json(json!({
            "model": "claude-haiku",
            "max_tokens": 64,
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": [{"text": "hey"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        model: "claude-haiku".to_string(),
        max_tokens: 64,
        ..config_for(&server)
    };
    let bridge = ChatBridge::from_config(&config).unwrap();
    assert_eq!(bridge.try_send("hi").await.unwrap(), "hey");
}

#[tokio::test]
async fn test_api_key_header_sent_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-contract-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": [{"text": "authorized"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = ChatBridge::from_config(&config_for(&server))
        .unwrap()
        .with_api_key("sk-contract-test");

    assert_eq!(bridge.send("hi").await.as_deref(), Some("authorized"));
}

// =============================================================================
// Reply extraction
// =============================================================================

#[tokio::test]
async fn test_first_block_text_is_the_reply() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Start with the report."},
                {"type": "text", "text": "Then email."}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 8}
        })),
    )
    .await;

    let (errors, _guard) = count_errors();
    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();

    assert_eq!(bridge.send("plan").await.as_deref(), Some("Start with the report."));
    assert_eq!(errors.load(Ordering::SeqCst), 0, "success must not log an error");
}

#[tokio::test]
async fn test_empty_content_is_no_reply_and_logs_once() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_json(json!({"content": []}))).await;

    let (errors, _guard) = count_errors();
    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();

    assert_eq!(bridge.send("plan").await, None);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unparseable_body_is_no_reply_and_logs_once() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>")).await;

    let (errors, _guard) = count_errors();
    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();

    assert_eq!(bridge.send("plan").await, None);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unparseable_body_is_json_error() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();
    let err = bridge.try_send("plan").await.unwrap_err();

    assert!(matches!(err, ChatError::Json(_)));
    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_error_status_is_api_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })),
    )
    .await;

    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();
    let err = bridge.try_send("plan").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_transport());
    assert!(err.to_string().contains("authentication_error"));
}

#[tokio::test]
async fn test_server_error_collapses_to_none() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(529).set_body_string("overloaded")).await;

    let (errors, _guard) = count_errors();
    let bridge = ChatBridge::from_config(&config_for(&server)).unwrap();

    assert_eq!(bridge.send("plan").await, None);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = LlmConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        api_key_env: "PB_CONTRACT_TEST_NO_KEY".to_string(),
        ..Default::default()
    };

    let bridge = ChatBridge::from_config(&config).unwrap();
    let err = bridge.try_send("plan").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)));
    assert!(err.is_transport());

    assert_eq!(bridge.send("plan").await, None);
}

#[tokio::test]
async fn test_configured_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"content": [{"text": "too late"}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = LlmConfig {
        timeout_ms: Some(100),
        ..config_for(&server)
    };
    let bridge = ChatBridge::from_config(&config).unwrap();

    match bridge.try_send("plan").await {
        Err(ChatError::Network(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
