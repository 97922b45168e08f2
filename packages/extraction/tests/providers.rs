//! End-to-end tests of both provider paths against local stand-in servers.
//!
//! Each test spins up an axum server that records the request and replies
//! with a canned status and body, then runs the orchestrator against it.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use drawing_extraction::{
    DocumentPayload, ErrorKind, Field, GenericChatConfig, Orchestrator, Provider, ProviderConfig,
    StructuredConfig, ValueKind,
};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    headers: HeaderMap,
    body: Value,
}

#[derive(Clone)]
struct MockProvider {
    status: StatusCode,
    reply: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockProvider {
    fn last_request(&self) -> Recorded {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn record(
    State(provider): State<MockProvider>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    provider.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });
    (
        provider.status,
        [(header::CONTENT_TYPE, "application/json")],
        provider.reply.clone(),
    )
}

/// Start a server answering every request with `status` and `reply`; returns its base URL.
async fn spawn_provider(status: StatusCode, reply: impl Into<String>) -> (String, MockProvider) {
    let provider = MockProvider {
        status,
        reply: reply.into(),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().fallback(record).with_state(provider.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), provider)
}

fn drawing_fields() -> Vec<Field> {
    vec![
        Field::new("width", "Width", ValueKind::Number).with_description("Overall width in mm"),
        Field::new("notes", "Notes", ValueKind::Text).with_description("General notes"),
    ]
}

fn png() -> DocumentPayload {
    DocumentPayload::from_bytes(b"fake png bytes".to_vec(), "image/png")
}

fn gemini_reply(text: &str) -> String {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]}).to_string()
}

fn chat_reply(content: Value) -> String {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]}).to_string()
}

fn structured(base_url: &str) -> Orchestrator {
    Orchestrator::new(
        ProviderConfig::new(Provider::Structured(
            StructuredConfig::new("test-key")
                .with_base_url(base_url)
                .with_model("gemini-test"),
        ))
        .with_system_prompt("Read the title block.")
        .with_temperature(0.25),
    )
}

fn generic_chat(endpoint: &str) -> Orchestrator {
    Orchestrator::new(
        ProviderConfig::new(Provider::GenericChat(GenericChatConfig::new(
            endpoint, "sk-test", "llava",
        )))
        .with_system_prompt("Read the title block.")
        .with_temperature(0.25),
    )
}

// =============================================================================
// Structured provider
// =============================================================================

#[tokio::test]
async fn test_structured_success_returns_values() {
    let (url, provider) = spawn_provider(
        StatusCode::OK,
        gemini_reply(r#"{"width": 12, "notes": null}"#),
    )
    .await;

    let outcome = structured(&url).extract(&png(), &drawing_fields()).await;

    let values = outcome.values().expect("should succeed");
    assert_eq!(json!(values), json!({"width": 12, "notes": null}));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_structured_request_shape() {
    let (url, provider) = spawn_provider(StatusCode::OK, gemini_reply("{}")).await;
    let document = DocumentPayload::from_encoded("data:image/png;base64,ZmFrZQ==", "image/png");

    structured(&url).extract(&document, &drawing_fields()).await;

    let request = provider.last_request();
    assert_eq!(request.path, "/models/gemini-test:generateContent");
    assert_eq!(request.headers.get("x-goog-api-key").unwrap(), "test-key");

    let parts = &request.body["contents"][0]["parts"];
    assert_eq!(
        parts[0],
        json!({"inlineData": {"mimeType": "image/png", "data": "ZmFrZQ=="}})
    );
    assert_eq!(parts[1], json!({"text": "Read the title block."}));

    let config = &request.body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["temperature"], 0.25);
    assert_eq!(config["responseSchema"]["type"], "OBJECT");
    assert_eq!(config["responseSchema"]["required"], json!(["width", "notes"]));
    assert_eq!(
        config["responseSchema"]["properties"]["width"]["type"],
        "NUMBER"
    );
}

#[tokio::test]
async fn test_structured_empty_reply_is_all_null_with_warning() {
    let (url, _provider) = spawn_provider(StatusCode::OK, r#"{"candidates": []}"#).await;

    let outcome = structured(&url).extract(&png(), &drawing_fields()).await;

    match outcome {
        drawing_extraction::ExtractionOutcome::Success(extraction) => {
            assert_eq!(json!(extraction.values), json!({"width": null, "notes": null}));
            assert_eq!(extraction.warnings.len(), 1);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_structured_http_error_reported() {
    let (url, _provider) = spawn_provider(
        StatusCode::BAD_REQUEST,
        r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#,
    )
    .await;

    let outcome = structured(&url).extract(&png(), &drawing_fields()).await;

    let failure = outcome.error().expect("should fail");
    assert_eq!(failure.kind, ErrorKind::Http);
    assert_eq!(failure.message, "API key not valid");
}

// =============================================================================
// Generic chat provider
// =============================================================================

#[tokio::test]
async fn test_generic_chat_success_and_request_shape() {
    let (url, provider) = spawn_provider(
        StatusCode::OK,
        chat_reply(json!("{\"width\": 40.5, \"notes\": \"Deburr all edges\"}")),
    )
    .await;

    let outcome = generic_chat(&format!("{}/v1", url))
        .extract(&png(), &drawing_fields())
        .await;

    assert_eq!(
        json!(outcome.values().expect("should succeed")),
        json!({"width": 40.5, "notes": "Deburr all edges"})
    );

    let request = provider.last_request();
    assert_eq!(request.path, "/v1/chat/completions");
    assert_eq!(request.headers.get("authorization").unwrap(), "Bearer sk-test");
    assert_eq!(request.body["model"], "llava");
    assert_eq!(request.body["response_format"], json!({"type": "json_object"}));
    assert_eq!(request.body["temperature"], 0.25);

    let content = &request.body["messages"][0]["content"];
    assert_eq!(request.body["messages"][0]["role"], "user");
    let text = content[0]["text"].as_str().unwrap();
    assert!(text.starts_with("Read the title block."));
    assert!(text.contains("\"width\": \"Overall width in mm\""));
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(
        content[1]["image_url"]["url"],
        "data:image/png;base64,ZmFrZSBwbmcgYnl0ZXM="
    );
}

#[tokio::test]
async fn test_generic_chat_accepts_full_completions_url() {
    let (url, provider) = spawn_provider(StatusCode::OK, chat_reply(json!("{}"))).await;

    let outcome = generic_chat(&format!("{}/v1/chat/completions/", url))
        .extract(&png(), &drawing_fields())
        .await;

    assert!(outcome.is_success());
    assert_eq!(provider.last_request().path, "/v1/chat/completions");
}

#[tokio::test]
async fn test_generic_chat_401_reports_provider_message() {
    let (url, _provider) = spawn_provider(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"message":"invalid key"}}"#,
    )
    .await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    let failure = outcome.error().expect("should fail");
    assert_eq!(failure.kind, ErrorKind::Http);
    assert_eq!(failure.message, "invalid key");
}

#[tokio::test]
async fn test_generic_chat_unreadable_error_body_uses_status() {
    let (url, _provider) = spawn_provider(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    let failure = outcome.error().expect("should fail");
    assert_eq!(failure.kind, ErrorKind::Http);
    assert_eq!(failure.message, "HTTP error 500");
}

#[tokio::test]
async fn test_generic_chat_connection_failure_is_network_error() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = generic_chat(&format!("http://{}/v1", addr))
        .extract(&png(), &drawing_fields())
        .await;

    let failure = outcome.error().expect("should fail");
    assert_eq!(failure.kind, ErrorKind::Network);
    assert_ne!(failure.kind, ErrorKind::Http);
    assert!(failure.message.contains("check the endpoint URL"));
}

#[tokio::test]
async fn test_generic_chat_missing_content_is_parse_error() {
    let (url, _provider) = spawn_provider(
        StatusCode::OK,
        r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
    )
    .await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    assert_eq!(outcome.error().expect("should fail").kind, ErrorKind::Parse);
}

#[tokio::test]
async fn test_generic_chat_non_json_content_is_parse_error() {
    let (url, _provider) = spawn_provider(
        StatusCode::OK,
        chat_reply(json!("The width is 12 mm.")),
    )
    .await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    assert_eq!(outcome.error().expect("should fail").kind, ErrorKind::Parse);
}

#[tokio::test]
async fn test_generic_chat_structured_content_used_as_is() {
    let (url, _provider) = spawn_provider(
        StatusCode::OK,
        chat_reply(json!({"width": 7, "notes": "none"})),
    )
    .await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    assert_eq!(
        json!(outcome.values().expect("should succeed")),
        json!({"width": 7, "notes": "none"})
    );
}

#[tokio::test]
async fn test_generic_chat_kind_mismatch_downgraded() {
    let (url, _provider) = spawn_provider(
        StatusCode::OK,
        chat_reply(json!("{\"width\": \"wide\", \"notes\": [\"a\"]}")),
    )
    .await;

    let outcome = generic_chat(&url).extract(&png(), &drawing_fields()).await;

    match outcome {
        drawing_extraction::ExtractionOutcome::Success(extraction) => {
            assert_eq!(json!(extraction.values), json!({"width": null, "notes": null}));
            assert_eq!(extraction.warnings.len(), 2);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_round_trip_preserves_key_set() {
    let fields = vec![
        Field::new("drawing_number", "No.", ValueKind::Text),
        Field::new("sheets", "Sheets", ValueKind::Number),
        Field::new("approved", "Approved", ValueKind::Boolean),
        Field::new("finishes", "Finishes", ValueKind::TextList),
        Field::new("holes", "Holes", ValueKind::NumberList),
    ];
    let reply = json!({
        "drawing_number": "DRW-1001",
        "sheets": 2,
        "approved": false,
        "finishes": ["anodize"],
        "holes": [4.2, 6.6]
    });
    let (url, _provider) = spawn_provider(StatusCode::OK, gemini_reply(&reply.to_string())).await;

    let outcome = structured(&url).extract(&png(), &fields).await;

    let values = outcome.values().expect("should succeed");
    let keys: Vec<&str> = values.keys().map(String::as_str).collect();
    let declared: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, declared);
    assert_eq!(json!(values), reply);
}
