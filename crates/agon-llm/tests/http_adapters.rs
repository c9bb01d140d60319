//! HTTP adapter tests against an in-process chat-completions server
//!
//! Each test binds an axum server on 127.0.0.1:0 that impersonates the
//! upstream endpoint, then points a real adapter at it.

use std::sync::{Arc, Mutex};

use agon_core::Credential;
use agon_llm::{
    ChatMessage, CompletionProvider, CompletionRequest, LlmConfig, OpenAiProvider, ProviderError,
    XaiProvider, EMPTY_COMPLETION_FALLBACK,
};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

/// Server that records requests and answers with `content`
async fn recording_server(content: &'static str) -> (String, Captured) {
    async fn handler(
        State((captured, content)): State<(Captured, &'static str)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        captured.lock().unwrap().push((auth, body));
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        }))
    }

    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .with_state((captured.clone(), content));
    (serve(app).await, captured)
}

/// Server that answers every call with a fixed status and body
async fn canned_server(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
    );
    serve(app).await
}

fn request(model: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system("You are OpenAI Assistant, debating."),
            ChatMessage::assistant("My earlier point").named("OpenAI Assistant"),
            ChatMessage::user("Opponent's rebuttal"),
        ],
        model: model.to_string(),
        temperature: 0.7,
        max_tokens: 1000,
        api_key: Credential::new("sk-test"),
    }
}

#[tokio::test]
async fn test_success_sends_openai_compatible_body() {
    let (base_url, captured) = recording_server("Evidence suggests otherwise.").await;
    let provider = OpenAiProvider::with_base_url(&base_url);

    let text = provider.complete(request("gpt-4o-mini")).await.unwrap();
    assert_eq!(text, "Evidence suggests otherwise.");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (auth, body) = &captured[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
    assert_eq!(body["messages"][1]["name"], "OpenAI_Assistant");
    assert!(body["messages"][2].get("name").is_none());
}

#[tokio::test]
async fn test_empty_content_is_fallback_success() {
    let (base_url, _) = recording_server("").await;
    let provider = XaiProvider::with_base_url(&base_url);

    let text = provider.complete(request("grok-2-latest")).await.unwrap();
    assert_eq!(text, EMPTY_COMPLETION_FALLBACK);
}

#[tokio::test]
async fn test_auth_failure_carries_upstream_message() {
    let base_url = canned_server(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"message":"Incorrect API key provided: sk-test","type":"invalid_request_error"}}"#,
    )
    .await;
    let provider = OpenAiProvider::with_base_url(&base_url);

    let err = provider.complete(request("gpt-4o-mini")).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(
        err,
        ProviderError::Upstream {
            status: 401,
            message: "Incorrect API key provided: sk-test".to_string()
        }
    );
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let base_url = canned_server(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
    let provider = OpenAiProvider::with_base_url(&base_url);

    let err = provider.complete(request("gpt-4o-mini")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Upstream { status: 429, .. }));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let base_url = canned_server(StatusCode::OK, r#"{"choices": []}"#).await;
    let provider = OpenAiProvider::with_base_url(&base_url);

    let err = provider.complete(request("gpt-4o-mini")).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = OpenAiProvider::with_base_url(&format!("http://{}/v1", addr));
    let err = provider.complete(request("gpt-4o-mini")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Connection(_)));
}

#[tokio::test]
async fn test_config_router_sends_grok_to_alternate_endpoint() {
    let (openai_url, openai_calls) = recording_server("from openai").await;
    let (xai_url, xai_calls) = recording_server("from xai").await;

    let config = LlmConfig {
        openai_base_url: openai_url,
        xai_base_url: xai_url,
        ..LlmConfig::default()
    };
    let router = config.router();

    assert_eq!(router.complete(request("grok-2-latest")).await.unwrap(), "from xai");
    assert_eq!(router.complete(request("gpt-4o-mini")).await.unwrap(), "from openai");
    assert_eq!(openai_calls.lock().unwrap().len(), 1);
    assert_eq!(xai_calls.lock().unwrap().len(), 1);
}

/// Real API round trip
#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY"]
async fn test_openai_real_request() {
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set for this test");

    let mut req = request("gpt-4o-mini");
    req.api_key = Credential::new(api_key);
    req.max_tokens = 50;

    let text = OpenAiProvider::new().complete(req).await;
    assert!(text.is_ok(), "Request should succeed: {:?}", text);
}
