use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_cell::chat_routes;
use shared_utils::test_utils::TestConfig;

fn app(chat_service_url: &str) -> Router {
    let mut config = TestConfig::default();
    config.chat_service_url = chat_service_url.to_string();
    chat_routes(Arc::new(config.to_app_config()))
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_chat_relays_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "What are flu symptoms?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "Fever and aches." })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(post_chat(json!({ "message": "  What are flu symptoms?  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["reply"], "Fever and aches.");
}

#[tokio::test]
async fn test_chat_accepts_response_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hello!" })))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri()).oneshot(post_chat(json!({ "message": "hi" }))).await.unwrap();
    assert_eq!(read_json(response).await["reply"], "Hello!");
}

#[tokio::test]
async fn test_blank_message_is_rejected_without_upstream_call() {
    let mock_server = MockServer::start().await;

    let response = app(&mock_server.uri()).oneshot(post_chat(json!({ "message": "   " }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri()).oneshot(post_chat(json!({ "message": "hi" }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
