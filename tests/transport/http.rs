use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pathpilot_intent::{
    intent::error::{ClassifierError, ClassifierErrorKind},
    transport::http::router,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    NAVIGATE_REPLY, post_parse_intent,
    stub::{StubClassifier, pipeline_with},
};

#[tokio::test]
async fn given_valid_command_when_posted_then_success_envelope() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let (status, body) = post_parse_intent(
        stub,
        r#"{"transcribedText":"Navigate to the pharmacy"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["intent"], "navigate");
    assert_eq!(data["destination"], "pharmacy");
    assert_eq!(data["category"], Value::Null);
    assert_eq!(data["confidence"], 0.95);
    assert_eq!(data["originalText"], "Navigate to the pharmacy");
    assert!(data["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
}

#[tokio::test]
async fn given_blank_text_when_posted_then_400_without_classifier_call() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let (status, body) = post_parse_intent(Arc::clone(&stub), r#"{"transcribedText":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": {
                "code": "INVALID_ARGUMENT",
                "reason": "validation",
                "message": "transcribedText is required"
            }
        })
    );
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn given_missing_field_when_posted_then_400() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let (status, body) = post_parse_intent(Arc::clone(&stub), "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["reason"], "validation");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn given_malformed_json_when_posted_then_400_envelope() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let (status, body) = post_parse_intent(Arc::clone(&stub), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn given_prose_reply_when_posted_then_500_parse_reason() {
    let stub = Arc::new(StubClassifier::replying("I am not sure"));
    let (status, body) = post_parse_intent(stub, r#"{"transcribedText":"mumble"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL");
    assert_eq!(body["error"]["reason"], "parse");
}

#[tokio::test]
async fn given_unknown_intent_reply_when_posted_then_500_schema_reason() {
    let stub = Arc::new(StubClassifier::replying(r#"{"intent":"fly","confidence":0.5}"#));
    let (status, body) = post_parse_intent(stub, r#"{"transcribedText":"fly"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["reason"], "schema");
}

#[tokio::test]
async fn given_backend_failure_when_posted_then_500_gateway_reason() {
    let stub = Arc::new(StubClassifier::failing(ClassifierError::new(
        ClassifierErrorKind::Authentication,
        "gemini authentication failed",
    )));
    let (status, body) = post_parse_intent(stub, r#"{"transcribedText":"help"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["reason"], "gateway");
}

#[tokio::test]
async fn given_health_probe_when_requested_then_healthy() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("request builds");
    let response = router(pipeline_with(Arc::clone(&stub)))
        .oneshot(request)
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body: Value = serde_json::from_slice(&bytes).expect("body is JSON");
    assert_eq!(body, json!({"status": "healthy"}));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn given_unknown_route_when_requested_then_404() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let request = Request::builder()
        .method("GET")
        .uri("/parse")
        .body(Body::empty())
        .expect("request builds");
    let response = router(pipeline_with(stub))
        .oneshot(request)
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn given_each_error_kind_when_mapped_then_only_overload_is_503() {
    use pathpilot_intent::{intent::error::IntentErrorKind, transport::http::status_code_for};

    assert_eq!(status_code_for(IntentErrorKind::Validation), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_code_for(IntentErrorKind::Overloaded),
        StatusCode::SERVICE_UNAVAILABLE
    );
    for kind in [
        IntentErrorKind::Gateway,
        IntentErrorKind::Parse,
        IntentErrorKind::Schema,
        IntentErrorKind::Internal,
    ] {
        assert_eq!(status_code_for(kind), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
