use std::sync::Arc;

use pathpilot_intent::{
    intent::error::{ClassifierError, ClassifierErrorKind, IntentError, IntentErrorKind},
    transport::{
        proto::{ParseIntentRequest, intent_service_server::IntentService},
        rpc::{RpcIntentService, status_from_error},
    },
};
use tonic::{Code, Request};

use crate::{
    NAVIGATE_REPLY,
    stub::{StubClassifier, pipeline_with},
};

fn request(text: &str) -> Request<ParseIntentRequest> {
    Request::new(ParseIntentRequest {
        transcribed_text: text.to_string(),
    })
}

#[tokio::test]
async fn given_valid_command_when_called_then_response_fields_populated() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let service = RpcIntentService::new(pipeline_with(stub));

    let response = service
        .parse_intent(request("Navigate to the pharmacy"))
        .await
        .expect("call succeeds")
        .into_inner();

    assert_eq!(response.intent, "navigate");
    assert_eq!(response.destination.as_deref(), Some("pharmacy"));
    assert_eq!(response.category, None);
    assert_eq!(response.confidence, 0.95);
    assert_eq!(response.original_text, "Navigate to the pharmacy");
    assert!(response.timestamp.ends_with('Z'));
}

#[tokio::test]
async fn given_empty_text_when_called_then_invalid_argument() {
    let stub = Arc::new(StubClassifier::replying(NAVIGATE_REPLY));
    let service = RpcIntentService::new(pipeline_with(Arc::clone(&stub)));

    let status = service
        .parse_intent(request(""))
        .await
        .expect_err("empty text must fail");

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "transcribedText is required");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn given_prose_reply_when_called_then_internal_with_reason_prefix() {
    let stub = Arc::new(StubClassifier::replying("I am not sure"));
    let service = RpcIntentService::new(pipeline_with(stub));

    let status = service
        .parse_intent(request("mumble"))
        .await
        .expect_err("prose must fail");

    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().starts_with("parse: "), "{}", status.message());
}

#[tokio::test]
async fn given_backend_failure_when_called_then_internal_gateway() {
    let stub = Arc::new(StubClassifier::failing(ClassifierError::new(
        ClassifierErrorKind::BackendTransient,
        "gemini returned status 503",
    )));
    let service = RpcIntentService::new(pipeline_with(stub));

    let status = service
        .parse_intent(request("help"))
        .await
        .expect_err("backend failure must fail");

    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().starts_with("gateway: "));
}

#[test]
fn given_overloaded_error_when_mapped_then_resource_exhausted() {
    let status = status_from_error(&IntentError::new(
        IntentErrorKind::Overloaded,
        "service is at capacity, retry later",
    ));
    assert_eq!(status.code(), Code::ResourceExhausted);
}

#[test]
fn given_request_message_when_encoded_then_text_uses_field_one() {
    use prost::Message;

    let bytes = ParseIntentRequest {
        transcribed_text: "hi".to_string(),
    }
    .encode_to_vec();
    assert_eq!(bytes, vec![0x0a, 0x02, b'h', b'i']);
}

#[test]
fn given_response_message_when_encoded_then_tags_follow_intent_proto() {
    use pathpilot_intent::transport::proto::ParseIntentResponse;
    use prost::Message;

    let full = ParseIntentResponse {
        intent: "navigate".to_string(),
        destination: Some("pharmacy".to_string()),
        category: Some(String::new()),
        confidence: 0.5,
        original_text: "go".to_string(),
        timestamp: "t".to_string(),
    }
    .encode_to_vec();
    // Keys are (tag << 3) | wire_type: strings are type 2, double is type 1.
    let mut expected = vec![0x0a, 8];
    expected.extend_from_slice(b"navigate");
    expected.extend_from_slice(&[0x12, 8]);
    expected.extend_from_slice(b"pharmacy");
    expected.extend_from_slice(&[0x1a, 0]);
    expected.push(0x21);
    expected.extend_from_slice(&0.5f64.to_le_bytes());
    expected.extend_from_slice(&[0x2a, 2]);
    expected.extend_from_slice(b"go");
    expected.extend_from_slice(&[0x32, 1]);
    expected.extend_from_slice(b"t");
    assert_eq!(full, expected);

    let decoded = ParseIntentResponse::decode(full.as_slice()).expect("message decodes");
    assert_eq!(decoded.category.as_deref(), Some(""));

    let absent = ParseIntentResponse {
        destination: None,
        category: None,
        ..decoded
    }
    .encode_to_vec();
    assert_eq!(absent.len(), expected.len() - (2 + 8) - 2);
}
