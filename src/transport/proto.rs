//! Wire types for `proto/intent.proto`.

use crate::intent::types::{IntentRequest, IntentResult};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParseIntentRequest {
    #[prost(string, tag = "1")]
    pub transcribed_text: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParseIntentResponse {
    #[prost(string, tag = "1")]
    pub intent: ::prost::alloc::string::String,
    #[prost(string, optional, tag = "2")]
    pub destination: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub category: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(double, tag = "4")]
    pub confidence: f64,
    #[prost(string, tag = "5")]
    pub original_text: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub timestamp: ::prost::alloc::string::String,
}

include!(concat!(env!("OUT_DIR"), "/intent.IntentService.rs"));

impl From<ParseIntentRequest> for IntentRequest {
    fn from(request: ParseIntentRequest) -> Self {
        IntentRequest::new(request.transcribed_text)
    }
}

impl From<IntentResult> for ParseIntentResponse {
    fn from(result: IntentResult) -> Self {
        Self {
            intent: result.intent.as_str().to_string(),
            destination: result.destination,
            category: result.category,
            confidence: result.confidence,
            original_text: result.original_text,
            timestamp: result.timestamp,
        }
    }
}
