use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};

use crate::intent::{
    adapters::http_common,
    error::{ClassifierError, ClassifierErrorKind},
    gateway::TextClassifier,
    types::{GenerationConfig, OutputFormat, ResolvedCredential},
};

const BACKEND: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Google Generative Language `generateContent` client.
#[derive(Clone)]
pub struct GeminiClassifier {
    client: Client,
    endpoint: String,
    model: String,
    credential: ResolvedCredential,
}

impl GeminiClassifier {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        credential: ResolvedCredential,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            credential,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextClassifier for GeminiClassifier {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ClassifierError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: WireGenerationConfig {
                temperature: config.temperature,
                response_mime_type: match config.output_format {
                    OutputFormat::Json => Some("application/json"),
                    OutputFormat::Text => None,
                },
                max_output_tokens: config.max_output_tokens,
            },
        };

        let mut request = self
            .client
            .post(self.url())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(api_key) = &self.credential.api_key {
            request = request.header("x-goog-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| http_common::map_transport_error(BACKEND, err))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(http_common::map_http_error(status, BACKEND, &body));
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| {
                http_common::protocol_violation(format!("gemini body decode failed: {}", err))
            })?;

        extract_text(payload)
    }
}

pub fn extract_text(payload: GenerateContentResponse) -> Result<String, ClassifierError> {
    if let Some(reason) = payload
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ClassifierError::new(
            ClassifierErrorKind::BackendRejected,
            format!("gemini blocked the prompt: {}", reason),
        ));
    }

    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| http_common::protocol_violation("gemini response has no candidates"))?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(http_common::protocol_violation(format!(
            "gemini candidate has no text (finish_reason={})",
            candidate.finish_reason.as_deref().unwrap_or("-")
        )));
    }

    Ok(text)
}
