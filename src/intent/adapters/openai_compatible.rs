use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::intent::{
    adapters::http_common,
    error::ClassifierError,
    gateway::TextClassifier,
    types::{GenerationConfig, OutputFormat, ResolvedCredential},
};

const BACKEND: &str = "openai-compatible";

#[derive(Clone)]
pub struct OpenAiCompatibleClassifier {
    client: Client,
    endpoint: String,
    model: String,
    credential: ResolvedCredential,
}

impl OpenAiCompatibleClassifier {
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
}

#[async_trait]
impl TextClassifier for OpenAiCompatibleClassifier {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ClassifierError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let mut body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": config.temperature,
            "stream": false,
        });
        if matches!(config.output_format, OutputFormat::Json) {
            body["response_format"] = json!({"type": "json_object"});
        }
        if let Some(max_tokens) = config.max_output_tokens {
            body["max_tokens"] = Value::Number(max_tokens.into());
        }

        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(api_key) = &self.credential.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", api_key));
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

        let payload = response.json::<Value>().await.map_err(|err| {
            http_common::protocol_violation(format!(
                "openai-compatible body decode failed: {}",
                err
            ))
        })?;

        extract_text(&payload)
    }
}

pub fn extract_text(payload: &Value) -> Result<String, ClassifierError> {
    let choice = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| {
            http_common::protocol_violation("openai-compatible response missing choices")
        })?;

    choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            http_common::protocol_violation(format!(
                "openai-compatible choice has no content (finish_reason={})",
                choice
                    .get("finish_reason")
                    .and_then(Value::as_str)
                    .unwrap_or("-")
            ))
        })
}
