use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::time::timeout;

use crate::intent::{
    error::{ClassifierError, IntentError, gateway_error},
    types::GenerationConfig,
};

/// The external text-generation collaborator.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ClassifierError>;
}

#[derive(Clone)]
pub struct ClassifierGateway {
    classifier: Arc<dyn TextClassifier>,
    generation: GenerationConfig,
    deadline: Duration,
}

impl ClassifierGateway {
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        generation: GenerationConfig,
        deadline: Duration,
    ) -> Self {
        Self {
            classifier,
            generation,
            deadline,
        }
    }

    /// One attempt, bounded by the deadline. Retries belong to the caller.
    pub async fn classify(&self, prompt: &str) -> Result<String, IntentError> {
        let started_at = Instant::now();
        let outcome = timeout(
            self.deadline,
            self.classifier.generate(prompt, &self.generation),
        )
        .await;
        let elapsed_ms = started_at.elapsed().as_millis() as u64;

        let raw = match outcome {
            Err(_) => {
                tracing::warn!(
                    target: "intent",
                    classifier = self.classifier.name(),
                    deadline_ms = self.deadline.as_millis() as u64,
                    "classifier_deadline_exceeded"
                );
                return Err(gateway_error(format!(
                    "classifier did not respond within {}ms",
                    self.deadline.as_millis()
                )));
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    target: "intent",
                    classifier = self.classifier.name(),
                    kind = ?err.kind,
                    provider_http_status = ?err.provider_http_status,
                    elapsed_ms,
                    error = %err,
                    "classifier_call_failed"
                );
                return Err(err.into());
            }
            Ok(Ok(raw)) => raw,
        };

        if raw.trim().is_empty() {
            tracing::warn!(
                target: "intent",
                classifier = self.classifier.name(),
                elapsed_ms,
                "classifier_returned_empty_output"
            );
            return Err(gateway_error("classifier returned empty output"));
        }

        tracing::debug!(
            target: "intent",
            classifier = self.classifier.name(),
            elapsed_ms,
            output_chars = raw.chars().count(),
            "classifier_call_completed"
        );
        Ok(raw)
    }
}
