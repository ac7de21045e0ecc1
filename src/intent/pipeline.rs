use std::{sync::Arc, time::Instant};

use tracing::Instrument;
use uuid::Uuid;

use crate::intent::{
    admission::Admission,
    error::IntentError,
    gateway::ClassifierGateway,
    prompt::PromptBuilder,
    request_normalizer::RequestNormalizer,
    response_normalizer::ResponseNormalizer,
    types::{AdmissionPolicy, IntentRequest, IntentResult},
};

struct PipelineStages {
    request_normalizer: RequestNormalizer,
    prompt_builder: PromptBuilder,
    gateway: ClassifierGateway,
    response_normalizer: ResponseNormalizer,
}

/// Transport-agnostic `ParseIntent`. Bindings only translate wire formats.
#[derive(Clone)]
pub struct IntentPipeline {
    stages: Arc<PipelineStages>,
    admission: Admission,
}

impl IntentPipeline {
    pub fn new(gateway: ClassifierGateway) -> Self {
        Self {
            stages: Arc::new(PipelineStages {
                request_normalizer: RequestNormalizer,
                prompt_builder: PromptBuilder,
                gateway,
                response_normalizer: ResponseNormalizer,
            }),
            admission: Admission::unlimited(),
        }
    }

    /// Shares the stages but gates requests through a separate admission policy.
    pub fn with_admission(&self, policy: &AdmissionPolicy) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
            admission: Admission::new(policy),
        }
    }

    pub async fn parse_intent(&self, request: IntentRequest) -> Result<IntentResult, IntentError> {
        let request_id = Uuid::now_v7().to_string();
        let span = tracing::info_span!(target: "intent", "parse_intent", request_id = %request_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: IntentRequest) -> Result<IntentResult, IntentError> {
        let started_at = Instant::now();
        let stages = &self.stages;

        let original_text = stages.request_normalizer.normalize(request)?;
        let _permit = self.admission.acquire().await?;

        let prompt = stages.prompt_builder.render(&original_text);
        let raw = stages.gateway.classify(&prompt).await?;
        let result = stages
            .response_normalizer
            .normalize(&raw, &original_text)?;

        tracing::info!(
            target: "intent",
            intent = %result.intent,
            confidence = result.confidence,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "intent_classified"
        );
        Ok(result)
    }
}
