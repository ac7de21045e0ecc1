#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use pathpilot_intent::intent::{
    error::ClassifierError,
    gateway::{ClassifierGateway, TextClassifier},
    pipeline::IntentPipeline,
    types::{DEFAULT_REQUEST_TIMEOUT_MS, GenerationConfig},
};

#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Fail(ClassifierError),
}

/// Deterministic classifier that replays one scripted reply.
pub struct StubClassifier {
    reply: StubReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_config: Mutex<Option<GenerationConfig>>,
}

impl StubClassifier {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(StubReply::Text(text.into()))
    }

    pub fn failing(error: ClassifierError) -> Self {
        Self::new(StubReply::Fail(error))
    }

    fn new(reply: StubReply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_config: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last_config(&self) -> Option<GenerationConfig> {
        self.last_config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextClassifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(prompt.to_string());
        *self
            .last_config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Fail(error) => Err(error.clone()),
        }
    }
}

pub fn gateway_with(classifier: Arc<StubClassifier>, deadline: Duration) -> ClassifierGateway {
    ClassifierGateway::new(classifier, GenerationConfig::default(), deadline)
}

pub fn pipeline_with(classifier: Arc<StubClassifier>) -> IntentPipeline {
    IntentPipeline::new(gateway_with(
        classifier,
        Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
    ))
}
