use std::{sync::Arc, time::Duration};

use crate::intent::{
    credentials::resolve_credential,
    error::{ClassifierError, ClassifierErrorKind},
    gateway::TextClassifier,
    types::{BackendDialect, ClassifierConfig},
};

pub mod gemini;
pub mod http_common;
pub mod openai_compatible;

pub fn build_classifier(config: &ClassifierConfig) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
    let endpoint = config.resolved_endpoint().ok_or_else(|| {
        ClassifierError::new(
            ClassifierErrorKind::InvalidConfig,
            format!("classifier dialect {:?} requires an endpoint", config.dialect),
        )
    })?;
    let credential = resolve_credential(&config.credential)?;
    // The gateway enforces the request deadline; the client timeout is a backstop.
    let client = http_common::build_client(Duration::from_millis(
        config.request_timeout_ms.saturating_mul(2),
    ))?;

    let classifier: Arc<dyn TextClassifier> = match config.dialect {
        BackendDialect::Gemini => Arc::new(gemini::GeminiClassifier::new(
            client,
            endpoint,
            config.model.clone(),
            credential,
        )),
        BackendDialect::OpenAiCompatible => {
            Arc::new(openai_compatible::OpenAiCompatibleClassifier::new(
                client,
                endpoint,
                config.model.clone(),
                credential,
            ))
        }
    };
    Ok(classifier)
}
