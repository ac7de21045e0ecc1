use std::time::Duration;

use reqwest::Client;

use crate::intent::error::{ClassifierError, ClassifierErrorKind};

const ERROR_BODY_CHARS: usize = 240;

pub fn build_client(timeout: Duration) -> Result<Client, ClassifierError> {
    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .map_err(|err| {
            ClassifierError::new(
                ClassifierErrorKind::InvalidConfig,
                format!("failed to build http client: {}", err),
            )
        })
}

pub fn map_http_error(status: u16, backend: &str, body: &str) -> ClassifierError {
    let normalized_body = body.chars().take(ERROR_BODY_CHARS).collect::<String>();

    let mut err = match status {
        401 => ClassifierError::new(
            ClassifierErrorKind::Authentication,
            format!("{} authentication failed", backend),
        ),
        403 => ClassifierError::new(
            ClassifierErrorKind::Authorization,
            format!("{} authorization failed", backend),
        ),
        408 | 429 => ClassifierError::new(
            ClassifierErrorKind::RateLimited,
            format!("{} returned status {}", backend, status),
        ),
        400..=499 => ClassifierError::new(
            ClassifierErrorKind::BackendRejected,
            format!("{} returned status {}", backend, status),
        ),
        _ => ClassifierError::new(
            ClassifierErrorKind::BackendTransient,
            format!("{} returned status {}", backend, status),
        ),
    }
    .with_provider_http_status(status);

    if !normalized_body.is_empty() {
        err.message = format!("{}: {}", err.message, normalized_body);
    }

    err
}

pub fn map_transport_error(backend: &str, err: reqwest::Error) -> ClassifierError {
    if err.is_timeout() {
        return ClassifierError::new(
            ClassifierErrorKind::Timeout,
            format!("{} request timed out", backend),
        );
    }
    ClassifierError::new(
        ClassifierErrorKind::BackendTransient,
        format!("{} request failed: {}", backend, err),
    )
}

pub fn protocol_violation(message: impl Into<String>) -> ClassifierError {
    ClassifierError::new(ClassifierErrorKind::ProtocolViolation, message)
}
