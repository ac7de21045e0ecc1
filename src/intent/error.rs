use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentErrorKind {
    Validation,
    Overloaded,
    Gateway,
    Parse,
    Schema,
    Internal,
}

impl IntentErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Overloaded => "overloaded",
            Self::Gateway => "gateway",
            Self::Parse => "parse",
            Self::Schema => "schema",
            Self::Internal => "internal",
        }
    }

    /// True when the caller's input was at fault rather than the service.
    pub fn is_client_fault(self) -> bool {
        matches!(self, Self::Validation)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct IntentError {
    pub kind: IntentErrorKind,
    pub message: String,
}

impl IntentError {
    pub fn new(kind: IntentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ClassifierError> for IntentError {
    fn from(err: ClassifierError) -> Self {
        gateway_error(err.to_string())
    }
}

pub fn validation_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Validation, message)
}

pub fn overloaded(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Overloaded, message)
}

pub fn gateway_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Gateway, message)
}

pub fn parse_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Parse, message)
}

pub fn schema_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Schema, message)
}

pub fn internal_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Internal, message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierErrorKind {
    InvalidConfig,
    Authentication,
    Authorization,
    RateLimited,
    Timeout,
    BackendRejected,
    BackendTransient,
    ProtocolViolation,
}

/// Failure reported by a `TextClassifier` backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierError {
    pub kind: ClassifierErrorKind,
    pub message: String,
    pub provider_http_status: Option<u16>,
}

impl ClassifierError {
    pub fn new(kind: ClassifierErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_http_status: None,
        }
    }

    pub fn with_provider_http_status(mut self, status: u16) -> Self {
        self.provider_http_status = Some(status);
        self
    }
}

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.provider_http_status {
            Some(status) => write!(f, "{} (provider_http_status={})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ClassifierError {}
