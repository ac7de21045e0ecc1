use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 8_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Navigate,
    Location,
    Nearby,
    Help,
    StopNavigation,
}

impl IntentKind {
    pub const ALL: [IntentKind; 5] = [
        IntentKind::Navigate,
        IntentKind::Location,
        IntentKind::Nearby,
        IntentKind::Help,
        IntentKind::StopNavigation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::Location => "location",
            Self::Nearby => "nearby",
            Self::Help => "help",
            Self::StopNavigation => "stop_navigation",
        }
    }

    pub fn accepts_destination(self) -> bool {
        matches!(self, Self::Navigate)
    }

    pub fn accepts_category(self) -> bool {
        matches!(self, Self::Nearby)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl FromStr for IntentKind {
    type Err = UnknownIntent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownIntent(value.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub transcribed_text: String,
}

impl IntentRequest {
    pub fn new(transcribed_text: impl Into<String>) -> Self {
        Self {
            transcribed_text: transcribed_text.into(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validated classification, stamped with service-owned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub intent: IntentKind,
    pub destination: Option<String>,
    pub category: Option<String>,
    pub confidence: f64,
    pub original_text: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Text,
}

/// Fixed sampling parameters sent with every classifier call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub output_format: OutputFormat,
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            output_format: OutputFormat::Json,
            max_output_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendDialect {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl BackendDialect {
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("https://generativelanguage.googleapis.com/v1beta"),
            Self::OpenAiCompatible => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    InlineToken { token: String },
    None,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub api_key: Option<String>,
}

impl ResolvedCredential {
    pub fn none() -> Self {
        Self { api_key: None }
    }
}

impl fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub dialect: BackendDialect,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub model: String,
    pub credential: CredentialRef,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ClassifierConfig {
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            output_format: OutputFormat::Json,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn resolved_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .or_else(|| self.dialect.default_endpoint().map(str::to_string))
    }
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Concurrency limits for one transport binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Requests allowed to run at once; `None` means unlimited.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
    /// Requests allowed to wait for a slot; `None` means the queue is unbounded.
    #[serde(default)]
    pub max_waiting: Option<usize>,
}

impl AdmissionPolicy {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn bounded(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: Some(max_in_flight),
            max_waiting: None,
        }
    }
}
