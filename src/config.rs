use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::types::{AdmissionPolicy, ClassifierConfig};

pub const SCHEMA_FILE_NAME: &str = "pathpilot.schema.json";

const DEFAULT_RPC_MAX_IN_FLIGHT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_enabled_true() -> bool {
    true
}

fn default_http_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_rpc_listen() -> SocketAddr {
    SocketAddr::from(([0u16; 8], 50051))
}

fn default_rpc_admission() -> AdmissionPolicy {
    AdmissionPolicy::bounded(DEFAULT_RPC_MAX_IN_FLIGHT)
}

fn default_logging_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_enabled_true")]
    pub enabled: bool,
    #[serde(default = "default_http_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub admission: AdmissionPolicy,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: default_http_listen(),
            admission: AdmissionPolicy::unlimited(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_enabled_true")]
    pub enabled: bool,
    #[serde(default = "default_rpc_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_rpc_admission")]
    pub admission: AdmissionPolicy,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: default_rpc_listen(),
            admission: default_rpc_admission(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    #[default]
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LoggingFormat,
    /// Directory for the rolling JSON log file. Stderr only when absent.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub rotation: LoggingRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_logging_filter(),
            format: LoggingFormat::default(),
            dir: None,
            rotation: LoggingRotation::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if let Some(dir) = config.logging.dir.as_mut() {
            if !dir.is_absolute() {
                *dir = config_base.join(&*dir);
            }
        }

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if !self.http.enabled && !self.rpc.enabled {
            bail!("at least one of http.enabled or rpc.enabled must be true");
        }
        if self.classifier.model.trim().is_empty() {
            bail!("classifier.model cannot be empty");
        }
        if self.classifier.request_timeout_ms == 0 {
            bail!("classifier.request_timeout_ms must be greater than zero");
        }
        for (name, policy) in [("http", &self.http.admission), ("rpc", &self.rpc.admission)] {
            if policy.max_in_flight == Some(0) {
                bail!("{name}.admission.max_in_flight must be greater than zero");
            }
        }
        Ok(())
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join(SCHEMA_FILE_NAME);
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or {} next to it",
        SCHEMA_FILE_NAME
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
