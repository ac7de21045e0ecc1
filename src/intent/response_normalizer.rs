use serde_json::{Map, Value, error::Category};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::intent::{
    error::{IntentError, internal_error, parse_error, schema_error},
    types::{IntentKind, IntentResult},
};

const LOGGED_RAW_CHARS: usize = 512;

/// The only place where classifier text becomes a typed value.
#[derive(Default, Clone, Copy)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn normalize(&self, raw: &str, original_text: &str) -> Result<IntentResult, IntentError> {
        self.normalize_at(raw, original_text, OffsetDateTime::now_utc())
    }

    pub fn normalize_at(
        &self,
        raw: &str,
        original_text: &str,
        finalized_at: OffsetDateTime,
    ) -> Result<IntentResult, IntentError> {
        let payload = strip_code_fence(raw);
        let value: Value = serde_json::from_str(payload).map_err(|err| {
            if is_number_out_of_range(&err) {
                return schema_error("model response contains a number outside the f64 range");
            }
            tracing::warn!(
                target: "intent",
                error = %err,
                raw = %truncate(raw, LOGGED_RAW_CHARS),
                "classifier_output_unparseable"
            );
            parse_error("failed to parse intent from model response")
        })?;

        let object = value
            .as_object()
            .ok_or_else(|| schema_error("model response must be a JSON object"))?;

        let intent = parse_intent(object)?;
        let confidence = parse_confidence(object)?;
        let destination = optional_text(object, "destination")?;
        let category = optional_text(object, "category")?;

        if destination.is_some() && !intent.accepts_destination() {
            tracing::debug!(target: "intent", intent = %intent, "dropping_stray_destination");
        }
        if category.is_some() && !intent.accepts_category() {
            tracing::debug!(target: "intent", intent = %intent, "dropping_stray_category");
        }

        let timestamp = finalized_at
            .format(&Rfc3339)
            .map_err(|err| internal_error(format!("failed to format timestamp: {err}")))?;

        Ok(IntentResult {
            intent,
            destination: destination.filter(|_| intent.accepts_destination()),
            category: category.filter(|_| intent.accepts_category()),
            confidence,
            original_text: original_text.to_string(),
            timestamp,
        })
    }
}

fn parse_intent(object: &Map<String, Value>) -> Result<IntentKind, IntentError> {
    match object.get("intent") {
        None | Some(Value::Null) => Err(schema_error("model response is missing intent")),
        Some(Value::String(raw)) => raw
            .parse::<IntentKind>()
            .map_err(|_| schema_error(format!("model response has unknown intent '{}'", raw))),
        Some(_) => Err(schema_error("model response intent must be a string")),
    }
}

fn parse_confidence(object: &Map<String, Value>) -> Result<f64, IntentError> {
    let confidence = match object.get("confidence") {
        None | Some(Value::Null) => {
            return Err(schema_error("model response is missing confidence"));
        }
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| schema_error("model response confidence is not representable"))?,
        Some(_) => return Err(schema_error("model response confidence must be a number")),
    };

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(schema_error(format!(
            "model response confidence {} is outside [0.0, 1.0]",
            confidence
        )));
    }

    Ok(confidence)
}

fn optional_text(object: &Map<String, Value>, field: &str) -> Result<Option<String>, IntentError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(schema_error(format!(
            "model response {} must be a string or null",
            field
        ))),
    }
}

/// Well-formed JSON whose number overflows f64 is a shape problem, not a syntax one.
fn is_number_out_of_range(err: &serde_json::Error) -> bool {
    err.classify() == Category::Syntax && err.to_string().starts_with("number out of range")
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    match body.find('\n') {
        Some(idx) => body[idx + 1..].trim(),
        None => body.trim(),
    }
}

fn truncate(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let mut truncated = raw.chars().take(max_chars).collect::<String>();
    truncated.push('…');
    truncated
}
