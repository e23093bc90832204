//! Parsing of the model's JSON answer into a raw trip record.

use caba_core::RawRecord;
use regex::Regex;
use serde_json::Value;

use crate::error::ExtractionError;

/// Parses the model output as one flat JSON object.
///
/// `responseMimeType` asks for bare JSON, but models occasionally wrap it in a
/// Markdown code fence anyway; a single surrounding fence is stripped.
///
/// # Errors
///
/// Returns [`ExtractionError::MalformedResponse`] if the text is not JSON or
/// the JSON is not an object.
pub fn parse_trip_json(text: &str) -> Result<RawRecord, ExtractionError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ExtractionError::MalformedResponse {
            reason: "empty response text".to_owned(),
        });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ExtractionError::MalformedResponse {
            reason: e.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(ExtractionError::MalformedResponse {
            reason: "expected a JSON object, got an array".to_owned(),
        }),
        other => Err(ExtractionError::MalformedResponse {
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let re = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").expect("valid fence regex");
    match re.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}
