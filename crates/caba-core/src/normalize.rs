//! Normalization from raw LLM JSON objects to [`TripRecord`]s.
//!
//! Missing keys are filled with defaults; the only hard requirement is a
//! non-empty `date`. All other fields are treated as opaque text.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::types::{RawRecord, Scalar, TripRecord};

/// Normalizes a raw record into a [`TripRecord`].
///
/// # Errors
///
/// Returns [`NormalizeError::MissingDate`] if `date` is absent, null, or
/// empty after trimming surrounding whitespace.
pub fn normalize(mut raw: RawRecord) -> Result<TripRecord, NormalizeError> {
    let date = text_field(&mut raw, "date").trim().to_owned();
    if date.is_empty() {
        return Err(NormalizeError::MissingDate);
    }

    Ok(TripRecord {
        date,
        inward_from: text_field(&mut raw, "inward_from"),
        inward_to: text_field(&mut raw, "inward_to"),
        outward_from: text_field(&mut raw, "outward_from"),
        outward_to: text_field(&mut raw, "outward_to"),
        vendor: text_field(&mut raw, "vendor"),
        visits: scalar_field(&mut raw, "visits"),
        inward_charges: scalar_field(&mut raw, "inward_charges").unwrap_or_else(Scalar::empty),
        outward_charges: scalar_field(&mut raw, "outward_charges").unwrap_or_else(Scalar::empty),
    })
}

/// Takes `key` out of `raw` as text. Absent and null become `""`.
fn text_field(raw: &mut RawRecord, key: &str) -> String {
    match raw.remove(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        // Nested structures are not expected; keep their JSON text rather than drop data.
        Some(other) => other.to_string(),
    }
}

/// Takes `key` out of `raw` keeping numbers numeric. Absent and null become `None`.
fn scalar_field(raw: &mut RawRecord, key: &str) -> Option<Scalar> {
    match raw.remove(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(Scalar::Text(s)),
        Some(Value::Number(n)) => Some(Scalar::Number(n)),
        Some(Value::Bool(b)) => Some(Scalar::Text(b.to_string())),
        Some(other) => Some(Scalar::Text(other.to_string())),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
