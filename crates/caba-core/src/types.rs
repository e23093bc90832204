//! Trip record shapes as they move from extraction to the spreadsheet.
//!
//! ## Observed shape of LLM responses
//!
//! The extraction prompt asks for a flat JSON object with the keys `date`,
//! `inward_from`, `inward_to`, `outward_from`, `outward_to`, `visits`,
//! `vendor`, `inward_charges` and `outward_charges`. In practice:
//!
//! - Any key may be missing, or present as `null`.
//! - Charges arrive either as strings (`"250.00"`, `"₹250"`) or as bare JSON
//!   numbers (`250`, `250.5`).
//! - `visits` is usually a number but some receipts yield a string (`"2"`).
//!
//! [`Scalar`] keeps the number/text distinction alive until consolidation
//! decides what counts as empty.

use std::fmt;

use serde::{Serialize, Serializer};

/// A raw extraction result: one flat JSON object from the LLM.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A field value that may be textual or numeric in the source data.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// An empty text value.
    #[must_use]
    pub fn empty() -> Self {
        Scalar::Text(String::new())
    }

    /// Returns `true` for a number equal to zero (`0`, `0.0`, `-0.0`).
    #[must_use]
    pub fn is_zero_number(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64().is_some_and(|v| v == 0.0),
            Scalar::Text(_) => false,
        }
    }

    /// Returns `true` for the empty string.
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }

    /// Text form, with numbers rendered as JSON renders them (`250`, `250.5`).
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

/// One extracted, normalized trip fragment keyed by `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// Opaque date string as produced by extraction. Never empty.
    pub date: String,
    pub inward_from: String,
    pub inward_to: String,
    pub outward_from: String,
    pub outward_to: String,
    pub vendor: String,
    /// `None` when the response carried no `visits` value at all.
    pub visits: Option<Scalar>,
    pub inward_charges: Scalar,
    pub outward_charges: Scalar,
}

impl TripRecord {
    /// A record for `date` with every other field empty.
    #[must_use]
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            inward_from: String::new(),
            inward_to: String::new(),
            outward_from: String::new(),
            outward_to: String::new(),
            vendor: String::new(),
            visits: None,
            inward_charges: Scalar::empty(),
            outward_charges: Scalar::empty(),
        }
    }
}

/// The `visits` cell of an output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visits {
    Count(i64),
    Text(String),
}

impl Default for Visits {
    fn default() -> Self {
        Visits::Count(1)
    }
}

impl Visits {
    /// Renders a merged `visits` value for output.
    ///
    /// Absent values and blank strings fall back to `Count(1)`. Integral
    /// numbers, including whole floats such as `2.0`, become counts;
    /// fractional numbers and other strings are kept as text.
    #[must_use]
    pub fn from_scalar(value: Option<&Scalar>) -> Self {
        match value {
            None => Visits::default(),
            Some(Scalar::Text(s)) if s.trim().is_empty() => Visits::default(),
            Some(Scalar::Number(n)) => whole_number(n)
                .map_or_else(|| Visits::Text(n.to_string()), Visits::Count),
            Some(Scalar::Text(s)) => Visits::Text(s.clone()),
        }
    }
}

/// `n` as an `i64` when it has no fractional part and fits.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn whole_number(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
}

impl fmt::Display for Visits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visits::Count(n) => write!(f, "{n}"),
            Visits::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Visits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visits::Count(n) => serializer.serialize_i64(*n),
            Visits::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One finalized output row after merging all fragments that share a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedRow {
    /// 1-based position within the output block. Contiguous, no gaps.
    pub row_index: u32,
    /// Spreadsheet row: `start_row + row_index - 1`.
    pub sheet_row: u32,
    pub date: String,
    pub inward_from: String,
    pub inward_to: String,
    pub outward_from: String,
    pub outward_to: String,
    pub visits: Visits,
    pub vendor: String,
    pub inward_charges: String,
    pub outward_charges: String,
}
