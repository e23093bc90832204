//! Extraction prompt loading and rendering.

use std::path::Path;

use crate::error::ExtractionError;

/// Marker in a prompt template that is replaced with the receipt text.
pub const PDF_TEXT_PLACEHOLDER: &str = "[PDF TEXT WILL BE INSERTED HERE]";

const BUILTIN_TEMPLATE: &str = r#"You are reading the text of a cab booking receipt.
Return a single JSON object with exactly these keys:

- "date": the trip date as YYYY-MM-DD
- "inward_from": pickup location of the trip towards the office, or ""
- "inward_to": drop location of the trip towards the office, or ""
- "outward_from": pickup location of the trip away from the office, or ""
- "outward_to": drop location of the trip away from the office, or ""
- "visits": number of trips on this receipt, as an integer
- "vendor": name of the cab operator
- "inward_charges": fare of the inward trip as a plain number string, or ""
- "outward_charges": fare of the outward trip as a plain number string, or ""

Use "" for anything the receipt does not state. Do not add other keys.

Receipt text:
[PDF TEXT WILL BE INSERTED HERE]
"#;

/// A prompt template with a [`PDF_TEXT_PLACEHOLDER`] slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    template: String,
}

impl Prompt {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The prompt shipped with the binary, used when no prompt file exists.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    /// Reads a UTF-8 template from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Prompt`] if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, ExtractionError> {
        let template = std::fs::read_to_string(path).map_err(|e| ExtractionError::Prompt {
            path: path.display().to_string(),
            source: e,
        })?;
        if !template.contains(PDF_TEXT_PLACEHOLDER) {
            tracing::warn!(
                path = %path.display(),
                placeholder = PDF_TEXT_PLACEHOLDER,
                "prompt file has no placeholder; receipt text will be appended"
            );
        }
        Ok(Self::new(template))
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitutes the trimmed receipt `text` into the template.
    ///
    /// Every placeholder occurrence is replaced. Without a placeholder the
    /// text is appended after a blank line.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let text = text.trim();
        if self.template.contains(PDF_TEXT_PLACEHOLDER) {
            self.template.replace(PDF_TEXT_PLACEHOLDER, text)
        } else {
            format!("{}\n\n{text}", self.template.trim_end())
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::builtin()
    }
}
