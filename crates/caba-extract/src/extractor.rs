//! The per-file extraction pipeline: PDF text, prompt, Gemini, JSON.

use std::future::Future;
use std::path::Path;

use caba_core::RawRecord;

use crate::client::GeminiClient;
use crate::error::ExtractionError;
use crate::pdf::extract_pdf_text;
use crate::prompt::Prompt;
use crate::response::parse_trip_json;

/// Turns one receipt file into one raw trip record.
///
/// Implementations fail per file; callers skip the file and continue.
pub trait TripExtractor {
    fn extract(&self, path: &Path)
        -> impl Future<Output = Result<RawRecord, ExtractionError>> + Send;
}

/// Production extractor backed by `pdf-extract` and Gemini.
#[derive(Debug)]
pub struct PdfTripExtractor {
    client: GeminiClient,
    prompt: Prompt,
}

impl PdfTripExtractor {
    #[must_use]
    pub fn new(client: GeminiClient, prompt: Prompt) -> Self {
        Self { client, prompt }
    }
}

impl TripExtractor for PdfTripExtractor {
    async fn extract(&self, path: &Path) -> Result<RawRecord, ExtractionError> {
        let text = extract_pdf_text(path).await?;
        let prompt = self.prompt.render(&text);
        let answer = self.client.generate_json(&prompt).await?;
        let record = parse_trip_json(&answer)?;
        tracing::debug!(
            path = %path.display(),
            keys = record.len(),
            "parsed trip record from model answer"
        );
        Ok(record)
    }
}
