//! Extraction of raw trip records from cab-booking PDF receipts.
//!
//! Each PDF goes through three steps: text extraction ([`pdf`]), prompt
//! assembly ([`prompt`]) and a Gemini `generateContent` call ([`client`])
//! whose JSON answer is parsed into a [`caba_core::RawRecord`]
//! ([`response`]). [`PdfTripExtractor`] chains them behind the
//! [`TripExtractor`] trait.

pub mod client;
pub mod error;
pub mod extractor;
pub mod pdf;
pub mod prompt;
pub mod response;
pub mod types;

mod retry;

pub use client::{GeminiClient, GeminiClientConfig};
pub use error::ExtractionError;
pub use extractor::{PdfTripExtractor, TripExtractor};
pub use pdf::extract_pdf_text;
pub use prompt::{Prompt, PDF_TEXT_PLACEHOLDER};
pub use response::parse_trip_json;
