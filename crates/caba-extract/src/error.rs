use thiserror::Error;

/// Per-file extraction failures. The caller logs them and moves to the next file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {reason}")]
    Pdf { path: String, reason: String },

    #[error("no text could be extracted from {path}")]
    NoText { path: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by Gemini API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("Gemini API rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("unexpected HTTP status {status} from Gemini API: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Gemini response contained no candidate text")]
    EmptyResponse,

    #[error("malformed trip JSON: {reason}")]
    MalformedResponse { reason: String },

    #[error("failed to read prompt file {path}: {source}")]
    Prompt {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid Gemini base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
