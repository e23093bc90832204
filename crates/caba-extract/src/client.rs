//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One prompt in, one JSON string out. Status codes are mapped to typed
//! [`ExtractionError`] variants so the retry layer can tell a rate limit
//! from a revoked key.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ExtractionError;
use crate::retry::retry_with_backoff;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Connection and retry settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiClientConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl GeminiClientConfig {
    /// Takes model, endpoint and retry policy from `config`; the key is
    /// resolved by the caller (flag, env or settings file).
    #[must_use]
    pub fn from_app_config(config: &caba_core::AppConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

impl std::fmt::Debug for GeminiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientConfig")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish()
    }
}

/// Client for Gemini `generateContent` with JSON output.
///
/// Transient failures (429, 5xx, network errors) are retried with
/// exponential back-off up to `max_retries` additional attempts.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl GeminiClient {
    /// Builds a client for `config.model` at `config.base_url`.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::InvalidBaseUrl`] if the base URL and model do not
    ///   form a valid URL.
    /// - [`ExtractionError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: &GeminiClientConfig) -> Result<Self, ExtractionError> {
        let endpoint = Self::endpoint_url(&config.base_url, &config.model)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("caba/0.1 (cab-receipt-extraction)")
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            max_retries: config.max_retries,
            backoff_base_secs: config.backoff_base_secs,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `prompt` and returns the text of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ExtractionError::Unauthorized`]: HTTP 401/403 (not retried).
    /// - [`ExtractionError::UnexpectedStatus`]: any other non-2xx (5xx retried).
    /// - [`ExtractionError::Http`]: network failure after all retries.
    /// - [`ExtractionError::MalformedResponse`]: the body is not a Gemini response.
    /// - [`ExtractionError::EmptyResponse`]: no candidate carried any text.
    pub async fn generate_json(&self, prompt: &str) -> Result<String, ExtractionError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.generate_once(prompt)
        })
        .await
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, ExtractionError> {
        let request = GenerateContentRequest::json_prompt(prompt);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(ExtractionError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ExtractionError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ExtractionError::MalformedResponse {
                reason: format!("Gemini response envelope: {e}"),
            })?;

        parsed
            .first_text()
            .map(str::to_owned)
            .ok_or(ExtractionError::EmptyResponse)
    }

    fn endpoint_url(base_url: &str, model: &str) -> Result<Url, ExtractionError> {
        let invalid = |reason: String| ExtractionError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        if model.trim().is_empty() {
            return Err(invalid("model name is empty".to_owned()));
        }

        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model.trim()
        );
        let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

/// Keeps error bodies short enough for a log line.
fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> GeminiClientConfig {
        GeminiClientConfig {
            api_key: "test-key".to_owned(),
            model: "gemini-2.5-flash".to_owned(),
            base_url: base_url.to_owned(),
            timeout_secs: 5,
            max_retries: 0,
            backoff_base_secs: 0,
        }
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiClient::new(&config("https://generativelanguage.googleapis.com/")).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_rejects_garbage_base_url() {
        let err = GeminiClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn endpoint_rejects_non_http_scheme() {
        let err = GeminiClient::new(&config("ftp://example.com")).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidBaseUrl { ref reason, .. } if reason.contains("ftp")));
    }

    #[test]
    fn endpoint_rejects_empty_model() {
        let mut cfg = config("https://example.com");
        cfg.model = "  ".to_owned();
        let err = GeminiClient::new(&cfg).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = config("https://example.com");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("test-key"));
        let client = GeminiClient::new(&cfg).unwrap();
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
