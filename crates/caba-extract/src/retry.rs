//! Retry with exponential back-off and jitter for Gemini API calls.
//!
//! Only transient conditions are retried: HTTP 429, 5xx responses and
//! network-level failures. Everything else (bad key, malformed output,
//! unreadable PDF) is returned immediately since retrying cannot fix it.

use std::future::Future;
use std::time::Duration;

use crate::error::ExtractionError;

/// Returns `true` for errors worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &ExtractionError) -> bool {
    match err {
        ExtractionError::RateLimited { .. } => true,
        ExtractionError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ExtractionError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ExtractionError::Io { .. }
        | ExtractionError::Pdf { .. }
        | ExtractionError::NoText { .. }
        | ExtractionError::Unauthorized { .. }
        | ExtractionError::EmptyResponse
        | ExtractionError::MalformedResponse { .. }
        | ExtractionError::Prompt { .. }
        | ExtractionError::InvalidBaseUrl { .. } => false,
    }
}

/// Longest computed back-off between attempts.
const MAX_BACKOFF_MS: u64 = 60_000;

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds with
/// ±25 % jitter, capped at 60 s before jitter. A `RateLimited` error's `Retry-After` hint
/// is a floor on that wait.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ExtractionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExtractionError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let retry_after_secs = match &err {
                    ExtractionError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
                    _ => None,
                };
                let jitter = rand::random::<f64>() * 0.5 + 0.75;
                let wait_ms = delay_ms(attempt, backoff_base_secs, retry_after_secs, jitter);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = wait_ms,
                    error = %err,
                    "transient Gemini error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
        }
    }
}

/// Wait before retry `attempt` (1-based).
///
/// `jitter` scales the computed back-off only; the server's `Retry-After`
/// is honoured in full.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn delay_ms(
    attempt: u32,
    backoff_base_secs: u64,
    retry_after_secs: Option<u64>,
    jitter: f64,
) -> u64 {
    let computed = backoff_base_secs
        .saturating_mul(1000)
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_BACKOFF_MS);
    let jittered = (computed as f64 * jitter) as u64;
    let hinted = retry_after_secs.map_or(0, |s| s.saturating_mul(1000));
    jittered.max(hinted)
}
