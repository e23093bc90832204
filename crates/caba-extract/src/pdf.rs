//! Plain-text extraction from PDF receipts.

use std::path::Path;

use crate::error::ExtractionError;

/// Extracts all text from the PDF at `path`.
///
/// Parsing runs on a blocking thread. `pdf-extract` can panic on malformed
/// input, so the call is wrapped in `catch_unwind` and a panic is reported
/// as [`ExtractionError::Pdf`].
///
/// # Errors
///
/// - [`ExtractionError::Io`] if the file cannot be opened.
/// - [`ExtractionError::Pdf`] if the PDF cannot be parsed.
/// - [`ExtractionError::NoText`] if the document has no extractable text
///   (typically a scan without a text layer).
pub async fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let shown = path.display().to_string();

    tokio::fs::metadata(path)
        .await
        .map_err(|e| ExtractionError::Io {
            path: shown.clone(),
            source: e,
        })?;

    let owned = path.to_path_buf();
    let joined = tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text(&owned)
        }))
    })
    .await;

    let text = match joined {
        Ok(Ok(Ok(text))) => text,
        Ok(Ok(Err(e))) => {
            return Err(ExtractionError::Pdf {
                path: shown,
                reason: e.to_string(),
            })
        }
        Ok(Err(_)) => {
            return Err(ExtractionError::Pdf {
                path: shown,
                reason: "parser panicked on malformed PDF".to_owned(),
            })
        }
        Err(e) => {
            return Err(ExtractionError::Pdf {
                path: shown,
                reason: format!("extraction task failed: {e}"),
            })
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText { path: shown });
    }

    tracing::debug!(path = %shown, chars = text.len(), "extracted PDF text");
    Ok(text)
}
