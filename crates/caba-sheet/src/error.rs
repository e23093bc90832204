use thiserror::Error;

/// Run-level sink failures. Any of these aborts the run before or instead of writing.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("template file not found: {path}")]
    TemplateNotFound { path: String },

    #[error("failed to read template {path}: {reason}")]
    TemplateRead { path: String, reason: String },

    #[error("sheet \"{sheet}\" not found in template {path}")]
    SheetNotFound { sheet: String, path: String },

    #[error("failed to save workbook to {path}: {reason}")]
    Save { path: String, reason: String },
}
