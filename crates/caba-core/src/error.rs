use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unknown settings key \"{0}\" (expected one of: pdf_dir, template_file, output_file, prompt_file, gemini_api_key)")]
    UnknownKey(String),
}

/// Per-record normalization failures. The caller skips the record and keeps going.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("record has no date")]
    MissingDate,
}
