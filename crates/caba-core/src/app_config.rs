use std::path::PathBuf;

use crate::consolidate::{ConsolidateOptions, Emptiness};
use crate::date_order::DateOrdering;

#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub log_level: String,
    pub settings_path: PathBuf,
    pub sheet_name: String,
    pub start_row: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub max_concurrent_files: usize,
    pub date_ordering: DateOrdering,
    pub emptiness: Emptiness,
}

impl AppConfig {
    /// Consolidation settings derived from this config.
    #[must_use]
    pub fn consolidate_options(&self) -> ConsolidateOptions {
        ConsolidateOptions {
            start_row: self.start_row,
            emptiness: self.emptiness,
            ordering: self.date_ordering.clone(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("log_level", &self.log_level)
            .field("settings_path", &self.settings_path)
            .field("sheet_name", &self.sheet_name)
            .field("start_row", &self.start_row)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("max_concurrent_files", &self.max_concurrent_files)
            .field("date_ordering", &self.date_ordering)
            .field("emptiness", &self.emptiness)
            .finish()
    }
}
