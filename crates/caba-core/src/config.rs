use crate::app_config::AppConfig;
use crate::consolidate::Emptiness;
use crate::date_order::DateOrdering;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the API key may also come from the settings
/// file or the command line, so its absence is only an error at run time.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let gemini_api_key = lookup("GEMINI_API_KEY")
        .or_else(|_| lookup("GOOGLE_API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty());

    let gemini_model = or_default("CABA_GEMINI_MODEL", "gemini-2.5-flash");
    let gemini_base_url = or_default(
        "CABA_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let log_level = or_default("CABA_LOG_LEVEL", "info");
    let settings_path = PathBuf::from(or_default("CABA_SETTINGS_PATH", "config.json"));
    let sheet_name = or_default("CABA_SHEET_NAME", "Cab-Usage");

    let start_row = parse_u32("CABA_START_ROW", "9")?;
    if start_row == 0 {
        return Err(invalid("CABA_START_ROW", "must be at least 1".to_string()));
    }

    let request_timeout_secs = parse_u64("CABA_REQUEST_TIMEOUT_SECS", "120")?;
    let max_retries = parse_u32("CABA_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("CABA_RETRY_BACKOFF_BASE_SECS", "2")?;

    let max_concurrent_files = parse_usize("CABA_MAX_CONCURRENT_FILES", "1")?;
    if max_concurrent_files == 0 {
        return Err(invalid(
            "CABA_MAX_CONCURRENT_FILES",
            "must be at least 1".to_string(),
        ));
    }

    let date_ordering = DateOrdering::from_formats(&or_default("CABA_DATE_FORMATS", ""));

    let emptiness_raw = or_default("CABA_EMPTY_POLICY", "falsy");
    let emptiness = Emptiness::parse(&emptiness_raw).ok_or_else(|| {
        invalid(
            "CABA_EMPTY_POLICY",
            format!("expected \"falsy\" or \"strict\", got \"{emptiness_raw}\""),
        )
    })?;

    Ok(AppConfig {
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        log_level,
        settings_path,
        sheet_name,
        start_row,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        max_concurrent_files,
        date_ordering,
        emptiness,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
