//! `caba config`: read and edit the persisted settings file.

use caba_core::{SettingsKey, SettingsStore};
use clap::Subcommand;

/// Sub-commands available under `config`.
#[derive(Debug, Subcommand)]
pub(crate) enum ConfigCommands {
    /// Print all saved settings (the API key is masked)
    Show,
    /// Print one saved setting
    Get {
        /// pdf_dir, template_file, output_file, prompt_file or gemini_api_key
        key: String,
    },
    /// Save a setting
    Set { key: String, value: String },
    /// Remove a saved setting
    Unset { key: String },
}

/// Runs a `config` sub-command against the settings file named in `config`.
///
/// # Errors
///
/// Returns an error for unknown keys or if the settings file cannot be written.
pub(crate) fn run_config(
    config: &caba_core::AppConfig,
    command: ConfigCommands,
) -> anyhow::Result<()> {
    let mut store = SettingsStore::load(&config.settings_path);
    for line in apply(&mut store, command)? {
        println!("{line}");
    }
    Ok(())
}

/// Applies `command` to `store`, saving on mutation, and returns the lines to print.
fn apply(store: &mut SettingsStore, command: ConfigCommands) -> anyhow::Result<Vec<String>> {
    match command {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&store.settings().redacted())?;
            Ok(vec![
                format!("# {}", store.path().display()),
                json,
            ])
        }
        ConfigCommands::Get { key } => {
            let key: SettingsKey = key.parse()?;
            let value = match (key, store.get(key)) {
                (_, None) => String::new(),
                (SettingsKey::GeminiApiKey, Some(_)) => "[redacted]".to_owned(),
                (_, Some(v)) => v.to_owned(),
            };
            Ok(vec![value])
        }
        ConfigCommands::Set { key, value } => {
            let key: SettingsKey = key.parse()?;
            store.set(key, value);
            store.save()?;
            Ok(vec![format!("saved {key}")])
        }
        ConfigCommands::Unset { key } => {
            let key: SettingsKey = key.parse()?;
            let previous = store.unset(key);
            store.save()?;
            Ok(vec![if previous.is_some() {
                format!("removed {key}")
            } else {
                format!("{key} was not set")
            }])
        }
    }
}
