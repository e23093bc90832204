//! Persisted user settings (`config.json`).
//!
//! The file remembers the last-used paths and, when the user opts in, the
//! Gemini API key. It is loaded once per run into a [`SettingsStore`] and
//! written back explicitly; nothing reads it behind the caller's back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SettingsError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
}

impl Settings {
    /// A copy safe to print: the API key is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            gemini_api_key: self.gemini_api_key.as_ref().map(|_| "[redacted]".to_owned()),
            ..self.clone()
        }
    }

    fn slot(&self, key: SettingsKey) -> Option<&str> {
        match key {
            SettingsKey::PdfDir => self.pdf_dir.as_deref(),
            SettingsKey::TemplateFile => self.template_file.as_deref(),
            SettingsKey::OutputFile => self.output_file.as_deref(),
            SettingsKey::PromptFile => self.prompt_file.as_deref(),
            SettingsKey::GeminiApiKey => self.gemini_api_key.as_deref(),
        }
    }

    fn slot_mut(&mut self, key: SettingsKey) -> &mut Option<String> {
        match key {
            SettingsKey::PdfDir => &mut self.pdf_dir,
            SettingsKey::TemplateFile => &mut self.template_file,
            SettingsKey::OutputFile => &mut self.output_file,
            SettingsKey::PromptFile => &mut self.prompt_file,
            SettingsKey::GeminiApiKey => &mut self.gemini_api_key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    PdfDir,
    TemplateFile,
    OutputFile,
    PromptFile,
    GeminiApiKey,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 5] = [
        SettingsKey::PdfDir,
        SettingsKey::TemplateFile,
        SettingsKey::OutputFile,
        SettingsKey::PromptFile,
        SettingsKey::GeminiApiKey,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SettingsKey::PdfDir => "pdf_dir",
            SettingsKey::TemplateFile => "template_file",
            SettingsKey::OutputFile => "output_file",
            SettingsKey::PromptFile => "prompt_file",
            SettingsKey::GeminiApiKey => "gemini_api_key",
        }
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingsKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_owned()))
    }
}

/// A [`Settings`] value bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads settings from `path`.
    ///
    /// A missing file yields defaults. An unreadable or malformed file also
    /// yields defaults, with a warning, so a corrupt file never blocks a run.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let settings = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "settings file is not valid JSON; using defaults"
                );
                Settings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "settings file could not be read; using defaults"
                );
                Settings::default()
            }
        };

        Self {
            path: path.to_path_buf(),
            settings,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn get(&self, key: SettingsKey) -> Option<&str> {
        self.settings.slot(key)
    }

    /// Sets `key` in memory. Call [`Self::save`] to persist.
    pub fn set(&mut self, key: SettingsKey, value: impl Into<String>) {
        *self.settings.slot_mut(key) = Some(value.into());
    }

    /// Removes `key` in memory, returning the previous value.
    pub fn unset(&mut self, key: SettingsKey) -> Option<String> {
        self.settings.slot_mut(key).take()
    }

    /// Writes the settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, format!("{json}\n")).map_err(|e| SettingsError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}
