//! Resolution of run inputs from flags, environment, the settings file and
//! built-in defaults, in that order of precedence.

use std::path::{Path, PathBuf};

use caba_core::{SettingsKey, SettingsStore};
use caba_extract::Prompt;
use clap::Args;

use crate::process::RunError;

pub(crate) const DEFAULT_PDF_DIR: &str = "pdf";
pub(crate) const DEFAULT_TEMPLATE: &str = "base.xlsx";
pub(crate) const DEFAULT_OUTPUT: &str = "output.xlsx";
pub(crate) const DEFAULT_PROMPT: &str = "prompt.txt";

/// Arguments of `caba process`.
#[derive(Debug, Args)]
pub(crate) struct ProcessArgs {
    /// Directory containing the PDF receipts
    #[arg(long, env = "CABA_PDF_DIR")]
    pub pdf_dir: Option<PathBuf>,
    /// Excel template containing the Cab-Usage sheet
    #[arg(long, env = "CABA_TEMPLATE")]
    pub template: Option<PathBuf>,
    /// Where to save the filled workbook
    #[arg(long, env = "CABA_OUTPUT")]
    pub output: Option<PathBuf>,
    /// Extraction prompt with a [PDF TEXT WILL BE INSERTED HERE] placeholder
    #[arg(long, env = "CABA_PROMPT_FILE")]
    pub prompt_file: Option<PathBuf>,
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    /// Remember the API key in the settings file
    #[arg(long)]
    pub save_api_key: bool,
    /// Do not write the resolved paths back to the settings file
    #[arg(long)]
    pub no_save: bool,
    /// Print the consolidated rows as JSON instead of writing the workbook
    #[arg(long)]
    pub dry_run: bool,
}

/// Where the prompt path came from. Only a path given on the command line
/// (or its env var) must exist; a remembered or default path may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptOrigin {
    Explicit,
    Remembered,
}

#[derive(Debug)]
pub(crate) struct ResolvedInputs {
    pub pdf_dir: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub prompt_file: PathBuf,
    pub prompt_origin: PromptOrigin,
    pub api_key: String,
}

/// Picks each input from the first source that has it.
///
/// # Errors
///
/// Returns [`RunError::MissingApiKey`] when no source provides a key.
pub(crate) fn resolve_inputs(
    args: &ProcessArgs,
    config: &caba_core::AppConfig,
    store: &SettingsStore,
) -> Result<ResolvedInputs, RunError> {
    let path_from = |flag: Option<&PathBuf>, key: SettingsKey, default: &str| -> PathBuf {
        flag.cloned()
            .or_else(|| store.get(key).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default))
    };

    let prompt_origin = if args.prompt_file.is_some() {
        PromptOrigin::Explicit
    } else {
        PromptOrigin::Remembered
    };

    let api_key = args
        .gemini_api_key
        .clone()
        .or_else(|| config.gemini_api_key.clone())
        .or_else(|| store.get(SettingsKey::GeminiApiKey).map(str::to_owned))
        .filter(|k| !k.trim().is_empty())
        .ok_or(RunError::MissingApiKey)?;

    Ok(ResolvedInputs {
        pdf_dir: path_from(args.pdf_dir.as_ref(), SettingsKey::PdfDir, DEFAULT_PDF_DIR),
        template: path_from(
            args.template.as_ref(),
            SettingsKey::TemplateFile,
            DEFAULT_TEMPLATE,
        ),
        output: path_from(args.output.as_ref(), SettingsKey::OutputFile, DEFAULT_OUTPUT),
        prompt_file: path_from(
            args.prompt_file.as_ref(),
            SettingsKey::PromptFile,
            DEFAULT_PROMPT,
        ),
        prompt_origin,
        api_key,
    })
}

/// Loads the prompt template for a run.
///
/// A missing remembered or default prompt file falls back to the built-in
/// prompt.
///
/// # Errors
///
/// Returns [`RunError::PromptNotFound`] if an explicitly given prompt file is
/// missing, or [`RunError::Prompt`] if an existing file cannot be read.
pub(crate) fn load_prompt(path: &Path, origin: PromptOrigin) -> Result<Prompt, RunError> {
    if path.is_file() {
        return Prompt::from_file(path).map_err(RunError::Prompt);
    }
    match origin {
        PromptOrigin::Explicit => Err(RunError::PromptNotFound {
            path: path.display().to_string(),
        }),
        PromptOrigin::Remembered => {
            tracing::info!(
                path = %path.display(),
                "prompt file not found; using the built-in prompt"
            );
            Ok(Prompt::builtin())
        }
    }
}

/// Writes the resolved inputs back to the settings file.
///
/// The API key is stored only when `save_api_key` is set. A failed write is
/// logged and otherwise ignored; it never fails the run.
pub(crate) fn remember_inputs(
    store: &mut SettingsStore,
    inputs: &ResolvedInputs,
    save_api_key: bool,
) {
    store.set(SettingsKey::PdfDir, path_text(&inputs.pdf_dir));
    store.set(SettingsKey::TemplateFile, path_text(&inputs.template));
    store.set(SettingsKey::OutputFile, path_text(&inputs.output));
    store.set(SettingsKey::PromptFile, path_text(&inputs.prompt_file));
    if save_api_key {
        store.set(SettingsKey::GeminiApiKey, inputs.api_key.clone());
    }

    if let Err(e) = store.save() {
        tracing::warn!(
            path = %store.path().display(),
            error = %e,
            "could not save settings"
        );
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
