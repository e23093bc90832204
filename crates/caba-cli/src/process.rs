//! `caba process`: receipts in, filled workbook out.
//!
//! Per-file extraction failures and per-record date rejections are logged,
//! recorded in the [`RunReport`] and skipped. Only run-level conditions
//! (no receipts, no valid records, sink failures) stop the run.

use std::io::Write;
use std::path::{Path, PathBuf};

use caba_core::{normalize, ConsolidateOptions, ConsolidatedRow, Consolidator, SettingsStore};
use caba_extract::{ExtractionError, GeminiClient, GeminiClientConfig, PdfTripExtractor, TripExtractor};
use caba_sheet::{RowSink, SinkError, TemplateSink};
use futures::stream::{self, StreamExt};

use crate::discover::discover_pdfs;
use crate::inputs::{load_prompt, remember_inputs, resolve_inputs, ProcessArgs};

/// Run-level failures. Each one ends the run with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RunError {
    #[error("no Gemini API key: pass --gemini-api-key, set GEMINI_API_KEY, or `caba config set gemini_api_key <KEY>`")]
    MissingApiKey,

    #[error("prompt file not found: {path}")]
    PromptNotFound { path: String },

    #[error(transparent)]
    Prompt(ExtractionError),

    #[error("failed to build Gemini client: {0}")]
    Client(ExtractionError),

    #[error("cannot list PDF directory {dir}: {source}")]
    PdfDir {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no PDF files found in {dir}")]
    NoPdfFiles { dir: String },

    #[error("no valid trip data extracted from {files} PDF file(s); nothing written")]
    EmptyResult { files: usize },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A receipt that produced no record.
#[derive(Debug)]
pub(crate) struct SkippedFile {
    pub file: PathBuf,
    pub reason: String,
}

/// Outcome of a run that got as far as consolidation.
#[derive(Debug, Default)]
pub(crate) struct RunReport {
    pub files_total: usize,
    pub records_accepted: usize,
    pub skipped_files: Vec<SkippedFile>,
    pub rejected_records: Vec<SkippedFile>,
    pub rows: Vec<ConsolidatedRow>,
}

impl RunReport {
    pub(crate) fn files_processed(&self) -> usize {
        self.files_total - self.skipped_files.len()
    }
}

/// Extracts every file and consolidates the accepted records.
///
/// Up to `max_in_flight` extractions run concurrently, but results are
/// consumed in `files` order so merge precedence matches a sequential run.
pub(crate) async fn extract_and_consolidate<E>(
    extractor: &E,
    files: &[PathBuf],
    max_in_flight: usize,
    options: ConsolidateOptions,
) -> RunReport
where
    E: TripExtractor,
{
    let total = files.len();
    let mut report = RunReport {
        files_total: total,
        ..RunReport::default()
    };
    let mut consolidator = Consolidator::new(options);

    let mut results = stream::iter(files)
        .map(|path| async move { (path, extractor.extract(path).await) })
        .buffered(max_in_flight.max(1));

    let mut current = 0usize;
    while let Some((path, result)) = results.next().await {
        current += 1;
        let file = display_name(path);
        tracing::info!(
            current,
            total,
            file = %file,
            percent = current * 100 / total,
            "processed receipt"
        );

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "skipping receipt");
                report.skipped_files.push(SkippedFile {
                    file: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match normalize(raw) {
            Ok(record) => {
                report.records_accepted += 1;
                consolidator.push(record);
            }
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "discarding record");
                report.rejected_records.push(SkippedFile {
                    file: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report.rows = consolidator.finish();
    report
}

/// Consolidates `files` and hands the rows to `sink`.
///
/// # Errors
///
/// Returns [`RunError::EmptyResult`] without touching `sink` when no record
/// survived, or [`RunError::Sink`] when the write fails.
pub(crate) async fn execute<E, S>(
    extractor: &E,
    sink: &mut S,
    files: &[PathBuf],
    max_in_flight: usize,
    options: ConsolidateOptions,
) -> Result<RunReport, RunError>
where
    E: TripExtractor,
    S: RowSink,
{
    let report = extract_and_consolidate(extractor, files, max_in_flight, options).await;
    if report.rows.is_empty() {
        return Err(RunError::EmptyResult { files: files.len() });
    }
    sink.write_rows(&report.rows)?;
    Ok(report)
}

/// Prints rows as pretty JSON instead of writing a workbook.
#[derive(Debug, Default)]
pub(crate) struct JsonStdoutSink;

impl RowSink for JsonStdoutSink {
    fn write_rows(&mut self, rows: &[ConsolidatedRow]) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(rows).map_err(|e| SinkError::Save {
            path: "stdout".to_owned(),
            reason: e.to_string(),
        })?;
        println!("{json}");
        Ok(())
    }
}

/// Entry point for `caba process`.
///
/// # Errors
///
/// Returns any [`RunError`]; per-file problems are reported, not returned.
pub(crate) async fn run_process(
    config: &caba_core::AppConfig,
    args: ProcessArgs,
) -> anyhow::Result<()> {
    let mut store = SettingsStore::load(&config.settings_path);
    let inputs = resolve_inputs(&args, config, &store)?;

    let mut template_sink = if args.dry_run {
        None
    } else {
        Some(TemplateSink::open(
            &inputs.template,
            &config.sheet_name,
            &inputs.output,
        )?)
    };

    let prompt = load_prompt(&inputs.prompt_file, inputs.prompt_origin)?;

    let files = discover_pdfs(&inputs.pdf_dir).map_err(|e| RunError::PdfDir {
        dir: inputs.pdf_dir.display().to_string(),
        source: e,
    })?;
    if files.is_empty() {
        return Err(RunError::NoPdfFiles {
            dir: inputs.pdf_dir.display().to_string(),
        }
        .into());
    }
    tracing::info!(count = files.len(), dir = %inputs.pdf_dir.display(), "found PDF receipts");

    if !args.no_save {
        remember_inputs(&mut store, &inputs, args.save_api_key);
    }

    let client = GeminiClient::new(&GeminiClientConfig::from_app_config(
        config,
        inputs.api_key.clone(),
    ))
    .map_err(RunError::Client)?;
    let extractor = PdfTripExtractor::new(client, prompt);
    let options = config.consolidate_options();

    let report = match template_sink.as_mut() {
        Some(sink) => {
            execute(&extractor, sink, &files, config.max_concurrent_files, options).await?
        }
        None => {
            execute(
                &extractor,
                &mut JsonStdoutSink,
                &files,
                config.max_concurrent_files,
                options,
            )
            .await?
        }
    };

    // A dry run owns stdout for the JSON rows.
    let output = template_sink.as_ref().map(TemplateSink::output);
    if args.dry_run {
        write_summary(&mut std::io::stderr().lock(), &report, output)?;
    } else {
        write_summary(&mut std::io::stdout().lock(), &report, output)?;
    }
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    report: &RunReport,
    output: Option<&Path>,
) -> std::io::Result<()> {
    writeln!(
        out,
        "processed {} of {} PDF file(s): {} skipped, {} record(s) without a date, {} distinct date(s)",
        report.files_processed(),
        report.files_total,
        report.skipped_files.len(),
        report.rejected_records.len(),
        report.rows.len()
    )?;
    for skipped in report.skipped_files.iter().chain(&report.rejected_records) {
        writeln!(out, "  skipped {}: {}", display_name(&skipped.file), skipped.reason)?;
    }
    if let Some(path) = output {
        writeln!(out, "output saved to {} (please verify the rows)", path.display())?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "process_test.rs"]
mod tests;
