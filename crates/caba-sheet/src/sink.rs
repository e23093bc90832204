//! Writing consolidated rows into an `.xlsx` template.

use std::path::{Path, PathBuf};

use caba_core::ConsolidatedRow;
use umya_spreadsheet::Spreadsheet;

use crate::error::SinkError;
use crate::layout::{cell_value, CellValue, Column};

/// Destination for a finished, ordered table.
pub trait RowSink {
    /// Persists every row or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the rows cannot be persisted.
    fn write_rows(&mut self, rows: &[ConsolidatedRow]) -> Result<(), SinkError>;
}

/// A loaded template workbook bound to its output path.
///
/// The template is read and the target sheet located in [`TemplateSink::open`],
/// so a bad template fails the run before any receipt is processed.
pub struct TemplateSink {
    workbook: Spreadsheet,
    sheet_name: String,
    output: PathBuf,
}

impl TemplateSink {
    /// Loads `template` and checks that it contains `sheet_name`.
    ///
    /// # Errors
    ///
    /// - [`SinkError::TemplateNotFound`] if `template` is not a file.
    /// - [`SinkError::TemplateRead`] if it is not a readable `.xlsx` workbook.
    /// - [`SinkError::SheetNotFound`] if the workbook has no `sheet_name` sheet.
    pub fn open(template: &Path, sheet_name: &str, output: &Path) -> Result<Self, SinkError> {
        let template_display = template.display().to_string();
        if !template.is_file() {
            return Err(SinkError::TemplateNotFound {
                path: template_display,
            });
        }

        let workbook = umya_spreadsheet::reader::xlsx::read(template).map_err(|e| {
            SinkError::TemplateRead {
                path: template_display.clone(),
                reason: e.to_string(),
            }
        })?;

        if workbook.get_sheet_by_name(sheet_name).is_none() {
            return Err(SinkError::SheetNotFound {
                sheet: sheet_name.to_owned(),
                path: template_display,
            });
        }

        tracing::debug!(
            template = %template_display,
            sheet = sheet_name,
            output = %output.display(),
            "template loaded"
        );

        Ok(Self {
            workbook,
            sheet_name: sheet_name.to_owned(),
            output: output.to_path_buf(),
        })
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    fn fill(&mut self, rows: &[ConsolidatedRow]) -> Result<(), SinkError> {
        let sheet = self
            .workbook
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| SinkError::SheetNotFound {
                sheet: self.sheet_name.clone(),
                path: self.output.display().to_string(),
            })?;

        for row in rows {
            for column in Column::ALL {
                let cell = sheet.get_cell_mut((column.number(), row.sheet_row));
                match cell_value(row, column) {
                    CellValue::Number(n) => {
                        cell.set_value_number(n);
                    }
                    CellValue::Text(s) => {
                        cell.set_value_string(s);
                    }
                }
            }
        }
        Ok(())
    }

    /// Writes the workbook next to the output path, then renames it into place.
    fn save_atomically(&self) -> Result<(), SinkError> {
        let save_err = |reason: String| SinkError::Save {
            path: self.output.display().to_string(),
            reason,
        };

        let dir = match self.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".caba-")
            .suffix(".xlsx")
            .tempfile_in(dir)
            .map_err(|e| save_err(e.to_string()))?;

        umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, staged.as_file_mut())
            .map_err(|e| save_err(e.to_string()))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| save_err(e.to_string()))?;

        staged
            .persist(&self.output)
            .map_err(|e| save_err(e.error.to_string()))?;
        Ok(())
    }
}

impl RowSink for TemplateSink {
    fn write_rows(&mut self, rows: &[ConsolidatedRow]) -> Result<(), SinkError> {
        self.fill(rows)?;
        self.save_atomically()?;
        tracing::info!(
            rows = rows.len(),
            sheet = %self.sheet_name,
            output = %self.output.display(),
            "workbook saved"
        );
        Ok(())
    }
}

impl std::fmt::Debug for TemplateSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSink")
            .field("sheet_name", &self.sheet_name)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
