//! Round trips through real `.xlsx` files in a temp directory.

use std::path::{Path, PathBuf};

use caba_core::{consolidate, ConsolidateOptions, ConsolidatedRow, TripRecord, Visits};
use caba_sheet::{RowSink, SinkError, TemplateSink, DEFAULT_SHEET_NAME};

fn write_template(dir: &Path, sheet: &str) -> PathBuf {
    let mut book = umya_spreadsheet::new_file();
    let ws = book.new_sheet(sheet).expect("new sheet");
    ws.get_cell_mut((1, 8)).set_value_string("S.No");
    ws.get_cell_mut((2, 8)).set_value_string("Date");
    let path = dir.join("base.xlsx");
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write template");
    path
}

fn cell(path: &Path, col: u32, row: u32) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read output");
    let sheet = book
        .get_sheet_by_name(DEFAULT_SHEET_NAME)
        .expect("output keeps the sheet");
    sheet
        .get_cell((col, row))
        .map(|c| c.get_value().to_string())
        .unwrap_or_default()
}

fn sample_rows() -> Vec<ConsolidatedRow> {
    let mut late = TripRecord::with_date("2024-01-05");
    late.inward_from = "Home".to_owned();
    late.inward_charges = "250".into();
    let mut late_again = TripRecord::with_date("2024-01-05");
    late_again.outward_to = "Office".to_owned();
    let mut early = TripRecord::with_date("2024-01-01");
    early.vendor = "CabCo".to_owned();
    early.visits = Some(2_i64.into());

    consolidate(vec![late, late_again, early], ConsolidateOptions::default())
}

#[test]
fn writes_rows_at_fixed_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), DEFAULT_SHEET_NAME);
    let output = dir.path().join("output.xlsx");

    let mut sink = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &output).unwrap();
    sink.write_rows(&sample_rows()).unwrap();

    // Header row from the template is untouched.
    assert_eq!(cell(&output, 1, 8), "S.No");

    // Row 9: 2024-01-01
    assert_eq!(cell(&output, 1, 9), "1");
    assert_eq!(cell(&output, 2, 9), "2024-01-01");
    assert_eq!(cell(&output, 7, 9), "2");
    assert_eq!(cell(&output, 8, 9), "CabCo");
    assert_eq!(cell(&output, 3, 9), "");

    // Row 10: 2024-01-05, merged from two fragments
    assert_eq!(cell(&output, 1, 10), "2");
    assert_eq!(cell(&output, 2, 10), "2024-01-05");
    assert_eq!(cell(&output, 3, 10), "Home");
    assert_eq!(cell(&output, 6, 10), "Office");
    assert_eq!(cell(&output, 7, 10), "1");
    assert_eq!(cell(&output, 9, 10), "250");

    assert_eq!(cell(&output, 2, 11), "");
}

#[test]
fn rows_follow_configured_start_row() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), DEFAULT_SHEET_NAME);
    let output = dir.path().join("output.xlsx");
    let rows = consolidate(
        vec![TripRecord::with_date("2024-01-01")],
        ConsolidateOptions {
            start_row: 12,
            ..ConsolidateOptions::default()
        },
    );

    let mut sink = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &output).unwrap();
    sink.write_rows(&rows).unwrap();

    assert_eq!(cell(&output, 2, 9), "");
    assert_eq!(cell(&output, 1, 12), "1");
    assert_eq!(cell(&output, 2, 12), "2024-01-01");
}

#[test]
fn template_file_is_not_modified() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), DEFAULT_SHEET_NAME);
    let before = std::fs::read(&template).unwrap();
    let output = dir.path().join("output.xlsx");

    let mut sink = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &output).unwrap();
    sink.write_rows(&sample_rows()).unwrap();

    assert_eq!(std::fs::read(&template).unwrap(), before);
}

#[test]
fn text_visits_are_written_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), DEFAULT_SHEET_NAME);
    let output = dir.path().join("output.xlsx");

    let mut rows = sample_rows();
    rows[0].visits = Visits::Text("two".to_owned());

    let mut sink = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &output).unwrap();
    sink.write_rows(&rows).unwrap();
    assert_eq!(cell(&output, 7, 9), "two");
}

#[test]
fn missing_template_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = TemplateSink::open(
        &dir.path().join("base.xlsx"),
        DEFAULT_SHEET_NAME,
        &dir.path().join("output.xlsx"),
    )
    .unwrap_err();
    assert!(matches!(err, SinkError::TemplateNotFound { .. }));
}

#[test]
fn unreadable_template_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("base.xlsx");
    std::fs::write(&template, b"not a zip archive").unwrap();
    let err = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &dir.path().join("out.xlsx"))
        .unwrap_err();
    assert!(matches!(err, SinkError::TemplateRead { .. }));
}

#[test]
fn missing_sheet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), "Other");
    let err = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &dir.path().join("out.xlsx"))
        .unwrap_err();
    assert!(
        matches!(err, SinkError::SheetNotFound { ref sheet, .. } if sheet == DEFAULT_SHEET_NAME)
    );
}

#[test]
fn failed_save_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), DEFAULT_SHEET_NAME);
    let output = dir.path().join("missing-dir").join("output.xlsx");

    let mut sink = TemplateSink::open(&template, DEFAULT_SHEET_NAME, &output).unwrap();
    let err = sink.write_rows(&sample_rows()).unwrap_err();

    assert!(matches!(err, SinkError::Save { .. }));
    assert!(!output.exists());
}
