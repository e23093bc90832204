//! Receipt discovery.

use std::path::{Path, PathBuf};

/// Lists the `.pdf` files directly inside `dir`, sorted by file name.
///
/// The extension check is case-insensitive. Subdirectories are not walked;
/// symlinks are followed, so a link to a PDF file counts as a receipt.
/// Sorting fixes the processing order, which decides merge precedence when
/// two receipts share a date.
///
/// # Errors
///
/// Returns the I/O error if `dir` cannot be listed.
pub(crate) fn discover_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
