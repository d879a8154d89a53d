//! FILENAME: export/src/html_writer.rs

use std::path::Path;

use report_engine::HtmlDocument;

use crate::ExportError;

/// Writes the document markup verbatim (UTF-8).
pub fn save_html(doc: &HtmlDocument, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, doc.html.as_bytes())?;
    Ok(())
}
