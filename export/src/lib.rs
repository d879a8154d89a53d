//! FILENAME: export/src/lib.rs
//! Report Export Module
//!
//! Writes rendered documents to disk: fixed-grid forms as XLSX sheets,
//! flowed documents as HTML.

mod error;
mod html_writer;
mod xlsx_writer;

pub use error::ExportError;
pub use html_writer::save_html;
pub use xlsx_writer::{
    grid_to_workbook, mm_to_column_width, mm_to_inches, mm_to_points, save_xlsx, XlsxGridSurface,
};

use std::path::{Path, PathBuf};

use log::info;
use report_engine::RenderedDocument;

/// Writes `doc` to `path`. A path extension, if present, must match the
/// document kind (`xlsx` for grid documents, `html` for flowed ones).
pub fn save_document(doc: &RenderedDocument, path: &Path) -> Result<(), ExportError> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if !ext.eq_ignore_ascii_case(doc.extension()) {
            return Err(ExportError::UnsupportedDocument(format!(
                "{} renders as .{}, not .{}",
                doc.report_id(),
                doc.extension(),
                ext
            )));
        }
    }

    match doc {
        RenderedDocument::Grid(grid) => save_xlsx(grid, path)?,
        RenderedDocument::Html(html) => save_html(html, path)?,
    }

    info!(
        target: "EXPORT",
        "saved {} ({} rows) to {}",
        doc.report_id(),
        doc.row_count(),
        path.display()
    );
    Ok(())
}

/// Writes `doc` into `dir` under its suggested file name.
pub fn save_to_dir(doc: &RenderedDocument, dir: &Path) -> Result<PathBuf, ExportError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(doc.suggested_file_name());
    save_document(doc, &path)?;
    Ok(path)
}
