//! FILENAME: report-engine/src/render/mod.rs
//! Document renderers, one per `RendererKind`.

pub mod form;
pub mod html;

use chrono::{NaiveDate, NaiveDateTime};

/// Per-run values printed on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub report_date: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub project_code: String,
    pub include_approval: bool,
    pub organization: String,
    /// Records kept for the report date.
    pub row_count: usize,
}

impl RenderContext {
    /// Report date as printed: `dd/mm/yyyy`.
    pub fn date_label(&self) -> String {
        self.report_date.format("%d/%m/%Y").to_string()
    }

    /// Generation time as printed: `dd/mm/yyyy HH:MM`.
    pub fn generated_label(&self) -> String {
        self.generated_at.format("%d/%m/%Y %H:%M").to_string()
    }
}
