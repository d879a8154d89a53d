//! FILENAME: report-engine/src/document.rs
//! Rendered documents handed to delivery and export.

use chrono::NaiveDate;
use layout_engine::{FlowedTable, LayoutItem, PageGeometry};
use records::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A paginated fixed-grid document: the full drawing stream of every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    pub report_id: String,
    pub report_date: NaiveDate,
    pub row_count: usize,
    pub file_prefix: String,
    pub geometry: PageGeometry,
    pub columns: Vec<ColumnSpec>,
    pub items: Vec<LayoutItem>,
    pub pages: usize,
}

/// A flowed hypertext document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlDocument {
    pub report_id: String,
    pub report_date: NaiveDate,
    pub row_count: usize,
    pub table: FlowedTable,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderedDocument {
    Grid(GridDocument),
    Html(HtmlDocument),
}

impl RenderedDocument {
    pub fn report_id(&self) -> &str {
        match self {
            RenderedDocument::Grid(doc) => &doc.report_id,
            RenderedDocument::Html(doc) => &doc.report_id,
        }
    }

    pub fn report_date(&self) -> NaiveDate {
        match self {
            RenderedDocument::Grid(doc) => doc.report_date,
            RenderedDocument::Html(doc) => doc.report_date,
        }
    }

    /// Records that survived date filtering.
    pub fn row_count(&self) -> usize {
        match self {
            RenderedDocument::Grid(doc) => doc.row_count,
            RenderedDocument::Html(doc) => doc.row_count,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RenderedDocument::Grid(_) => "xlsx",
            RenderedDocument::Html(_) => "html",
        }
    }

    pub fn suggested_file_name(&self) -> String {
        let stamp = self.report_date().format("%Y%m%d");
        match self {
            RenderedDocument::Grid(doc) => {
                format!("{}_Reporte_{}.{}", doc.file_prefix, stamp, self.extension())
            }
            RenderedDocument::Html(doc) => {
                format!("{}_{}.{}", doc.report_id, stamp, self.extension())
            }
        }
    }

    pub fn as_grid(&self) -> Option<&GridDocument> {
        match self {
            RenderedDocument::Grid(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_html(&self) -> Option<&HtmlDocument> {
        match self {
            RenderedDocument::Html(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Result of one dispatcher run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Rendered(RenderedDocument),
    /// No record matched the report date. Not an error; callers decide how
    /// to tell the user there is no data.
    EmptyResult,
}

impl RunOutcome {
    pub fn document(&self) -> Option<&RenderedDocument> {
        match self {
            RunOutcome::Rendered(doc) => Some(doc),
            RunOutcome::EmptyResult => None,
        }
    }

    pub fn into_document(self) -> Option<RenderedDocument> {
        match self {
            RunOutcome::Rendered(doc) => Some(doc),
            RunOutcome::EmptyResult => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RunOutcome::EmptyResult)
    }
}
