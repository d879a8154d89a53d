//! FILENAME: report-engine/src/descriptor.rs
//! What a report type is: its columns, where its date comes from, how it
//! aggregates and which renderer draws it.

use records::ColumnSpec;
use serde::{Deserialize, Serialize};

/// The field every list-store item carries; always requested.
pub const ID_FIELD: &str = "ID";

/// Group-by aggregation of a consolidated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consolidation {
    /// Label of the projected column rows are grouped by.
    pub group_column: String,

    /// Label of the projected numeric column that is summed per group.
    pub sum_column: String,

    /// Output column labels.
    pub group_label: String,
    pub count_label: String,
    pub sum_label: String,

    pub sum_decimal_places: u8,
}

/// Fixed parts of a fixed-grid form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    /// Code printed in the right header block, e.g. "F-049".
    pub form_code: String,

    /// Centred title lines of the header block.
    pub title_lines: Vec<String>,

    /// Output file name prefix.
    pub file_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RendererKind {
    /// Flowed detail table, one row per record.
    HtmlDetail { title: String },

    /// Flowed consolidated summary with a totals row.
    HtmlSummary { title: String },

    /// Paginated fixed-grid form.
    GridForm(FormTemplate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererDescriptor {
    pub identifier: String,
    pub display_name: String,
    pub columns: Vec<ColumnSpec>,

    /// Date fields in priority order.
    pub date_candidates: Vec<String>,

    #[serde(default)]
    pub consolidation: Option<Consolidation>,

    pub renderer: RendererKind,
}

impl RendererDescriptor {
    pub fn is_consolidated(&self) -> bool {
        self.consolidation.is_some()
    }

    /// Fields requested from the record source: `ID`, the date candidates,
    /// then the source field of every column without a fixed value, no repeats.
    pub fn requested_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let names = std::iter::once(ID_FIELD)
            .chain(self.date_candidates.iter().map(|s| s.as_str()))
            .chain(
                self.columns
                    .iter()
                    .filter(|c| c.fixed_value.is_none())
                    .map(|c| c.source_field.as_str()),
            );
        for name in names {
            if !name.is_empty() && !fields.iter().any(|f| f == name) {
                fields.push(name.to_string());
            }
        }
        fields
    }
}
