//! FILENAME: records/src/column.rs
//! PURPOSE: The fixed layout contract for one report type's table.
//! CONTEXT: A column names its label, its width on the page (millimetres),
//! how its text is aligned, and where its value comes from in a record.
//! The projector reads `source_field`; the layout engine reads the rest.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// What kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColumnKind {
    #[default]
    Text,
    /// Numeric column; summed in totals rows and formatted with the
    /// given number of decimals when the value is computed.
    Number { decimal_places: u8 },
}

/// One column of a report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header text.
    pub label: String,

    /// Width in millimetres on a fixed-grid surface.
    pub width: f64,

    pub alignment: Alignment,

    /// Record field the cell value is read from.
    pub source_field: String,

    #[serde(default)]
    pub kind: ColumnKind,

    /// Constant printed instead of the source value (e.g. a unit code).
    #[serde(default)]
    pub fixed_value: Option<String>,
}

impl ColumnSpec {
    pub fn new(label: impl Into<String>, width: f64, source_field: impl Into<String>) -> Self {
        ColumnSpec {
            label: label.into(),
            width,
            alignment: Alignment::Left,
            source_field: source_field.into(),
            kind: ColumnKind::Text,
            fixed_value: None,
        }
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn numeric(mut self, decimal_places: u8) -> Self {
        self.kind = ColumnKind::Number { decimal_places };
        self
    }

    pub fn fixed(mut self, value: impl Into<String>) -> Self {
        self.fixed_value = Some(value.into());
        self
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ColumnKind::Number { .. })
    }
}

/// Sum of the widths of a column list.
pub fn total_width(columns: &[ColumnSpec]) -> f64 {
    columns.iter().map(|c| c.width).sum()
}
