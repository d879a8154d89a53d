//! FILENAME: layout-engine/src/definition.rs
//! Page geometry and per-cell rendering hints.
//!
//! All lengths are millimetres, origin at the top-left corner of the page.
//! The defaults describe an A4 landscape form: 15mm side margins, 10mm top
//! margin, 277mm usable width, 8mm minimum row height, 4mm line height and
//! an 8pt data font.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,

    /// Left edge of the table and of every header block element.
    pub left_margin: f64,

    /// Where content resumes after a page break.
    pub top_margin: f64,

    /// Reserved space at the foot of every page; rows never start inside it.
    pub bottom_margin: f64,

    /// Widest a column set may be.
    pub surface_width: f64,

    pub min_row_height: f64,
    pub line_height: f64,

    /// Data font size in points.
    pub font_size: f64,

    /// Horizontal text inset inside a cell, each side.
    pub cell_margin: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            page_width: 297.0,
            page_height: 210.0,
            left_margin: 15.0,
            top_margin: 10.0,
            bottom_margin: 15.0,
            surface_width: 277.0,
            min_row_height: 8.0,
            line_height: 4.0,
            font_size: 8.0,
            cell_margin: 1.0,
        }
    }
}

impl PageGeometry {
    /// The lowest y a row may reach.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.bottom_margin
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("page_height", self.page_height),
            ("page_width", self.page_width),
            ("surface_width", self.surface_width),
            ("min_row_height", self.min_row_height),
            ("line_height", self.line_height),
            ("font_size", self.font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.top_margin < 0.0 || self.bottom_margin < 0.0 || self.cell_margin < 0.0 {
            return Err(LayoutError::InvalidGeometry(
                "margins must not be negative".to_string(),
            ));
        }
        if self.top_margin >= self.content_bottom() {
            return Err(LayoutError::InvalidGeometry(format!(
                "top margin {} leaves no room above the bottom margin",
                self.top_margin
            )));
        }
        Ok(())
    }
}

// ============================================================================
// CELL HINTS
// ============================================================================

/// Background fill hint for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CellFill {
    #[default]
    None,
    Header,
    Total,
}

/// Which table row a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowRef {
    /// Column header row (repeated on every page).
    Header,
    /// Data row, by index into the laid-out row sequence.
    Data(usize),
    /// Synthesized totals row.
    Totals,
}

impl RowRef {
    pub fn data_index(&self) -> Option<usize> {
        match self {
            RowRef::Data(i) => Some(*i),
            _ => None,
        }
    }
}

/// Font weight/slant of a free text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}
