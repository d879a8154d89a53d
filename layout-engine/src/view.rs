//! FILENAME: layout-engine/src/view.rs
//! Layout output - what a surface draws.
//!
//! Fixed-grid surfaces consume a flat stream of `LayoutItem`s: positioned
//! cells, free text boxes and page breaks. Flowed surfaces consume a
//! `FlowedTable`, which keeps the same row/column grouping and cell text
//! but carries no coordinates.

use records::Alignment;
use serde::{Deserialize, Serialize};

use crate::definition::{CellFill, FontStyle, RowRef};

// ============================================================================
// FIXED-GRID OUTPUT
// ============================================================================

/// One positioned, sized, bordered table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    pub column: usize,
    pub row: RowRef,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Text already wrapped to the column width.
    pub lines: Vec<String>,

    /// Border on all four sides.
    pub border: bool,
    pub fill: CellFill,
    pub align: Alignment,
}

impl CellLayout {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top of the `index`-th text line when the line block is centred
    /// vertically in the cell.
    pub fn line_top(&self, index: usize, line_height: f64) -> f64 {
        let block = self.lines.len() as f64 * line_height;
        self.y + (self.height - block).max(0.0) / 2.0 + index as f64 * line_height
    }
}

/// Free text placed on the page outside the table grid
/// (form titles, labels, signature lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font_size: f64,
    pub style: FontStyle,
    pub align: Alignment,
    /// Draw a frame around the box.
    pub frame: bool,
    pub fill: CellFill,
}

impl TextBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        TextBox {
            x,
            y,
            width,
            height,
            text: text.into(),
            font_size: 10.0,
            style: FontStyle::Regular,
            align: Alignment::Left,
            frame: false,
            fill: CellFill::None,
        }
    }

    pub fn font(mut self, size: f64, style: FontStyle) -> Self {
        self.font_size = size;
        self.style = style;
        self
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn framed(mut self, fill: CellFill) -> Self {
        self.frame = true;
        self.fill = fill;
        self
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One element of a fixed-grid drawing stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutItem {
    Cell(CellLayout),
    Text(TextBox),
    /// Flush the surface and start a new page before the next item.
    PageBreak,
}

impl LayoutItem {
    pub fn as_cell(&self) -> Option<&CellLayout> {
        match self {
            LayoutItem::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, LayoutItem::PageBreak)
    }
}

/// Result of laying out one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub items: Vec<LayoutItem>,
    /// y just below the last emitted row.
    pub end_y: f64,
    /// Pages touched, counting the first.
    pub pages: usize,
}

impl GridLayout {
    pub fn cells(&self) -> impl Iterator<Item = &CellLayout> {
        self.items.iter().filter_map(LayoutItem::as_cell)
    }

    pub fn page_breaks(&self) -> usize {
        self.items.iter().filter(|i| i.is_page_break()).count()
    }
}

// ============================================================================
// FLOWED OUTPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowedColumn {
    pub label: String,
    pub align: Alignment,
    pub numeric: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowedRow {
    pub cells: Vec<String>,
}

/// A table for hypertext surfaces: header, data rows, optional totals row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowedTable {
    pub columns: Vec<FlowedColumn>,
    pub rows: Vec<FlowedRow>,
    pub totals: Option<FlowedRow>,
}

impl FlowedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
