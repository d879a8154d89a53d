//! FILENAME: layout-engine/src/engine.rs
//! Table Layout Engine - turns projected rows into positioned cells.
//!
//! Row height rule: each cell's text is wrapped to its column width; the
//! cell wants `max(min_row_height, lines * line_height)`; the row takes the
//! largest want of its cells and every cell of the row is emitted at that
//! one height, so rows stay rectangular.
//!
//! Pagination: a row that would cross the bottom margin is moved to a new
//! page, preceded by a page break and a repeated header row. Rows are never
//! split. A row taller than a whole page is still placed in full on a fresh
//! page and overflows.

use log::{debug, trace};
use records::{total_width, Alignment, ColumnSpec, ProjectedRow};

use crate::definition::{CellFill, PageGeometry, RowRef};
use crate::error::LayoutError;
use crate::metrics::{wrap_text, HelveticaMetrics, TextMeasurer};
use crate::view::{CellLayout, GridLayout, LayoutItem};

/// Tolerance for comparing summed millimetre widths.
const WIDTH_EPSILON: f64 = 1e-6;

/// Incremental grid layout. Rows are pushed in order; pagination state is
/// carried between pushes so a totals row can follow the data rows.
pub struct GridLayouter<'a, M: TextMeasurer> {
    columns: &'a [ColumnSpec],
    geometry: &'a PageGeometry,
    measurer: M,

    /// Left edge of each column.
    column_x: Vec<f64>,

    items: Vec<LayoutItem>,
    current_y: f64,
    pages: usize,

    /// Data rows placed on the current page.
    rows_on_page: usize,

    /// True while the current page started at the top margin.
    page_started_at_top: bool,
    header_emitted: bool,
}

impl<'a, M: TextMeasurer> GridLayouter<'a, M> {
    /// Starts a layout whose first row is placed at `start_y` on page one.
    pub fn new(
        columns: &'a [ColumnSpec],
        geometry: &'a PageGeometry,
        measurer: M,
        start_y: f64,
    ) -> Result<Self, LayoutError> {
        geometry.validate()?;

        if columns.is_empty() {
            return Err(LayoutError::EmptyColumnSpec);
        }

        let total = total_width(columns);
        if total > geometry.surface_width + WIDTH_EPSILON {
            return Err(LayoutError::ColumnsExceedWidth {
                total,
                available: geometry.surface_width,
            });
        }

        if let Some(bad) = columns.iter().find(|c| !(c.width.is_finite() && c.width > 0.0)) {
            return Err(LayoutError::InvalidGeometry(format!(
                "column {:?} has width {}",
                bad.label, bad.width
            )));
        }

        let mut column_x = Vec::with_capacity(columns.len());
        let mut x = geometry.left_margin;
        for column in columns {
            column_x.push(x);
            x += column.width;
        }

        Ok(GridLayouter {
            columns,
            geometry,
            measurer,
            column_x,
            items: Vec::new(),
            current_y: start_y,
            pages: 1,
            rows_on_page: 0,
            page_started_at_top: start_y <= geometry.top_margin,
            header_emitted: false,
        })
    }

    pub fn current_y(&self) -> f64 {
        self.current_y
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Wraps each cell text to its column and returns the shared row height
    /// with the wrapped lines.
    pub fn measure_row<S: AsRef<str>>(&self, texts: &[S]) -> (f64, Vec<Vec<String>>) {
        let g = self.geometry;
        let mut height = g.min_row_height;
        let mut wrapped = Vec::with_capacity(self.columns.len());

        for (i, column) in self.columns.iter().enumerate() {
            let text = texts.get(i).map(|t| t.as_ref()).unwrap_or("");
            let available = (column.width - 2.0 * g.cell_margin).max(0.0);
            let lines = wrap_text(text, available, &self.measurer);
            let cell_height = g.min_row_height.max(lines.len() as f64 * g.line_height);
            height = height.max(cell_height);
            wrapped.push(lines);
        }

        (height, wrapped)
    }

    /// Emits the column header row at the current position.
    /// Header cells are single-line, `min_row_height` tall and shaded.
    pub fn push_header(&mut self) {
        let height = self.geometry.min_row_height;

        if !self.header_emitted
            && !self.page_started_at_top
            && self.current_y + height > self.geometry.content_bottom()
        {
            // No room for the header on page one; start the table on page two.
            self.items.push(LayoutItem::PageBreak);
            self.pages += 1;
            self.current_y = self.geometry.top_margin;
            self.page_started_at_top = true;
        }

        for (i, column) in self.columns.iter().enumerate() {
            self.items.push(LayoutItem::Cell(CellLayout {
                column: i,
                row: RowRef::Header,
                x: self.column_x[i],
                y: self.current_y,
                width: column.width,
                height,
                lines: vec![column.label.clone()],
                border: true,
                fill: CellFill::Header,
                align: Alignment::Center,
            }));
        }

        self.current_y += height;
        self.header_emitted = true;
    }

    /// Emits one data row.
    pub fn push_row(&mut self, index: usize, row: &ProjectedRow) {
        let texts: Vec<&str> = row.texts().collect();
        self.place_row(RowRef::Data(index), &texts, CellFill::None);
    }

    /// Emits a totals row, paginated like any data row.
    pub fn push_totals<S: AsRef<str>>(&mut self, texts: &[S]) {
        self.place_row(RowRef::Totals, texts, CellFill::Total);
    }

    fn place_row<S: AsRef<str>>(&mut self, row: RowRef, texts: &[S], fill: CellFill) {
        if !self.header_emitted {
            self.push_header();
        }

        let (height, wrapped) = self.measure_row(texts);
        let bottom = self.geometry.content_bottom();
        let fresh_page = self.rows_on_page == 0 && self.page_started_at_top;

        if self.current_y + height > bottom && !fresh_page {
            debug!(
                target: "LAYOUT",
                "page {} full at y={:.1}, row {:?} needs {:.1}mm",
                self.pages,
                self.current_y,
                row,
                height
            );
            self.break_page();
        }

        if self.current_y + height > bottom {
            debug!(
                target: "LAYOUT",
                "row {:?} is {:.1}mm tall and overflows page {}",
                row,
                height,
                self.pages
            );
        }

        for (i, lines) in wrapped.into_iter().enumerate() {
            let column = &self.columns[i];
            self.items.push(LayoutItem::Cell(CellLayout {
                column: i,
                row,
                x: self.column_x[i],
                y: self.current_y,
                width: column.width,
                height,
                lines,
                border: true,
                fill,
                align: column.alignment,
            }));
        }

        trace!(target: "LAYOUT", "row {:?} at y={:.1} h={:.1}", row, self.current_y, height);
        self.current_y += height;
        self.rows_on_page += 1;
    }

    fn break_page(&mut self) {
        self.items.push(LayoutItem::PageBreak);
        self.pages += 1;
        self.current_y = self.geometry.top_margin;
        self.rows_on_page = 0;
        self.page_started_at_top = true;
        self.push_header();
    }

    pub fn finish(self) -> GridLayout {
        GridLayout {
            items: self.items,
            end_y: self.current_y,
            pages: self.pages,
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Lays out a header row plus `rows` with Helvetica metrics at the
/// geometry's font size, starting at the top margin.
pub fn layout(
    columns: &[ColumnSpec],
    rows: &[ProjectedRow],
    geometry: &PageGeometry,
) -> Result<GridLayout, LayoutError> {
    layout_with(
        columns,
        rows,
        geometry,
        geometry.top_margin,
        HelveticaMetrics::new(geometry.font_size),
    )
}

/// Lays out a header row plus `rows` starting at `start_y` on page one.
pub fn layout_with<M: TextMeasurer>(
    columns: &[ColumnSpec],
    rows: &[ProjectedRow],
    geometry: &PageGeometry,
    start_y: f64,
    measurer: M,
) -> Result<GridLayout, LayoutError> {
    let mut layouter = GridLayouter::new(columns, geometry, measurer, start_y)?;
    layouter.push_header();
    for (index, row) in rows.iter().enumerate() {
        layouter.push_row(index, row);
    }
    let result = layouter.finish();
    debug!(
        target: "LAYOUT",
        "laid out {} rows over {} page(s)",
        rows.len(),
        result.pages
    );
    Ok(result)
}
