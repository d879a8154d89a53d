//! FILENAME: export/src/xlsx_writer.rs
//! Fixed-grid documents as a printable XLSX sheet.
//!
//! Table columns become sheet columns. Positions on a page are grouped into
//! row bands: a box starting inside a taller box above it shares that box's
//! row, and each row is as tall as its band. Free text spanning several
//! columns is merged across them. Page breaks in the layout stream become
//! manual sheet page breaks.

use std::collections::HashMap;
use std::path::Path;

use layout_engine::{replay, CellFill, CellLayout, FontStyle, GridSurface, PageGeometry, TextBox};
use log::debug;
use records::Alignment;
use report_engine::GridDocument;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::ExportError;

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const PIXELS_PER_INCH: f64 = 96.0;

/// Excel character width, roughly pixels / 7.
const PIXELS_PER_CHAR: f64 = 7.0;

/// Sheet paper size code for A4.
const PAPER_A4: u8 = 9;

/// y positions closer than this share a sheet row.
const ROW_EPSILON: f64 = 0.05;

const HEADER_FILL: u32 = 0xF0F0F0;
const TOTAL_FILL: u32 = 0xF5F5F5;

pub fn mm_to_points(mm: f64) -> f64 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Millimetres to an Excel column width (≈3.78 px per mm).
pub fn mm_to_column_width(mm: f64) -> f64 {
    mm * PIXELS_PER_INCH / MM_PER_INCH / PIXELS_PER_CHAR
}

// ============================================================================
// FORMATS
// ============================================================================

fn align(format: Format, alignment: Alignment) -> Format {
    format.set_align(match alignment {
        Alignment::Left => FormatAlign::Left,
        Alignment::Center => FormatAlign::Center,
        Alignment::Right => FormatAlign::Right,
    })
}

fn fill(format: Format, fill: CellFill) -> Format {
    match fill {
        CellFill::None => format,
        CellFill::Header => format.set_bold().set_background_color(Color::RGB(HEADER_FILL)),
        CellFill::Total => format.set_bold().set_background_color(Color::RGB(TOTAL_FILL)),
    }
}

fn cell_format(cell: &CellLayout, font_size: f64) -> Format {
    let mut format = Format::new()
        .set_font_name("Arial")
        .set_font_size(font_size)
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter);
    if cell.border {
        format = format.set_border(FormatBorder::Thin);
    }
    format = align(format, cell.align);
    fill(format, cell.fill)
}

fn text_format(text: &TextBox) -> Format {
    let mut format = Format::new()
        .set_font_name("Arial")
        .set_font_size(text.font_size)
        .set_align(FormatAlign::VerticalCenter);
    format = match text.style {
        FontStyle::Regular => format,
        FontStyle::Bold => format.set_bold(),
        FontStyle::Italic => format.set_italic(),
    };
    if text.frame {
        format = format.set_border(FormatBorder::Thin);
    }
    format = align(format, text.align);
    fill(format, text.fill)
}

// ============================================================================
// SURFACE
// ============================================================================

enum Placed {
    Cell(CellLayout),
    Text(TextBox),
}

impl Placed {
    fn y(&self) -> f64 {
        match self {
            Placed::Cell(c) => c.y,
            Placed::Text(t) => t.y,
        }
    }

    fn height(&self) -> f64 {
        match self {
            Placed::Cell(c) => c.height,
            Placed::Text(t) => t.height,
        }
    }
}

struct SheetCell {
    text: String,
    format: Format,
    /// Last column the cell spans (merged when past the anchor column).
    last_col: u16,
    /// y of the box that opened the cell.
    y: f64,
}

/// Lowest edge of the items anchored at `y`.
fn extent_at(items: &[Placed], y: f64) -> f64 {
    items
        .iter()
        .filter(|p| (p.y() - y).abs() < ROW_EPSILON)
        .map(|p| p.y() + p.height())
        .fold(y, f64::max)
}

/// Groups item positions into row bands `(start, end)`. A position that
/// falls inside a taller item above it joins that item's band, so every
/// item keeps its full height.
fn row_bands(items: &[Placed]) -> Vec<(f64, f64)> {
    let mut ys: Vec<f64> = items.iter().map(Placed::y).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup_by(|a, b| (*a - *b).abs() < ROW_EPSILON);

    let mut bands: Vec<(f64, f64)> = Vec::new();
    for y in ys {
        let extent = extent_at(items, y);
        match bands.last_mut() {
            Some(band) if y < band.1 - ROW_EPSILON => band.1 = band.1.max(extent),
            _ => bands.push((y, extent)),
        }
    }
    bands
}

/// Grid surface writing into one worksheet. Items are buffered per page
/// and written when the page ends.
pub struct XlsxGridSurface<'a> {
    worksheet: &'a mut Worksheet,
    geometry: &'a PageGeometry,
    /// Left edge of each sheet column, in millimetres.
    column_x: Vec<f64>,
    /// Right edge of the last column.
    right_edge: f64,
    pending: Vec<Placed>,
    next_row: u32,
    page_breaks: Vec<u32>,
    pages: usize,
    /// Height of every written row, in millimetres.
    row_heights: Vec<f64>,
    /// Text written per row, in row order.
    written: Vec<(u32, String)>,
}

impl<'a> XlsxGridSurface<'a> {
    pub fn new(
        worksheet: &'a mut Worksheet,
        geometry: &'a PageGeometry,
        column_widths: &[f64],
    ) -> Result<Self, ExportError> {
        worksheet.set_landscape();
        worksheet.set_paper_size(PAPER_A4);
        worksheet.set_margins(
            mm_to_inches(geometry.left_margin),
            mm_to_inches(geometry.left_margin),
            mm_to_inches(geometry.top_margin),
            mm_to_inches(geometry.bottom_margin),
            0.0,
            0.0,
        );

        let mut column_x = Vec::with_capacity(column_widths.len());
        let mut x = geometry.left_margin;
        for (col, width) in column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, mm_to_column_width(*width))?;
            column_x.push(x);
            x += width;
        }

        Ok(XlsxGridSurface {
            worksheet,
            geometry,
            column_x,
            right_edge: x,
            pending: Vec::new(),
            next_row: 0,
            page_breaks: Vec::new(),
            pages: 0,
            row_heights: Vec::new(),
            written: Vec::new(),
        })
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Rows written so far.
    pub fn rows(&self) -> u32 {
        self.next_row
    }

    /// Height of a written row in millimetres.
    pub fn row_height_mm(&self, row: u32) -> Option<f64> {
        self.row_heights.get(row as usize).copied()
    }

    /// First written row whose cell text contains `needle`.
    pub fn row_of_text(&self, needle: &str) -> Option<u32> {
        self.written
            .iter()
            .find(|(_, text)| text.contains(needle))
            .map(|(row, _)| *row)
    }

    /// Sheet column whose span contains `x`.
    fn column_at(&self, x: f64) -> u16 {
        self.column_x
            .iter()
            .rposition(|left| *left <= x + ROW_EPSILON)
            .unwrap_or(0) as u16
    }

    /// Columns a free text box covers: those whose midpoint lies inside
    /// the box. A box narrower than every column sits in the column
    /// holding its left edge.
    fn text_span(&self, text: &TextBox) -> (u16, u16) {
        let right = text.x + text.width;
        let covered: Vec<u16> = self
            .column_x
            .iter()
            .enumerate()
            .filter(|(i, left)| {
                let next = self.column_x.get(i + 1).copied().unwrap_or(self.right_edge);
                let mid = (**left + next) / 2.0;
                text.x <= mid && mid <= right
            })
            .map(|(i, _)| i as u16)
            .collect();

        match (covered.first(), covered.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                let col = self.column_at(text.x);
                (col, col)
            }
        }
    }

    fn flush_page(&mut self) -> Result<(), ExportError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let bands = row_bands(&self.pending);
        let row_of = |y: f64| -> u32 {
            bands
                .iter()
                .rposition(|(start, _)| *start <= y + ROW_EPSILON)
                .unwrap_or(0) as u32
        };

        for (i, (start, end)) in bands.iter().enumerate() {
            let height = match bands.get(i + 1) {
                Some((next, _)) => next - start,
                None => (end - start).max(self.geometry.min_row_height),
            };
            self.worksheet
                .set_row_height(self.next_row + i as u32, mm_to_points(height))?;
            self.row_heights.push(height);
        }

        let mut sheet_cells: HashMap<(u32, u16), SheetCell> = HashMap::new();
        for placed in &self.pending {
            let row = self.next_row + row_of(placed.y());
            match placed {
                Placed::Cell(cell) => {
                    sheet_cells.insert(
                        (row, cell.column as u16),
                        SheetCell {
                            text: cell.lines.join("\n"),
                            format: cell_format(cell, self.geometry.font_size),
                            last_col: cell.column as u16,
                            y: cell.y,
                        },
                    );
                }
                Placed::Text(text) => {
                    let (first, last) = self.text_span(text);
                    // Boxes landing in one cell share it: side by side on one
                    // line, stacked ones on their own lines.
                    sheet_cells
                        .entry((row, first))
                        .and_modify(|existing| {
                            if (existing.y - text.y).abs() < ROW_EPSILON {
                                existing.text.push(' ');
                            } else {
                                existing.text.push('\n');
                                existing.format = existing.format.clone().set_text_wrap();
                            }
                            existing.text.push_str(&text.text);
                            existing.last_col = existing.last_col.max(last);
                        })
                        .or_insert_with(|| SheetCell {
                            text: text.text.clone(),
                            format: text_format(text),
                            last_col: last,
                            y: text.y,
                        });
                }
            }
        }

        let mut keys: Vec<(u32, u16)> = sheet_cells.keys().copied().collect();
        keys.sort_unstable();
        let mut merged_until: Option<(u32, u16)> = None;
        for (row, col) in keys {
            let Some(cell) = sheet_cells.get(&(row, col)) else {
                continue;
            };
            if matches!(merged_until, Some((r, c)) if r == row && col <= c) {
                // Covered by a merged text span to its left.
                continue;
            }

            let spans_free = (col + 1..=cell.last_col).all(|c| !sheet_cells.contains_key(&(row, c)));
            if cell.last_col > col && spans_free {
                self.worksheet
                    .merge_range(row, col, row, cell.last_col, &cell.text, &cell.format)?;
                merged_until = Some((row, cell.last_col));
            } else {
                self.worksheet
                    .write_string_with_format(row, col, &cell.text, &cell.format)?;
            }
            self.written.push((row, cell.text.clone()));
        }

        debug!(
            target: "EXPORT",
            "page {}: {} items in {} rows from row {}",
            self.pages,
            self.pending.len(),
            bands.len(),
            self.next_row
        );

        self.next_row += bands.len() as u32;
        self.pending.clear();
        Ok(())
    }
}

impl GridSurface for XlsxGridSurface<'_> {
    type Error = ExportError;

    fn begin_page(&mut self) -> Result<(), ExportError> {
        self.flush_page()?;
        if self.pages > 0 {
            self.page_breaks.push(self.next_row);
        }
        self.pages += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextBox) -> Result<(), ExportError> {
        self.pending.push(Placed::Text(text.clone()));
        Ok(())
    }

    fn draw_cell(&mut self, cell: &CellLayout) -> Result<(), ExportError> {
        self.pending.push(Placed::Cell(cell.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.flush_page()?;
        if !self.page_breaks.is_empty() {
            self.worksheet.set_page_breaks(&self.page_breaks)?;
        }
        if self.next_row > 0 && !self.column_x.is_empty() {
            self.worksheet.set_print_area(
                0,
                0,
                self.next_row - 1,
                (self.column_x.len() - 1) as u16,
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Renders a grid document into a new workbook.
pub fn grid_to_workbook(doc: &GridDocument) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&doc.file_prefix)?;

        let widths: Vec<f64> = doc.columns.iter().map(|c| c.width).collect();
        let mut surface = XlsxGridSurface::new(worksheet, &doc.geometry, &widths)?;
        replay(&doc.items, &mut surface)?;
        debug!(
            target: "EXPORT",
            "{}: {} rows over {} page(s)",
            doc.report_id,
            surface.rows(),
            surface.pages()
        );
    }
    Ok(workbook)
}

pub fn save_xlsx(doc: &GridDocument, path: &Path) -> Result<(), ExportError> {
    let mut workbook = grid_to_workbook(doc)?;
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_engine::RowRef;

    #[test]
    fn test_unit_conversions() {
        assert!((mm_to_points(25.4) - 72.0).abs() < 1e-9);
        assert!((mm_to_points(8.0) - 22.677).abs() < 1e-3);
        // 40mm is about 151px, 21.6 character widths
        assert!((mm_to_column_width(40.0) - 21.59).abs() < 0.01);
    }

    fn cell(column: usize, y: f64, text: &str) -> CellLayout {
        CellLayout {
            column,
            row: RowRef::Data(0),
            x: 15.0 + column as f64 * 40.0,
            y,
            width: 40.0,
            height: 8.0,
            lines: vec![text.to_string()],
            border: true,
            fill: CellFill::None,
            align: Alignment::Left,
        }
    }

    #[test]
    fn test_surface_maps_positions_to_rows_and_columns() {
        let geometry = PageGeometry::default();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut surface = XlsxGridSurface::new(worksheet, &geometry, &[40.0, 40.0, 40.0]).unwrap();

        assert_eq!(surface.column_at(15.0), 0);
        assert_eq!(surface.column_at(60.0), 1);
        assert_eq!(surface.column_at(500.0), 2);
        assert_eq!(surface.text_span(&TextBox::new(15.0, 0.0, 120.0, 8.0, "x")), (0, 2));
        assert_eq!(surface.text_span(&TextBox::new(50.0, 0.0, 40.0, 8.0, "x")), (1, 1));
        assert_eq!(surface.text_span(&TextBox::new(60.0, 0.0, 5.0, 8.0, "x")), (1, 1));

        surface.begin_page().unwrap();
        surface.draw_text(&TextBox::new(15.0, 10.0, 35.0, 8.0, "CODIGO DE OBRA:")).unwrap();
        surface.draw_text(&TextBox::new(50.0, 10.0, 40.0, 8.0, "MAVA")).unwrap();
        surface.draw_cell(&cell(0, 20.0, "a")).unwrap();
        surface.draw_cell(&cell(1, 20.0, "b")).unwrap();
        surface.begin_page().unwrap();
        surface.draw_cell(&cell(0, 10.0, "c")).unwrap();
        surface.finish().unwrap();

        assert_eq!(surface.pages(), 2);
        assert_eq!(surface.rows(), 3);
        assert_eq!(surface.page_breaks, vec![2]);
        assert_eq!(surface.row_height_mm(0), Some(10.0));
        assert_eq!(surface.row_of_text("CODIGO DE OBRA:"), Some(0));
        assert_eq!(surface.row_of_text("c"), Some(2));
    }

    #[test]
    fn test_tall_boxes_keep_their_height() {
        let geometry = PageGeometry::default();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut surface = XlsxGridSurface::new(worksheet, &geometry, &[40.0, 40.0, 40.0]).unwrap();

        surface.begin_page().unwrap();
        surface
            .draw_text(&TextBox::new(15.0, 10.0, 80.0, 25.0, "LOGO").framed(CellFill::Header))
            .unwrap();
        surface.draw_text(&TextBox::new(95.0, 14.5, 40.0, 16.0, "F-049")).unwrap();
        surface.draw_text(&TextBox::new(95.0, 30.0, 40.0, 4.0, "REV 2")).unwrap();
        surface.draw_cell(&cell(0, 40.0, "a")).unwrap();
        surface.finish().unwrap();

        // Everything starting inside the 25mm logo shares its row.
        assert_eq!(surface.rows(), 2);
        assert_eq!(surface.row_of_text("LOGO"), Some(0));
        assert_eq!(surface.row_of_text("F-049"), Some(0));
        assert_eq!(surface.row_of_text("REV 2"), Some(0));
        assert_eq!(surface.row_height_mm(0), Some(30.0));
        assert_eq!(surface.row_of_text("a"), Some(1));
        assert_eq!(surface.row_height_mm(1), Some(8.0));
    }

    #[test]
    fn test_row_bands() {
        let text = |y: f64, h: f64| Placed::Text(TextBox::new(15.0, y, 10.0, h, "t"));
        let items = vec![text(10.0, 25.0), text(14.5, 16.0), text(25.0, 8.0), text(40.0, 8.0), text(48.0, 8.0)];
        assert_eq!(row_bands(&items), vec![(10.0, 35.0), (40.0, 48.0), (48.0, 56.0)]);
    }
}
