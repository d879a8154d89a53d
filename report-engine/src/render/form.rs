//! FILENAME: report-engine/src/render/form.rs
//! Fixed-grid regulatory form (A4 landscape).
//!
//! Page one carries the header block and the project line; the table
//! starts below them and repeats its column header on every page. The
//! signature footer follows the table, on a new page when it does not fit.

use layout_engine::{
    CellFill, FontStyle, GridLayouter, HelveticaMetrics, LayoutError, LayoutItem, PageGeometry,
    TextBox,
};
use log::debug;
use records::{Alignment, ColumnSpec, ProjectedRow};

use crate::descriptor::FormTemplate;
use crate::document::GridDocument;
use crate::render::RenderContext;

pub const HEADER_BLOCK_HEIGHT: f64 = 25.0;
pub const LOGO_PLACEHOLDER: &str = "LOGO NO ENCONTRADO";

/// Distance from the top margin to the project line.
const PROJECT_LINE_OFFSET: f64 = 30.0;
const LINE_BOX_HEIGHT: f64 = 8.0;

/// Gap between the table and the signature footer.
const FOOTER_GAP: f64 = 10.0;
const FOOTER_HEIGHT: f64 = 2.0 * LINE_BOX_HEIGHT;
const SIGNATURE_BOX_WIDTH: f64 = 60.0;

/// Where the table starts on page one.
pub fn table_start_y(geometry: &PageGeometry) -> f64 {
    geometry.top_margin + PROJECT_LINE_OFFSET + 2.0 * LINE_BOX_HEIGHT
}

fn header_block(template: &FormTemplate, geometry: &PageGeometry) -> Vec<LayoutItem> {
    let left = geometry.left_margin;
    let top = geometry.top_margin;
    let width = geometry.surface_width;
    let quarter = width * 0.25;

    let mut items = vec![LayoutItem::Text(
        TextBox::new(left, top, quarter, HEADER_BLOCK_HEIGHT, LOGO_PLACEHOLDER)
            .font(8.0, FontStyle::Italic)
            .aligned(Alignment::Center)
            .framed(CellFill::Header),
    )];

    for (i, line) in template.title_lines.iter().enumerate() {
        items.push(LayoutItem::Text(
            TextBox::new(
                left + quarter + 5.0,
                top + 5.0 + i as f64 * 10.0,
                width * 0.5 - 10.0,
                LINE_BOX_HEIGHT,
                line.clone(),
            )
            .font(14.0, FontStyle::Bold)
            .aligned(Alignment::Center),
        ));
    }

    items.push(LayoutItem::Text(
        TextBox::new(
            left + width * 0.75,
            top + HEADER_BLOCK_HEIGHT / 2.0 - 8.0,
            quarter,
            16.0,
            template.form_code.clone(),
        )
        .font(16.0, FontStyle::Bold)
        .aligned(Alignment::Center),
    ));

    items
}

fn project_line(ctx: &RenderContext, geometry: &PageGeometry) -> Vec<LayoutItem> {
    let y = geometry.top_margin + PROJECT_LINE_OFFSET;
    let mut x = geometry.left_margin;
    let mut items = Vec::with_capacity(4);

    let parts = [
        ("CODIGO DE OBRA:".to_string(), 35.0, FontStyle::Bold),
        (ctx.project_code.clone(), 40.0, FontStyle::Regular),
        ("FECHA:".to_string(), 15.0, FontStyle::Bold),
        (ctx.date_label(), 40.0, FontStyle::Regular),
    ];
    for (text, width, style) in parts {
        items.push(LayoutItem::Text(
            TextBox::new(x, y, width, LINE_BOX_HEIGHT, text).font(10.0, style),
        ));
        x += width;
    }

    items
}

fn footer(ctx: &RenderContext, geometry: &PageGeometry, y: f64) -> Vec<LayoutItem> {
    let left = geometry.left_margin;
    let mut items: Vec<LayoutItem> = ["RESPONSABLE:", "CARGO:", "FIRMA:"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            LayoutItem::Text(
                TextBox::new(
                    left + i as f64 * SIGNATURE_BOX_WIDTH,
                    y,
                    SIGNATURE_BOX_WIDTH,
                    LINE_BOX_HEIGHT,
                    *label,
                )
                .font(10.0, FontStyle::Bold),
            )
        })
        .collect();

    items.push(LayoutItem::Text(
        TextBox::new(
            left,
            y + LINE_BOX_HEIGHT,
            geometry.surface_width,
            LINE_BOX_HEIGHT,
            format!("Generado el: {}", ctx.generated_label()),
        )
        .font(8.0, FontStyle::Italic)
        .aligned(Alignment::Right),
    ));

    items
}

/// Lays out the whole form.
pub fn render_form(
    report_id: &str,
    template: &FormTemplate,
    columns: &[ColumnSpec],
    rows: &[ProjectedRow],
    totals: Option<&ProjectedRow>,
    geometry: &PageGeometry,
    ctx: &RenderContext,
) -> Result<GridDocument, LayoutError> {
    let mut layouter = GridLayouter::new(
        columns,
        geometry,
        HelveticaMetrics::new(geometry.font_size),
        table_start_y(geometry),
    )?;

    layouter.push_header();
    for (index, row) in rows.iter().enumerate() {
        layouter.push_row(index, row);
    }
    if let Some(totals) = totals {
        let texts: Vec<&str> = totals.texts().collect();
        layouter.push_totals(&texts);
    }
    let table = layouter.finish();

    let mut items = header_block(template, geometry);
    items.extend(project_line(ctx, geometry));
    items.extend(table.items);

    let mut pages = table.pages;
    let mut footer_y = table.end_y + FOOTER_GAP;
    if footer_y + FOOTER_HEIGHT > geometry.content_bottom() {
        items.push(LayoutItem::PageBreak);
        pages += 1;
        footer_y = geometry.top_margin;
    }
    items.extend(footer(ctx, geometry, footer_y));

    debug!(
        target: "LAYOUT",
        "{} form: {} rows, {} page(s), footer at y={:.1}",
        template.form_code,
        rows.len(),
        pages,
        footer_y
    );

    Ok(GridDocument {
        report_id: report_id.to_string(),
        report_date: ctx.report_date,
        row_count: ctx.row_count,
        file_prefix: template.file_prefix.clone(),
        geometry: geometry.clone(),
        columns: columns.to_vec(),
        items,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::f049_report;
    use crate::descriptor::RendererKind;
    use chrono::NaiveDate;
    use layout_engine::RowRef;
    use records::{project, Record};

    fn ctx(rows: usize) -> RenderContext {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        RenderContext {
            report_date: date,
            generated_at: date.and_hms_opt(14, 30, 0).unwrap(),
            project_code: "MAVA".to_string(),
            include_approval: false,
            organization: "MHC".to_string(),
            row_count: rows,
        }
    }

    fn render(count: usize) -> GridDocument {
        let descriptor = f049_report(&["Created".to_string()]);
        let RendererKind::GridForm(template) = &descriptor.renderer else {
            panic!("f049 is a grid form");
        };
        let rows: Vec<ProjectedRow> = (0..count)
            .map(|i| {
                let record = Record::new()
                    .with("PROVEEDOR", "ACME")
                    .with("REMISION", format!("1217{:02}", i))
                    .with("UNIDAD", "TON");
                project(&record, &descriptor.columns)
            })
            .collect();
        render_form(
            &descriptor.identifier,
            template,
            &descriptor.columns,
            &rows,
            None,
            &PageGeometry::default(),
            &ctx(count),
        )
        .unwrap()
    }

    fn texts(doc: &GridDocument) -> Vec<&TextBox> {
        doc.items
            .iter()
            .filter_map(|i| match i {
                LayoutItem::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_block_and_project_line() {
        let doc = render(2);
        let labels: Vec<&str> = texts(&doc).iter().map(|t| t.text.as_str()).collect();
        for expected in [
            "LOGO NO ENCONTRADO",
            "RECEPCION Y CONTROL DE MATERIALES",
            "EN LA VIA Y/O ALMACEN",
            "F-049",
            "CODIGO DE OBRA:",
            "MAVA",
            "FECHA:",
            "01/03/2024",
            "RESPONSABLE:",
            "CARGO:",
            "FIRMA:",
            "Generado el: 01/03/2024 14:30",
        ] {
            assert!(labels.contains(&expected), "missing {:?}", expected);
        }

        let logo = texts(&doc)[0];
        assert!(logo.frame);
        assert_eq!(logo.width, 277.0 * 0.25);
        assert_eq!(doc.file_prefix, "F049");
        assert_eq!(doc.row_count, 2);
    }

    #[test]
    fn test_table_starts_below_project_line() {
        let doc = render(2);
        let first_header = doc
            .items
            .iter()
            .filter_map(LayoutItem::as_cell)
            .find(|c| c.row == RowRef::Header)
            .unwrap();
        assert_eq!(first_header.y, 56.0);
        assert_eq!(first_header.x, 15.0);

        let und: Vec<&str> = doc
            .items
            .iter()
            .filter_map(LayoutItem::as_cell)
            .filter(|c| c.column == 4 && c.row.data_index().is_some())
            .map(|c| c.lines[0].as_str())
            .collect();
        assert_eq!(und, vec!["M3", "M3"]);
    }

    #[test]
    fn test_footer_follows_table() {
        let doc = render(2);
        // header row 56..64, two data rows to 80
        let responsable = texts(&doc)
            .into_iter()
            .find(|t| t.text == "RESPONSABLE:")
            .unwrap();
        assert_eq!(responsable.y, 90.0);
        assert_eq!(doc.pages, 1);
    }

    #[test]
    fn test_footer_moves_to_new_page_when_table_fills_page() {
        // 16 data rows end at y=192; the footer needs 26mm more.
        let doc = render(16);
        assert_eq!(doc.pages, 2);
        assert!(matches!(doc.items.iter().rev().nth(4), Some(LayoutItem::PageBreak)));

        let responsable = texts(&doc)
            .into_iter()
            .find(|t| t.text == "RESPONSABLE:")
            .unwrap();
        assert_eq!(responsable.y, 10.0);
    }
}
