//! FILENAME: report-engine/src/render/html.rs
//! Flowed HTML documents for email delivery.

use chrono::Datelike;
use layout_engine::{html_escape, render_table_html, FlowedTable};

use crate::render::RenderContext;

const BRAND_COLOR: &str = "#E31937";

const DETAIL_STYLE: &str = r#"
      body { font-family: Arial, sans-serif; margin: 20px; }
      h2 { color: #E31937; border-bottom: 2px solid #E31937; }
      table { border-collapse: collapse; width: 100%; }
      th { background-color: #E31937; color: white; padding: 10px; }
      td { padding: 8px; border-bottom: 1px solid #ddd; }
"#;

const SUMMARY_STYLE: &str = r#"
      body { font-family: Arial, sans-serif; margin: 40px; color: #333; line-height: 1.6; }
      h2 { color: #E31937; border-bottom: 2px solid #E31937; padding-bottom: 5px; margin-top: 30px; }
      table { border-collapse: collapse; width: 100%; margin: 20px 0; box-shadow: 0 2px 3px rgba(0,0,0,0.1); }
      th { background-color: #E31937; color: white; padding: 12px; }
      td { padding: 10px; border-bottom: 1px solid #ddd; }
      tr:nth-child(even) { background-color: #f9f9f9; }
      .total-row { font-weight: bold; background-color: #f5f5f5; }
      .note { font-size: 0.9em; color: #666; margin-top: 5px; }
"#;

fn page(style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">\n    <style>{}    </style>\n  </head>\n  <body>\n{}  </body>\n</html>\n",
        style, body
    )
}

/// Detail document: a title line, the table and the generation stamp.
pub fn render_detail(title: &str, table: &FlowedTable, ctx: &RenderContext) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "    <h2>{} - {}</h2>\n",
        html_escape(title),
        ctx.date_label()
    ));
    body.push_str(&render_table_html(table, None));
    body.push_str(&format!(
        "    <p>Reporte generado el {}</p>\n",
        ctx.generated_label()
    ));
    page(DETAIL_STYLE, &body)
}

fn approval_section() -> String {
    format!(
        r#"    <div style="margin-top: 40px; padding-top: 20px; border-top: 1px dashed #ccc;">
      <h3 style="color: {color};">Aprobación</h3>
      <p>Por favor confirme la recepción y aprobación de este reporte:</p>
      <div style="margin-top: 30px;">
        <p>_________________________________________</p>
        <p>Nombre y Firma</p>
      </div>
      <div style="margin-top: 20px;">
        <p>Fecha: ____/____/______</p>
        <p>Hora: ______</p>
      </div>
    </div>
"#,
        color = BRAND_COLOR
    )
}

/// Consolidated summary: branded header, the table with its totals row,
/// a unit note, the optional approval block and a footer.
pub fn render_summary(title: &str, table: &FlowedTable, ctx: &RenderContext) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"    <div style="margin-bottom: 20px;">
      <h1 style="color: {color}; margin: 0;">{title}</h1>
      <p style="margin: 5px 0 0; color: #555;">{date}</p>
    </div>
"#,
        color = BRAND_COLOR,
        title = html_escape(title),
        date = ctx.date_label()
    ));

    body.push_str("    <h2>Resumen Consolidado</h2>\n");
    body.push_str(&render_table_html(table, Some("consolidated-table")));
    body.push_str("    <p class=\"note\">* Volúmenes expresados en metros cúbicos (m³)</p>\n");

    if ctx.include_approval {
        body.push_str(&approval_section());
    }

    body.push_str(&format!(
        r#"    <div style="margin-top: 30px; font-size: 0.9em; color: #666; border-top: 1px solid #eee; padding-top: 10px;">
      <p>Reporte generado automáticamente el {generated}</p>
      <p>© {year} {org} - Todos los derechos reservados</p>
    </div>
"#,
        generated = ctx.generated_label(),
        year = ctx.generated_at.year(),
        org = html_escape(&ctx.organization)
    ));

    page(SUMMARY_STYLE, &body)
}
