//! FILENAME: layout-engine/src/markup.rs
//! HTML markup for flowed tables.

use std::fmt::Write;

use crate::view::{FlowedRow, FlowedTable};

/// Escapes text for use in HTML element content and attribute values.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders a flowed table as an HTML `<table>`. The totals row, if any,
/// is the last body row and carries the `total-row` class.
pub fn render_table_html(table: &FlowedTable, class: Option<&str>) -> String {
    let mut html = String::new();

    match class {
        Some(class) => {
            let _ = writeln!(html, "<table class=\"{}\">", html_escape(class));
        }
        None => html.push_str("<table>\n"),
    }

    html.push_str("  <thead>\n    <tr>\n");
    for column in &table.columns {
        let _ = writeln!(
            html,
            "      <th style=\"text-align: {};\">{}</th>",
            column.align.as_css(),
            html_escape(&column.label)
        );
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in &table.rows {
        write_row(&mut html, table, row, false);
    }
    if let Some(totals) = &table.totals {
        write_row(&mut html, table, totals, true);
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

fn write_row(html: &mut String, table: &FlowedTable, row: &FlowedRow, is_total: bool) {
    if is_total {
        html.push_str("    <tr class=\"total-row\">\n");
    } else {
        html.push_str("    <tr>\n");
    }

    for (i, text) in row.cells.iter().enumerate() {
        let align = table
            .columns
            .get(i)
            .map(|c| c.align.as_css())
            .unwrap_or("left");
        let text = html_escape(text);
        if is_total {
            let _ = writeln!(
                html,
                "      <td style=\"text-align: {};\"><strong>{}</strong></td>",
                align, text
            );
        } else {
            let _ = writeln!(html, "      <td style=\"text-align: {};\">{}</td>", align, text);
        }
    }

    html.push_str("    </tr>\n");
}
