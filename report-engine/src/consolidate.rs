//! FILENAME: report-engine/src/consolidate.rs
//! Aggregation for consolidated reports: group-by with count and sum, and
//! the synthesized totals row.

use std::collections::BTreeMap;

use log::debug;
use records::{format_decimal, Alignment, ColumnKind, ColumnSpec, ProjectedCell, ProjectedRow};

use crate::descriptor::Consolidation;

/// Label of the totals row for non-numeric columns.
pub const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Default)]
struct GroupAccumulator {
    count: usize,
    sum: f64,
}

/// Groups projected detail rows by `spec.group_column`, counting rows and
/// summing `spec.sum_column` per group. Groups come out sorted by key.
/// Returns the summary column spec with the summary rows.
pub fn consolidate(
    columns: &[ColumnSpec],
    rows: &[ProjectedRow],
    spec: &Consolidation,
) -> (Vec<ColumnSpec>, Vec<ProjectedRow>) {
    let group_index = columns.iter().position(|c| c.label == spec.group_column);
    let sum_index = columns.iter().position(|c| c.label == spec.sum_column);

    let group_width = group_index.map(|i| columns[i].width).unwrap_or(60.0);
    let sum_width = sum_index.map(|i| columns[i].width).unwrap_or(30.0);

    let summary_columns = vec![
        ColumnSpec::new(spec.group_label.clone(), group_width, spec.group_column.clone()),
        ColumnSpec::new(spec.count_label.clone(), sum_width, spec.count_label.clone())
            .numeric(0)
            .aligned(Alignment::Right),
        ColumnSpec::new(spec.sum_label.clone(), sum_width, spec.sum_column.clone())
            .numeric(spec.sum_decimal_places)
            .aligned(Alignment::Right),
    ];

    let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
    for row in rows {
        let key = group_index
            .and_then(|i| row.cells.get(i))
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default();
        let value = sum_index
            .and_then(|i| row.cells.get(i))
            .and_then(|c| c.number)
            .unwrap_or(0.0);

        let group = groups.entry(key).or_default();
        group.count += 1;
        group.sum += value;
    }

    debug!(
        target: "DISPATCH",
        "consolidated {} rows into {} groups by {}",
        rows.len(),
        groups.len(),
        spec.group_column
    );

    let summary_rows = groups
        .into_iter()
        .map(|(key, group)| {
            ProjectedRow::new(vec![
                ProjectedCell {
                    label: spec.group_label.clone(),
                    text: key,
                    number: None,
                },
                ProjectedCell {
                    label: spec.count_label.clone(),
                    text: group.count.to_string(),
                    number: Some(group.count as f64),
                },
                ProjectedCell {
                    label: spec.sum_label.clone(),
                    text: format_decimal(group.sum, spec.sum_decimal_places),
                    number: Some(group.sum),
                },
            ])
        })
        .collect();

    (summary_columns, summary_rows)
}

/// Totals row: numeric columns hold the sum of the column over `rows`,
/// every other column holds `TOTAL`.
pub fn totals_row(columns: &[ColumnSpec], rows: &[ProjectedRow]) -> ProjectedRow {
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column.kind {
            ColumnKind::Number { decimal_places } => {
                let sum: f64 = rows
                    .iter()
                    .filter_map(|r| r.cells.get(i).and_then(|c| c.number))
                    .sum();
                ProjectedCell {
                    label: column.label.clone(),
                    text: format_decimal(sum, decimal_places),
                    number: Some(sum),
                }
            }
            ColumnKind::Text => ProjectedCell {
                label: column.label.clone(),
                text: TOTAL_LABEL.to_string(),
                number: None,
            },
        })
        .collect();

    ProjectedRow::new(cells)
}
