//! FILENAME: layout-engine/src/flow.rs
//! Flowed layout - the coordinate-free path for hypertext surfaces.
//!
//! No measuring, no pagination: the header, the rows and their cells are
//! kept in the same order and grouping the grid path would draw.

use records::{ColumnSpec, ProjectedRow};

use crate::view::{FlowedColumn, FlowedRow, FlowedTable};

/// Builds a flowed table from the column spec and projected rows.
/// Rows are aligned to the column list: missing cells become empty,
/// surplus cells are dropped.
pub fn flow(columns: &[ColumnSpec], rows: &[ProjectedRow]) -> FlowedTable {
    let flowed_columns = columns
        .iter()
        .map(|c| FlowedColumn {
            label: c.label.clone(),
            align: c.alignment,
            numeric: c.is_numeric(),
        })
        .collect();

    let flowed_rows = rows
        .iter()
        .map(|row| FlowedRow {
            cells: (0..columns.len())
                .map(|i| row.cells.get(i).map(|c| c.text.clone()).unwrap_or_default())
                .collect(),
        })
        .collect();

    FlowedTable {
        columns: flowed_columns,
        rows: flowed_rows,
        totals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::{Alignment, ProjectedCell};

    #[test]
    fn test_flow_preserves_order_and_text() {
        let columns = vec![
            ColumnSpec::new("Ruta", 30.0, "RUTA"),
            ColumnSpec::new("Volumen", 20.0, "VOLUMEN").numeric(2).aligned(Alignment::Right),
        ];
        let rows = vec![
            ProjectedRow::new(vec![
                ProjectedCell::text("Ruta", "Norte"),
                ProjectedCell::text("Volumen", "10.5"),
            ]),
            ProjectedRow::new(vec![ProjectedCell::text("Ruta", "Sur")]),
        ];

        let table = flow(&columns, &rows);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].label, "Volumen");
        assert!(table.columns[1].numeric);
        assert_eq!(table.columns[1].align, Alignment::Right);
        assert_eq!(table.rows[0].cells, vec!["Norte", "10.5"]);
        assert_eq!(table.rows[1].cells, vec!["Sur", ""]);
        assert_eq!(table.totals, None);
        assert_eq!(table.row_count(), 2);
    }
}
