//! FILENAME: layout-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Column widths total {total}mm but the surface is {available}mm wide")]
    ColumnsExceedWidth { total: f64, available: f64 },

    #[error("Column specification is empty")]
    EmptyColumnSpec,

    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
}
