//! FILENAME: records/src/lib.rs
//! Record handling for the transport report system.
//!
//! Layers:
//! - `value`: The immutable property bag of one ingested record
//! - `column`: The column contract a report table is projected onto
//! - `date_resolver`: Finds the effective calendar date of a record
//! - `projector`: Turns a record into one row of display strings
//! - `number_format`: Number display and lenient number parsing

pub mod column;
pub mod date_resolver;
pub mod number_format;
pub mod projector;
pub mod value;

pub use column::{total_width, Alignment, ColumnKind, ColumnSpec};
pub use date_resolver::{
    parse_date_value, resolve_date, DateResolver, ParsedDateValue, ResolvedDate, Resolution,
};
pub use number_format::{format_decimal, format_general, parse_numeric};
pub use projector::{display_string, numeric_value, project, ProjectedCell, ProjectedRow};
pub use value::{FieldValue, Record};

/// Re-exported so callers name zones without a direct chrono-tz dependency.
pub use chrono_tz::Tz;
