//! FILENAME: layout-engine/src/lib.rs
//! Table layout for report documents.
//!
//! Layers:
//! - `definition`: Page geometry and cell hints (WHERE things may go)
//! - `view`: Layout output consumed by surfaces (WHAT gets drawn)
//! - `metrics`: Text measurement and word wrapping
//! - `engine`: Fixed-grid row sizing and pagination (HOW we lay out)
//! - `flow`: Coordinate-free tables for hypertext surfaces
//! - `markup`: HTML rendering of flowed tables
//! - `surface`: The fixed-grid drawing sink seam

pub mod definition;
pub mod engine;
pub mod error;
pub mod flow;
pub mod markup;
pub mod metrics;
pub mod surface;
pub mod view;

pub use definition::*;
pub use engine::{layout, layout_with, GridLayouter};
pub use error::LayoutError;
pub use flow::flow;
pub use markup::{html_escape, render_table_html};
pub use metrics::{wrap_text, HelveticaMetrics, MonospaceMetrics, TextMeasurer};
pub use surface::{replay, GridSurface};
pub use view::*;
