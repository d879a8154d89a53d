//! FILENAME: report-engine/src/lib.rs
//! Transport report engine.
//!
//! Layers:
//! - `descriptor` / `builtin` / `registry`: Which report types exist
//! - `source`: Where records come from (and the memo cache in front of it)
//! - `consolidate`: Group-by aggregation and totals rows
//! - `render`: Fixed-grid form and flowed HTML documents
//! - `dispatcher`: One report run, end to end
//! - `settings` / `logging`: Configuration and the unified log sink

pub mod builtin;
pub mod consolidate;
pub mod descriptor;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod logging;
pub mod registry;
pub mod render;
pub mod settings;
pub mod source;

pub use builtin::{builtin_descriptors, DAILY_REPORT, F049_REPORT, GENERAL_REPORT};
pub use consolidate::{consolidate, totals_row, TOTAL_LABEL};
pub use descriptor::{Consolidation, FormTemplate, RendererDescriptor, RendererKind};
pub use dispatcher::{parse_report_date, ReportDispatcher, RunOptions};
pub use document::{GridDocument, HtmlDocument, RenderedDocument, RunOutcome};
pub use error::{ReportError, SourceError};
pub use registry::ReportRegistry;
pub use render::RenderContext;
pub use settings::ReportSettings;
pub use source::{DateWindow, InMemorySource, MemoizedSource, RecordSource};
