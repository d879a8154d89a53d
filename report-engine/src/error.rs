//! FILENAME: report-engine/src/error.rs

use layout_engine::LayoutError;
use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a record source. Opaque to the core and passed
/// through to the caller unmodified.
#[derive(Error, Debug)]
#[error("record source failed: {message}")]
pub struct SourceError {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        SourceError {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        SourceError {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report type not found: {0}")]
    NotFound(String),

    #[error("Report type already registered: {0}")]
    DuplicateReport(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid report date: {0}")]
    InvalidReportDate(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
