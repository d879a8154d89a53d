//! FILENAME: report-engine/src/settings.rs
//! Report settings, loaded from JSON. Every field has a default, so a
//! partial (or empty) document is valid.

use std::path::Path;

use layout_engine::PageGeometry;
use records::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

pub const DEFAULT_TIME_ZONE: &str = "America/Bogota";
pub const DEFAULT_PROJECT_CODE: &str = "MAVA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// IANA zone record timestamps are converted to before dating.
    pub time_zone: String,

    pub page: PageGeometry,

    /// Project code printed on fixed-grid forms.
    pub project_code: String,

    /// Add the approval block to summary documents.
    pub include_approval: bool,

    /// Date fields tried when a report type does not name its own.
    pub date_candidates: Vec<String>,

    /// Name printed in summary footers.
    pub organization: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            page: PageGeometry::default(),
            project_code: DEFAULT_PROJECT_CODE.to_string(),
            include_approval: false,
            date_candidates: vec!["Created".to_string(), "Modified".to_string()],
            organization: "MHC".to_string(),
        }
    }
}

impl ReportSettings {
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        let settings: ReportSettings =
            serde_json::from_str(json).map_err(|e| ReportError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn tz(&self) -> Result<Tz, ReportError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ReportError::InvalidTimeZone(self.time_zone.clone()))
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        self.tz()?;
        self.page.validate()?;
        if self.date_candidates.iter().all(|c| c.trim().is_empty()) {
            return Err(ReportError::Settings(
                "date_candidates must name at least one field".to_string(),
            ));
        }
        Ok(())
    }
}
