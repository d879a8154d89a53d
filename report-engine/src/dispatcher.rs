//! FILENAME: report-engine/src/dispatcher.rs
//! Report Dispatcher - runs one report type for one date.
//!
//! lookup -> fetch -> date filter -> project -> (consolidate) -> layout.
//! A run touches no I/O of its own: records come from the injected source
//! and the rendered document is returned to the caller.

use chrono::{NaiveDate, NaiveDateTime};
use layout_engine::{flow, FlowedRow};
use log::{debug, info};
use records::{project, DateResolver, ProjectedRow, Record};

use crate::consolidate::{consolidate, totals_row};
use crate::descriptor::{RendererDescriptor, RendererKind};
use crate::document::{HtmlDocument, RenderedDocument, RunOutcome};
use crate::error::ReportError;
use crate::registry::ReportRegistry;
use crate::render::{form, html, RenderContext};
use crate::settings::ReportSettings;
use crate::source::{DateWindow, RecordSource};

/// Layouts accepted for an operator-entered report date.
const REPORT_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parses a report date typed as `DD/MM/YYYY`, `DD-MM-YYYY` or `YYYY-MM-DD`.
pub fn parse_report_date(input: &str) -> Result<NaiveDate, ReportError> {
    let input = input.trim();
    REPORT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| ReportError::InvalidReportDate(input.to_string()))
}

/// Per-run options. The generation time is passed in so a run depends
/// only on its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub generated_at: NaiveDateTime,
    /// Overrides `ReportSettings::include_approval`.
    pub include_approval: Option<bool>,
    /// Overrides `ReportSettings::project_code`.
    pub project_code: Option<String>,
}

impl RunOptions {
    pub fn at(generated_at: NaiveDateTime) -> Self {
        RunOptions {
            generated_at,
            include_approval: None,
            project_code: None,
        }
    }

    pub fn with_approval(mut self, include: bool) -> Self {
        self.include_approval = Some(include);
        self
    }

    pub fn with_project_code(mut self, code: impl Into<String>) -> Self {
        self.project_code = Some(code.into());
        self
    }
}

pub struct ReportDispatcher {
    registry: ReportRegistry,
    settings: ReportSettings,
    resolver: DateResolver,
}

impl ReportDispatcher {
    pub fn new(registry: ReportRegistry, settings: ReportSettings) -> Result<Self, ReportError> {
        settings.validate()?;
        let resolver = DateResolver::new(settings.tz()?);
        Ok(ReportDispatcher {
            registry,
            settings,
            resolver,
        })
    }

    /// Dispatcher over the built-in report types.
    pub fn with_builtin_reports(settings: ReportSettings) -> Result<Self, ReportError> {
        let registry = ReportRegistry::with_builtin_reports(&settings.date_candidates);
        Self::new(registry, settings)
    }

    pub fn registry(&self) -> &ReportRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Current wall-clock time in the report zone, for `RunOptions::at`.
    pub fn local_now(&self) -> NaiveDateTime {
        chrono::Utc::now()
            .with_timezone(&self.resolver.zone())
            .naive_local()
    }

    /// Records whose resolved date is `date`, in fetch order.
    pub fn filter_records<'r>(
        &self,
        records: &'r [Record],
        candidates: &[String],
        date: NaiveDate,
    ) -> Vec<&'r Record> {
        records
            .iter()
            .filter(|r| self.resolver.matches(r, candidates, date))
            .collect()
    }

    /// Runs `report_id` for `date`. Unknown report types and source
    /// failures end the run with an error; a date with no matching
    /// records yields `RunOutcome::EmptyResult`.
    pub fn run<S: RecordSource + ?Sized>(
        &self,
        report_id: &str,
        date: NaiveDate,
        source: &mut S,
        options: &RunOptions,
    ) -> Result<RunOutcome, ReportError> {
        let descriptor = self.registry.get(report_id)?;

        let window = DateWindow::around(date);
        let fields = descriptor.requested_fields();
        info!(
            target: "DISPATCH",
            "run {} for {} (window {}..{}, {} fields)",
            report_id,
            date,
            window.start,
            window.end,
            fields.len()
        );

        let records = source.fetch(&window, &fields)?;
        let kept = self.filter_records(&records, &descriptor.date_candidates, date);
        info!(
            target: "DISPATCH",
            "{}: {} of {} records dated {}",
            report_id,
            kept.len(),
            records.len(),
            date
        );

        if kept.is_empty() {
            return Ok(RunOutcome::EmptyResult);
        }

        let rows: Vec<ProjectedRow> = kept
            .iter()
            .map(|r| project(r, &descriptor.columns))
            .collect();

        let ctx = RenderContext {
            report_date: date,
            generated_at: options.generated_at,
            project_code: options
                .project_code
                .clone()
                .unwrap_or_else(|| self.settings.project_code.clone()),
            include_approval: options
                .include_approval
                .unwrap_or(self.settings.include_approval),
            organization: self.settings.organization.clone(),
            row_count: kept.len(),
        };

        let document = self.render(descriptor, rows, &ctx)?;
        debug!(target: "DISPATCH", "{} rendered as {}", report_id, document.suggested_file_name());
        Ok(RunOutcome::Rendered(document))
    }

    fn render(
        &self,
        descriptor: &RendererDescriptor,
        rows: Vec<ProjectedRow>,
        ctx: &RenderContext,
    ) -> Result<RenderedDocument, ReportError> {
        let (columns, rows, totals) = match &descriptor.consolidation {
            Some(spec) => {
                let (columns, summary) = consolidate(&descriptor.columns, &rows, spec);
                let totals = totals_row(&columns, &summary);
                (columns, summary, Some(totals))
            }
            None => (descriptor.columns.clone(), rows, None),
        };

        let document = match &descriptor.renderer {
            RendererKind::GridForm(template) => RenderedDocument::Grid(form::render_form(
                &descriptor.identifier,
                template,
                &columns,
                &rows,
                totals.as_ref(),
                &self.settings.page,
                ctx,
            )?),
            RendererKind::HtmlDetail { title } | RendererKind::HtmlSummary { title } => {
                let mut table = flow(&columns, &rows);
                table.totals = totals.map(|t| FlowedRow {
                    cells: t.cells.into_iter().map(|c| c.text).collect(),
                });

                let html = match &descriptor.renderer {
                    RendererKind::HtmlSummary { .. } => html::render_summary(title, &table, ctx),
                    _ => html::render_detail(title, &table, ctx),
                };

                RenderedDocument::Html(HtmlDocument {
                    report_id: descriptor.identifier.clone(),
                    report_date: ctx.report_date,
                    row_count: ctx.row_count,
                    table,
                    html,
                })
            }
        };

        Ok(document)
    }
}
