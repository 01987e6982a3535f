//! Report builder: wires config, snapshot loading and the core pipeline.
//!
//! Three entry points:
//! - `build_reports()`: every section of a config, in parallel. Used by the CLI.
//! - `build_report()`: one section, including I/O.
//! - `build_report_from_rows()`: pre-loaded rows, no I/O.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradedash_core::pipeline::{self, Dashboard, PipelineError, PipelineOptions};
use tradedash_core::View;

use crate::config::{ConfigError, DashboardConfig, ReportConfig, ReportKind};
use crate::loader::{load_snapshot, open_source, LoadError, LoadedSnapshot};

/// Current schema version for exported reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Load(#[from] LoadError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("report '{name}' failed: {error}")]
    Section {
        name: String,
        #[source]
        error: Box<ReportError>,
    },
}

/// One built report: the dashboard plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    pub kind: ReportKind,
    pub source: String,
    pub snapshot_hash: String,
    pub row_count: usize,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Build a report from an already loaded snapshot. No I/O.
pub fn build_report_from_rows(
    config: &ReportConfig,
    snapshot: &LoadedSnapshot,
    as_of: NaiveDate,
    view_override: Option<View>,
) -> Result<DashboardReport, ReportError> {
    let opts = PipelineOptions {
        as_of,
        view: match view_override {
            Some(view) => view,
            None => config.view().map_err(ConfigError::from)?,
        },
        unrealized_source: config.unrealized_source(),
    };

    let dashboard = pipeline::run(&snapshot.rows, &opts)?;

    tracing::info!(
        report = %config.name,
        kind = %config.kind,
        view = %opts.view,
        unrealized = %opts.unrealized_source,
        rows = dashboard.trades.len(),
        "report built"
    );

    Ok(DashboardReport {
        schema_version: SCHEMA_VERSION,
        name: config.name.clone(),
        kind: config.kind,
        source: snapshot.source_name.clone(),
        snapshot_hash: snapshot.snapshot_hash.clone(),
        row_count: snapshot.rows.len(),
        dashboard,
    })
}

/// Fetch the section's snapshot and build its report.
pub fn build_report(
    config: &ReportConfig,
    as_of: NaiveDate,
    view_override: Option<View>,
) -> Result<DashboardReport, ReportError> {
    let source = open_source(&config.source)?;
    let snapshot = load_snapshot(source.as_ref())?;
    build_report_from_rows(config, &snapshot, as_of, view_override)
}

/// Build every section of `config`.
///
/// Sections are independent and built in parallel. Results come back in
/// config order; the first failing section (in that order) fails the run.
pub fn build_reports(
    config: &DashboardConfig,
    as_of: NaiveDate,
    view_override: Option<View>,
) -> Result<Vec<DashboardReport>, ReportError> {
    let results: Vec<Result<DashboardReport, ReportError>> = config
        .reports
        .par_iter()
        .map(|section| build_report(section, as_of, view_override))
        .collect();

    config
        .reports
        .iter()
        .zip(results)
        .map(|(section, result)| {
            result.map_err(|error| ReportError::Section {
                name: section.name.clone(),
                error: Box::new(error),
            })
        })
        .collect()
}
