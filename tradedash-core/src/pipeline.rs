//! End-to-end pipeline: raw rows → normalized → enriched → view + aggregates.
//!
//! Stateless: every call recomputes everything from its input. The first
//! error aborts the run and no partial dashboard is returned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{portfolio_summary, profit_percent_distribution, symbol_groups, UnrealizedSource};
use crate::data::{parse_csv, RawRow, SnapshotSource, SourceError};
use crate::derive::enrich_all;
use crate::domain::{EnrichedTrade, PortfolioSummary, ProfitPercentBar, SymbolGroup};
use crate::filter::{select, FilterError, View};
use crate::normalize::{normalize_rows, NormalizeError};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Inputs that are not part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// "Today" for DTE. Supplied by the caller, never read from the clock here.
    pub as_of: NaiveDate,
    pub view: View,
    pub unrealized_source: UnrealizedSource,
}

/// Everything the presentation layer needs for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub view: View,
    pub unrealized_source: UnrealizedSource,
    /// Computed over the full snapshot, not the view.
    pub summary: PortfolioSummary,
    /// The view's rows, ascending by DTE.
    pub trades: Vec<EnrichedTrade>,
    pub symbol_groups: Vec<SymbolGroup>,
    pub profit_distribution: Vec<ProfitPercentBar>,
}

/// Normalize and enrich a snapshot.
pub fn prepare(rows: &[RawRow], as_of: NaiveDate) -> Result<Vec<EnrichedTrade>, NormalizeError> {
    let records = normalize_rows(rows)?;
    Ok(enrich_all(records, as_of))
}

/// Build the dashboard from an already enriched snapshot.
pub fn build(trades: &[EnrichedTrade], opts: &PipelineOptions) -> Dashboard {
    let summary = portfolio_summary(trades, opts.unrealized_source);
    let view_rows = select(trades, opts.view);

    tracing::debug!(
        records = trades.len(),
        view = %opts.view,
        view_rows = view_rows.len(),
        "dashboard built"
    );

    Dashboard {
        as_of: opts.as_of,
        view: opts.view,
        unrealized_source: opts.unrealized_source,
        summary,
        trades: view_rows,
        symbol_groups: symbol_groups(trades),
        profit_distribution: profit_percent_distribution(trades),
    }
}

/// Run the pipeline over decoded rows.
pub fn run(rows: &[RawRow], opts: &PipelineOptions) -> Result<Dashboard, PipelineError> {
    let trades = prepare(rows, opts.as_of)?;
    Ok(build(&trades, opts))
}

/// Fetch, decode and run.
pub fn run_source(source: &dyn SnapshotSource, opts: &PipelineOptions) -> Result<Dashboard, PipelineError> {
    let bytes = source.fetch()?;
    let rows = parse_csv(&bytes)?;
    run(&rows, opts)
}
