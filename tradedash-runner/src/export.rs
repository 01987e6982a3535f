//! Report export: JSON, CSV and Markdown artifacts.
//!
//! - **JSON**: the full `DashboardReport`, schema-versioned
//! - **CSV**: the view's trade table for spreadsheets
//! - **Markdown**: summary cards and tables for a quick read
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tradedash_core::domain::EnrichedTrade;
use tradedash_core::format::{money, optional, percent};

use crate::report::{DashboardReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `DashboardReport` to pretty JSON.
pub fn export_json(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize DashboardReport to JSON")
}

/// Deserialize a `DashboardReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<DashboardReport> {
    let report: DashboardReport =
        serde_json::from_str(json).context("failed to deserialize DashboardReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade table as CSV.
///
/// Columns: symbol, position, strike_price, expiration_date, dte, unrealized,
/// position_value, earliest_entry_date, entry_sum, profit, profit_percent,
/// mark_price, open_price
pub fn export_trades_csv(trades: &[EnrichedTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "symbol",
        "position",
        "strike_price",
        "expiration_date",
        "dte",
        "unrealized",
        "position_value",
        "earliest_entry_date",
        "entry_sum",
        "profit",
        "profit_percent",
        "mark_price",
        "open_price",
    ])?;

    for t in trades {
        let r = &t.record;
        let dte = t.days_to_expiration.to_string();
        let unrealized = t.unrealized.round_dp(2).to_string();
        let entry_sum = r.entry_sum.round_dp(2).to_string();
        let profit = r.profit.round_dp(2).to_string();
        let expiration = r.expiration_date.to_string();
        let earliest_entry = r.earliest_entry_date.to_string();
        let record: [&str; 13] = [
            &r.symbol,
            if r.is_open() { "open" } else { "closed" },
            &optional(r.strike_price),
            &expiration,
            &dte,
            &unrealized,
            &optional(r.position_value),
            &earliest_entry,
            &entry_sum,
            &profit,
            &optional(r.profit_percent),
            &optional(r.mark_price),
            &optional(r.open_price),
        ];
        wtr.write_record(record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub report_json: PathBuf,
    pub trades_csv: PathBuf,
    pub report_markdown: PathBuf,
}

/// Save the artifact set for one report.
///
/// Creates `{name}_{as_of}/` under `output_dir` containing:
/// - `report.json`: the full `DashboardReport`
/// - `trades.csv`: the view's trade table
/// - `report.md`: the Markdown report
///
/// Re-running for the same report and date overwrites the directory's files.
pub fn save_artifacts(report: &DashboardReport, output_dir: &Path) -> Result<ArtifactPaths> {
    let dirname = format!("{}_{}", report.name, report.dashboard.as_of.format("%Y%m%d"));
    let dir = output_dir.join(dirname);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir: {}", dir.display()))?;

    let report_json = dir.join("report.json");
    std::fs::write(&report_json, export_json(report)?)
        .with_context(|| format!("failed to write {}", report_json.display()))?;

    let trades_csv = dir.join("trades.csv");
    std::fs::write(&trades_csv, export_trades_csv(&report.dashboard.trades)?)
        .with_context(|| format!("failed to write {}", trades_csv.display()))?;

    let report_markdown = dir.join("report.md");
    std::fs::write(&report_markdown, generate_report(report))
        .with_context(|| format!("failed to write {}", report_markdown.display()))?;

    tracing::info!(report = %report.name, dir = %dir.display(), "artifacts saved");

    Ok(ArtifactPaths {
        dir,
        report_json,
        trades_csv,
        report_markdown,
    })
}

/// Load a `DashboardReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<DashboardReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown reports ───────────────────────────────────────────────

/// Generate a Markdown report for one dashboard.
pub fn generate_report(report: &DashboardReport) -> String {
    let d = &report.dashboard;
    let mut md = String::with_capacity(4096);

    md.push_str(&format!("# {} Report\n\n", report.name));

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Kind | {} |\n", report.kind));
    md.push_str(&format!("| As Of | {} |\n", d.as_of));
    md.push_str(&format!("| View | {} |\n", d.view));
    md.push_str(&format!("| Unrealized Source | {} |\n", d.unrealized_source));
    md.push_str(&format!("| Source | {} |\n", report.source));
    md.push_str(&format!("| Rows | {} |\n", report.row_count));
    if !report.snapshot_hash.is_empty() {
        md.push_str(&format!("| Snapshot Hash | {} |\n", report.snapshot_hash));
    }
    md.push('\n');

    let s = &d.summary;
    md.push_str("## Portfolio Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Total Profit | {} |\n", money(s.total_realized_profit)));
    md.push_str(&format!("| Total Entry | {} |\n", money(s.total_entry)));
    md.push_str(&format!("| Percent ROI | {} |\n", percent(s.percent_roi)));
    md.push_str(&format!("| Total Unrealized | {} |\n", money(s.total_unrealized)));
    md.push_str(&format!("| Open Positions | {} |\n", s.open_positions));
    md.push_str(&format!("| Closed Positions | {} |\n", s.closed_positions));
    md.push('\n');

    md.push_str("## Trade Entries\n\n");
    if d.trades.is_empty() {
        md.push_str("No trades in this view.\n\n");
    } else {
        md.push_str(
            "| Symbol | StrikePrice | ExpirationDate | DTE | Unrealized | PositionValue \
             | EarliestEntryDate | EntrySum | Profit | ProfitPercent | MarkPrice |\n",
        );
        md.push_str("| --- | --- | --- | --- | --- | --- | --- | --- | --- | --- | --- |\n");
        for t in &d.trades {
            let r = &t.record;
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                r.symbol,
                optional(r.strike_price),
                r.expiration_date,
                t.days_to_expiration,
                money(t.unrealized),
                optional(r.position_value),
                r.earliest_entry_date,
                money(r.entry_sum),
                money(r.profit),
                r.profit_percent.map(percent).unwrap_or_default(),
                optional(r.mark_price),
            ));
        }
        md.push('\n');
    }

    if !d.symbol_groups.is_empty() {
        md.push_str("## Closed Winners by Symbol\n\n");
        md.push_str("| Symbol | Profit | Share |\n");
        md.push_str("| --- | --- | --- |\n");
        for g in &d.symbol_groups {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                g.symbol,
                money(g.summed_profit),
                percent(g.profit_share_percent)
            ));
        }
        md.push('\n');
    }

    if !d.profit_distribution.is_empty() {
        md.push_str("## Profit Percent\n\n");
        md.push_str("| Symbol | Profit % | Profit | Entry |\n");
        md.push_str("| --- | --- | --- | --- |\n");
        for bar in &d.profit_distribution {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                bar.symbol,
                percent(bar.profit_percent),
                money(bar.profit),
                money(bar.entry_sum)
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tradedash_core::domain::{
        PortfolioSummary, PositionState, ProfitPercentBar, SymbolGroup, TradeRecord,
    };
    use tradedash_core::{Dashboard, UnrealizedSource, View};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_trade() -> EnrichedTrade {
        EnrichedTrade {
            record: TradeRecord {
                symbol: "AAPL".into(),
                position_state: PositionState::Open,
                entry_sum: dec!(1500),
                profit: dec!(0),
                profit_percent: Some(dec!(12.5)),
                unrealized_pnl: Some(dec!(45)),
                mark_price: Some(dec!(3.45)),
                open_price: Some(dec!(3.00)),
                position_value: Some(dec!(100)),
                strike_price: Some(dec!(190)),
                expiration_date: date(2024, 1, 19),
                earliest_entry_date: date(2024, 1, 2),
            },
            days_to_expiration: 12,
            unrealized: dec!(45),
        }
    }

    fn sample_report() -> DashboardReport {
        DashboardReport {
            schema_version: SCHEMA_VERSION,
            name: "options".into(),
            kind: ReportKind::TradeReport,
            source: "file:trade_report.csv".into(),
            snapshot_hash: "ab".repeat(32),
            row_count: 2,
            dashboard: Dashboard {
                as_of: date(2024, 1, 7),
                view: View::Open,
                unrealized_source: UnrealizedSource::Warehouse,
                summary: PortfolioSummary {
                    total_realized_profit: dec!(200),
                    total_entry: dec!(2000),
                    percent_roi: dec!(10),
                    total_unrealized: dec!(45),
                    open_positions: 1,
                    closed_positions: 1,
                },
                trades: vec![sample_trade()],
                symbol_groups: vec![SymbolGroup {
                    symbol: "MSFT".into(),
                    summed_profit: dec!(200),
                    profit_share_percent: dec!(100),
                    label: "MSFT (100.00%)".into(),
                }],
                profit_distribution: vec![ProfitPercentBar {
                    symbol: "AAPL".into(),
                    profit_percent: dec!(12.5),
                    profit: dec!(0),
                    entry_sum: dec!(1500),
                }],
            },
        }
    }

    // ─── JSON round-trip ─────────────────────────────────────────────

    #[test]
    fn json_roundtrip() {
        let original = sample_report();
        let json = export_json(&original).unwrap();
        let restored = import_json(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut report = sample_report();
        report.schema_version = 99;
        let json = export_json(&report).unwrap();
        let msg = import_json(&json).unwrap_err().to_string();
        assert!(msg.contains("unsupported schema version 99"));
    }

    #[test]
    fn json_is_flat() {
        let json = export_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("summary").is_some());
        assert!(value.get("dashboard").is_none());
        assert_eq!(value["trades"][0]["symbol"], "AAPL");
        assert_eq!(value["trades"][0]["days_to_expiration"], 12);
    }

    // ─── CSV trades ─────────────────────────────────────────────────

    #[test]
    fn csv_trades_content() {
        let csv = export_trades_csv(&[sample_trade()]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), 13);
        assert!(header.starts_with("symbol,position,strike_price,expiration_date,dte"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("AAPL,open,190,2024-01-19,12,45,100,2024-01-02,1500,0,12.5,3.45,3"));
    }

    #[test]
    fn csv_empty_trades() {
        let csv = export_trades_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    // ─── Markdown ───────────────────────────────────────────────────

    #[test]
    fn markdown_report_has_sections() {
        let md = generate_report(&sample_report());
        assert!(md.starts_with("# options Report"));
        assert!(md.contains("## Portfolio Summary"));
        assert!(md.contains("| Total Profit | $200.00 |"));
        assert!(md.contains("| Total Entry | $2,000.00 |"));
        assert!(md.contains("| Percent ROI | 10.00% |"));
        assert!(md.contains("| Total Unrealized | $45.00 |"));
        assert!(md.contains("## Trade Entries"));
        assert!(md.contains("| AAPL | 190 | 2024-01-19 | 12 |"));
        assert!(md.contains("## Closed Winners by Symbol"));
        assert!(md.contains("| MSFT | $200.00 | 100.00% |"));
        assert!(md.contains("## Profit Percent"));
    }

    #[test]
    fn markdown_empty_view() {
        let mut report = sample_report();
        report.dashboard.trades.clear();
        report.dashboard.symbol_groups.clear();
        report.dashboard.profit_distribution.clear();
        let md = generate_report(&report);
        assert!(md.contains("No trades in this view."));
        assert!(!md.contains("## Closed Winners by Symbol"));
        assert!(!md.contains("## Profit Percent"));
    }

    // ─── Save/load artifacts ────────────────────────────────────────

    #[test]
    fn save_load_artifacts_roundtrip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let paths = save_artifacts(&report, dir.path()).unwrap();

        assert_eq!(paths.dir, dir.path().join("options_20240107"));
        assert!(paths.report_json.exists());
        assert!(paths.trades_csv.exists());
        assert!(paths.report_markdown.exists());

        let loaded = load_artifacts(&paths.dir).unwrap();
        assert_eq!(loaded, report);
    }
}
