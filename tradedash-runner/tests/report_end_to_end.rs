//! End-to-end: TOML config → file snapshots → reports → artifacts.

use std::path::Path;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;
use tradedash_core::{UnrealizedSource, View};
use tradedash_runner::{
    build_reports, load_artifacts, save_artifacts, DashboardConfig, ReportError, ReportKind,
};

const TRADE_REPORT: &str = "\
Symbol,Pos,EntrySum,Profit,ProfitPercent,FifoPnlUnrealized,MarkPrice,OpenPrice,PositionValue,exp_dt,strike_price,EarliestEntryDate
AAPL,open,15,0,,45,3.45,3.00,100,2024-01-19,190,2024-01-02
MSFT,close,10,2,20,,,,,2024-01-12,380,2023-12-20
TSLA,close,5,-1,-20,,,,,2024-01-05,250,2023-12-15
NVDA,open,8,0,,-12,4.00,4.50,100,2024-01-10,500,2024-01-03
";

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

fn write_snapshot(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

fn section(name: &str, kind: &str, view: Option<&str>, path: &str) -> String {
    let view = view.map(|v| format!("view = \"{v}\"\n")).unwrap_or_default();
    format!(
        "[[report]]\nname = \"{name}\"\nkind = \"{kind}\"\n{view}\n\
         [report.source]\ntype = \"file\"\npath = '{path}'\n\n"
    )
}

#[test]
fn builds_every_section_in_config_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), "trade_report.csv", TRADE_REPORT);

    let toml = [
        section("options", "trade_report", None, &path),
        section("open", "open_positions", Some("all"), &path),
    ]
    .concat();
    let config = DashboardConfig::from_toml(&toml).unwrap();
    let reports = build_reports(&config, as_of(), None).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].name, "options");
    assert_eq!(reports[1].name, "open");

    let options = &reports[0];
    assert_eq!(options.kind, ReportKind::TradeReport);
    assert_eq!(options.row_count, 4);
    assert_eq!(options.snapshot_hash.len(), 64);

    let d = &options.dashboard;
    assert_eq!(d.view, View::Open);
    assert_eq!(d.unrealized_source, UnrealizedSource::Warehouse);
    // Entry and realized profit cover closed rows only.
    assert_eq!(d.summary.total_entry, dec!(1500));
    assert_eq!(d.summary.total_realized_profit, dec!(100));
    assert_eq!(d.summary.percent_roi.round_dp(2), dec!(6.67));
    assert_eq!(d.summary.total_unrealized, dec!(33));
    assert_eq!(d.summary.open_positions, 2);
    assert_eq!(d.summary.closed_positions, 2);

    let symbols: Vec<&str> = d.trades.iter().map(|t| t.symbol()).collect();
    assert_eq!(symbols, ["NVDA", "AAPL"]);
    assert_eq!(d.trades[0].days_to_expiration, 3);
    assert_eq!(d.trades[1].days_to_expiration, 12);

    assert_eq!(d.symbol_groups.len(), 1);
    assert_eq!(d.symbol_groups[0].symbol, "MSFT");
    assert_eq!(d.symbol_groups[0].summed_profit, dec!(200));
    assert_eq!(d.symbol_groups[0].label, "MSFT (100.00%)");

    let bars: Vec<&str> = d.profit_distribution.iter().map(|b| b.symbol.as_str()).collect();
    assert_eq!(bars, ["MSFT", "TSLA"]);

    let open = &reports[1].dashboard;
    assert_eq!(open.view, View::All);
    assert_eq!(open.unrealized_source, UnrealizedSource::Derived);
    assert_eq!(open.summary.total_unrealized, dec!(-5));
    assert_eq!(open.trades.len(), 4);
    assert_eq!(reports[1].snapshot_hash, options.snapshot_hash);
}

#[test]
fn view_override_applies_to_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), "trade_report.csv", TRADE_REPORT);
    let toml = [
        section("a", "trade_report", Some("open"), &path),
        section("b", "prior_positions", Some("all"), &path),
    ]
    .concat();
    let config = DashboardConfig::from_toml(&toml).unwrap();

    let reports = build_reports(&config, as_of(), Some(View::Closed)).unwrap();
    for report in &reports {
        assert_eq!(report.dashboard.view, View::Closed);
        let symbols: Vec<&str> = report.dashboard.trades.iter().map(|t| t.symbol()).collect();
        assert_eq!(symbols, ["TSLA", "MSFT"]);
    }
}

#[test]
fn one_failing_section_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_snapshot(dir.path(), "good.csv", TRADE_REPORT);
    let missing = dir.path().join("missing.csv").display().to_string();
    let toml = [
        section("good", "trade_report", None, &good),
        section("broken", "trade_report", None, &missing),
    ]
    .concat();
    let config = DashboardConfig::from_toml(&toml).unwrap();

    let err = build_reports(&config, as_of(), None).unwrap_err();
    match err {
        ReportError::Section { name, .. } => assert_eq!(name, "broken"),
        other => panic!("expected section error, got {other}"),
    }
}

#[test]
fn malformed_date_fails_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let bad = TRADE_REPORT.replace("2024-01-19", "2024-13-45");
    let path = write_snapshot(dir.path(), "bad.csv", &bad);
    let config = DashboardConfig::from_toml(&section("bad", "trade_report", None, &path)).unwrap();

    let err = build_reports(&config, as_of(), None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("report 'bad' failed"), "{message}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn artifacts_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), "trade_report.csv", TRADE_REPORT);
    let config =
        DashboardConfig::from_toml(&section("options", "trade_report", None, &path)).unwrap();
    let reports = build_reports(&config, as_of(), None).unwrap();

    let out = dir.path().join("out");
    let paths = save_artifacts(&reports[0], &out).unwrap();
    assert_eq!(paths.dir, out.join("options_20240107"));

    let markdown = std::fs::read_to_string(&paths.report_markdown).unwrap();
    assert!(markdown.contains("| Total Entry | $1,500.00 |"));
    assert!(markdown.contains("| Percent ROI | 6.67% |"));
    assert!(markdown.contains("| Total Unrealized | $33.00 |"));

    let csv = std::fs::read_to_string(&paths.trades_csv).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let loaded = load_artifacts(&paths.dir).unwrap();
    assert_eq!(loaded, reports[0]);
}

#[test]
fn rerun_with_later_date_recomputes_dte() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), "trade_report.csv", TRADE_REPORT);
    let config =
        DashboardConfig::from_toml(&section("options", "trade_report", None, &path)).unwrap();

    let first = build_reports(&config, as_of(), None).unwrap();
    let later = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let second = build_reports(&config, later, None).unwrap();

    assert_eq!(first[0].dashboard.trades[0].days_to_expiration, 3);
    assert_eq!(second[0].dashboard.trades[0].days_to_expiration, 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_build_preserves_config_order(count in 1usize..8) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(dir.path(), "trade_report.csv", TRADE_REPORT);
        let toml: String = (0..count)
            .map(|i| section(&format!("report_{i}"), "trade_report", None, &path))
            .collect();
        let config = DashboardConfig::from_toml(&toml).unwrap();

        let reports = build_reports(&config, as_of(), None).unwrap();
        let names: Vec<String> = reports.iter().map(|r| r.name.clone()).collect();
        let expected: Vec<String> = (0..count).map(|i| format!("report_{i}")).collect();
        prop_assert_eq!(names, expected);
    }
}
