//! Tradedash Runner: report orchestration on top of `tradedash-core`.
//!
//! - TOML dashboard config with one section per report
//! - Snapshot loading from file or HTTP, with BLAKE3 provenance hashes
//! - Parallel report building
//! - JSON / CSV / Markdown artifact export

pub mod config;
pub mod export;
pub mod loader;
pub mod report;

pub use config::{ConfigError, DashboardConfig, ReportConfig, ReportKind, SourceConfig};
pub use export::{
    export_json, export_trades_csv, generate_report, import_json, load_artifacts, save_artifacts,
    ArtifactPaths,
};
pub use loader::{load_snapshot, open_source, snapshot_hash, LoadError, LoadedSnapshot};
pub use report::{
    build_report, build_report_from_rows, build_reports, DashboardReport, ReportError,
    SCHEMA_VERSION,
};
