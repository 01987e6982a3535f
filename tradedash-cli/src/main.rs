//! Tradedash CLI: build trade dashboards from report snapshots.
//!
//! Commands:
//! - `report`: build every report in a TOML config, print Markdown, optionally save artifacts
//! - `check`: normalize and enrich one CSV snapshot and print its shape

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tradedash_core::pipeline::prepare;
use tradedash_core::View;
use tradedash_runner::{
    build_reports, generate_report, load_snapshot, open_source, save_artifacts, DashboardConfig,
    SourceConfig,
};

#[derive(Parser)]
#[command(name = "tradedash", about = "Tradedash CLI: options trade metrics dashboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every report in a config file.
    Report {
        /// Path to a TOML dashboard config.
        #[arg(long)]
        config: PathBuf,

        /// Date used for days-to-expiration (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,

        /// Table view for every report: open, closed or all. Overrides the config.
        #[arg(long)]
        view: Option<String>,

        /// Write report.json, trades.csv and report.md per report under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Normalize one CSV snapshot and report row counts.
    Check {
        /// Path to a trade report CSV.
        #[arg(long)]
        csv: PathBuf,

        /// Date used for days-to-expiration (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            config,
            as_of,
            view,
            output_dir,
        } => run_report(&config, as_of.as_deref(), view.as_deref(), output_dir.as_deref()),
        Commands::Check { csv, as_of } => run_check(csv, as_of.as_deref()),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn run_report(
    config_path: &Path,
    as_of: Option<&str>,
    view: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let as_of = parse_as_of(as_of)?;
    let view = view.map(str::parse::<View>).transpose()?;
    let config = DashboardConfig::from_file(config_path)?;

    let reports = build_reports(&config, as_of, view)?;

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", generate_report(report));
    }

    if let Some(dir) = output_dir {
        for report in &reports {
            let paths = save_artifacts(report, dir)?;
            eprintln!("Artifacts for '{}' saved to: {}", report.name, paths.dir.display());
        }
    }

    Ok(())
}

fn run_check(csv: PathBuf, as_of: Option<&str>) -> Result<()> {
    let as_of = parse_as_of(as_of)?;
    let source = open_source(&SourceConfig::File { path: csv })?;
    let snapshot = load_snapshot(source.as_ref())?;
    let trades = prepare(&snapshot.rows, as_of)
        .with_context(|| format!("snapshot '{}' failed normalization", snapshot.source_name))?;

    let open = trades.iter().filter(|t| t.record.is_open()).count();
    let expired_open = trades
        .iter()
        .filter(|t| t.record.is_open() && t.days_to_expiration < 0)
        .count();

    println!("Snapshot:  {}", snapshot.source_name);
    println!("Hash:      {}", snapshot.snapshot_hash);
    println!("As of:     {as_of}");
    println!("Rows:      {}", trades.len());
    println!("Open:      {open}");
    println!("Closed:    {}", trades.len() - open);
    if expired_open > 0 {
        println!("Warning:   {expired_open} open position(s) past expiration");
    }

    Ok(())
}
