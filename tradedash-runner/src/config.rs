//! Dashboard configuration loaded from TOML.
//!
//! A config holds one or more `[[report]]` sections. Each names a snapshot
//! source, the report kind, and optionally the table view and which
//! unrealized P&L figure the summary uses.
//!
//! ```toml
//! [[report]]
//! name = "options"
//! kind = "trade_report"
//! view = "open"
//!
//! [report.source]
//! type = "file"
//! path = "snapshots/trade_report.csv"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tradedash_core::{FilterError, UnrealizedSource, View};

/// Upper bound on `max_retries` for an HTTP source.
pub const MAX_RETRIES: u32 = 10;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config has no [[report]] sections")]
    NoReports,

    #[error("duplicate report name '{0}'")]
    DuplicateName(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("report '{report}': {reason}")]
    Invalid { report: String, reason: String },
}

/// Root of a dashboard config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(rename = "report", default)]
    pub reports: Vec<ReportConfig>,
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reports.is_empty() {
            return Err(ConfigError::NoReports);
        }

        let mut names = HashSet::new();
        for report in &self.reports {
            if report.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    report: report.name.clone(),
                    reason: "name must not be empty".into(),
                });
            }
            if !names.insert(report.name.as_str()) {
                return Err(ConfigError::DuplicateName(report.name.clone()));
            }
            report.view()?;
            report.source.validate(&report.name)?;
        }

        Ok(())
    }

    pub fn report(&self, name: &str) -> Option<&ReportConfig> {
        self.reports.iter().find(|r| r.name == name)
    }
}

/// One report section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub name: String,
    pub kind: ReportKind,
    /// `open`, `closed` or `all`. Defaults to `open`.
    #[serde(default)]
    pub view: Option<String>,
    /// Overrides the kind's default unrealized source.
    #[serde(default)]
    pub unrealized_source: Option<UnrealizedSource>,
    pub source: SourceConfig,
}

impl ReportConfig {
    pub fn view(&self) -> Result<View, FilterError> {
        match &self.view {
            Some(name) => name.parse(),
            None => Ok(View::default()),
        }
    }

    pub fn unrealized_source(&self) -> UnrealizedSource {
        self.unrealized_source
            .unwrap_or_else(|| self.kind.default_unrealized_source())
    }
}

/// The upstream snapshot a report is built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Full trade report: open and closed lots.
    TradeReport,
    /// Currently open positions.
    OpenPositions,
    /// Previously held positions.
    PriorPositions,
}

impl ReportKind {
    /// The full trade report carries the warehouse's FIFO unrealized figure;
    /// the position reports use the locally derived one.
    pub fn default_unrealized_source(self) -> UnrealizedSource {
        match self {
            ReportKind::TradeReport => UnrealizedSource::Warehouse,
            ReportKind::OpenPositions | ReportKind::PriorPositions => UnrealizedSource::Derived,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::TradeReport => "trade_report",
            ReportKind::OpenPositions => "open_positions",
            ReportKind::PriorPositions => "prior_positions",
        };
        f.write_str(name)
    }
}

/// Snapshot source configuration (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Local CSV file.
    File { path: PathBuf },

    /// CSV object over HTTP(S).
    Http {
        url: String,
        /// Environment variable holding a bearer token.
        #[serde(default)]
        auth_token_env: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
        #[serde(default)]
        max_retries: Option<u32>,
    },
}

impl SourceConfig {
    fn validate(&self, report: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            report: report.to_string(),
            reason: reason.to_string(),
        };
        match self {
            SourceConfig::File { path } if path.as_os_str().is_empty() => {
                Err(invalid("source.path must not be empty"))
            }
            SourceConfig::Http { url, .. }
                if !(url.starts_with("http://") || url.starts_with("https://")) =>
            {
                Err(invalid("source.url must be an http(s) URL"))
            }
            SourceConfig::Http {
                timeout_secs: Some(0),
                ..
            } => Err(invalid("source.timeout_secs must be greater than 0")),
            SourceConfig::Http {
                max_retries: Some(n),
                ..
            } if *n > MAX_RETRIES => Err(invalid(&format!(
                "source.max_retries must be at most {MAX_RETRIES}"
            ))),
            _ => Ok(()),
        }
    }
}
