//! Position filter: view selection and DTE ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{EnrichedTrade, PositionState};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid filter '{0}': expected one of open, closed, all")]
    InvalidFilter(String),
}

/// Which records a table shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Open,
    Closed,
    All,
}

impl View {
    pub fn includes(self, state: PositionState) -> bool {
        match self {
            View::Open => state == PositionState::Open,
            View::Closed => state == PositionState::Closed,
            View::All => true,
        }
    }
}

impl FromStr for View {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(View::Open),
            "close" | "closed" => Ok(View::Closed),
            "all" => Ok(View::All),
            _ => Err(FilterError::InvalidFilter(s.to_string())),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Open => "open",
            View::Closed => "closed",
            View::All => "all",
        };
        f.write_str(name)
    }
}

/// Records matching `view`, ascending by `days_to_expiration`.
///
/// The sort is stable: equal DTEs keep their input order.
pub fn select(trades: &[EnrichedTrade], view: View) -> Vec<EnrichedTrade> {
    let mut selected: Vec<EnrichedTrade> = trades
        .iter()
        .filter(|t| view.includes(t.position_state()))
        .cloned()
        .collect();
    selected.sort_by_key(|t| t.days_to_expiration);
    selected
}

/// Parse `view` and select in one step.
pub fn select_named(trades: &[EnrichedTrade], view: &str) -> Result<Vec<EnrichedTrade>, FilterError> {
    Ok(select(trades, view.parse()?))
}
