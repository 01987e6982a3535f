//! Portfolio-level aggregates. Ephemeral: rebuilt on every run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary card values for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of `profit` over closed records.
    pub total_realized_profit: Decimal,
    /// Sum of `entry_sum` over closed records.
    pub total_entry: Decimal,
    /// `total_realized_profit / total_entry * 100`, or `0` when `total_entry == 0`.
    pub percent_roi: Decimal,
    pub total_unrealized: Decimal,
    pub open_positions: usize,
    pub closed_positions: usize,
}

/// One slice of the "winners" proportion chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolGroup {
    pub symbol: String,
    pub summed_profit: Decimal,
    pub profit_share_percent: Decimal,
    /// `"{symbol} ({share}%)"` when the share is at least 10%, else empty.
    pub label: String,
}

/// One bar of the profit-percent distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitPercentBar {
    pub symbol: String,
    pub profit_percent: Decimal,
    pub profit: Decimal,
    pub entry_sum: Decimal,
}
