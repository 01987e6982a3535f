//! Aggregator: portfolio summary and chart groupings.
//!
//! Every function here is a pure fold over the slice it is given. Callers
//! decide which set to pass (full snapshot or a filtered view).

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedTrade, PortfolioSummary, ProfitPercentBar, SymbolGroup};

/// Minimum share (percent) for a symbol group to carry a label.
pub const LABEL_THRESHOLD_PERCENT: Decimal = Decimal::TEN;

/// Which unrealized P&L figure feeds `total_unrealized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrealizedSource {
    /// Warehouse `FifoPnlUnrealized`; absent values count as zero.
    Warehouse,
    /// Locally derived `(mark - open) * position_value`.
    Derived,
}

impl fmt::Display for UnrealizedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnrealizedSource::Warehouse => f.write_str("warehouse"),
            UnrealizedSource::Derived => f.write_str("derived"),
        }
    }
}

/// `part / whole * 100`, or `0` when `whole` is zero.
///
/// An overflowing result is folded into the same guard: it is logged and
/// reported as `0`.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            tracing::warn!(%part, %whole, "percentage overflowed; reporting 0");
            Decimal::ZERO
        })
}

/// Saturating sum. Saturation is logged once per fold.
fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    let mut saturated = false;
    let total = values.fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).unwrap_or_else(|| {
            saturated = true;
            acc.saturating_add(v)
        })
    });
    if saturated {
        tracing::warn!(%total, "sum overflowed; clamped to the decimal range");
    }
    total
}

/// Summary cards for `trades`.
///
/// Realized profit and entry are summed over closed records only;
/// `total_unrealized` covers every record, from the chosen source.
pub fn portfolio_summary(trades: &[EnrichedTrade], source: UnrealizedSource) -> PortfolioSummary {
    let closed = || trades.iter().filter(|t| t.record.is_closed());

    let total_realized_profit = sum(closed().map(|t| t.record.profit));
    let total_entry = sum(closed().map(|t| t.record.entry_sum));
    let percent_roi = percent_of(total_realized_profit, total_entry);

    let total_unrealized = match source {
        UnrealizedSource::Warehouse => sum(
            trades
                .iter()
                .map(|t| t.record.unrealized_pnl.unwrap_or(Decimal::ZERO)),
        ),
        UnrealizedSource::Derived => sum(trades.iter().map(|t| t.unrealized)),
    };

    let closed_positions = closed().count();

    PortfolioSummary {
        total_realized_profit,
        total_entry,
        percent_roi,
        total_unrealized,
        open_positions: trades.len() - closed_positions,
        closed_positions,
    }
}

/// Per-symbol profit shares among closed winners.
///
/// Only closed records with `profit >= 0` take part; losers are left out of
/// the proportion view entirely. Shares are relative to the grouped total,
/// not the portfolio total. Output is ordered by symbol.
pub fn symbol_groups(trades: &[EnrichedTrade]) -> Vec<SymbolGroup> {
    let mut by_symbol: BTreeMap<&str, Decimal> = BTreeMap::new();
    for trade in trades
        .iter()
        .filter(|t| t.record.is_closed() && t.record.profit >= Decimal::ZERO)
    {
        let entry = by_symbol.entry(trade.symbol()).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(trade.record.profit);
    }

    let grouped_total = sum(by_symbol.values().copied());

    by_symbol
        .into_iter()
        .map(|(symbol, summed_profit)| {
            let profit_share_percent = percent_of(summed_profit, grouped_total);
            SymbolGroup {
                symbol: symbol.to_string(),
                summed_profit,
                profit_share_percent,
                label: group_label(symbol, profit_share_percent),
            }
        })
        .collect()
}

/// `"{symbol} ({share:.2}%)"` at or above the threshold, else empty.
pub fn group_label(symbol: &str, share_percent: Decimal) -> String {
    if share_percent >= LABEL_THRESHOLD_PERCENT {
        format!("{symbol} ({:.2}%)", share_percent.round_dp(2))
    } else {
        String::new()
    }
}

/// Bars for the profit-percent chart: records with a known `profit_percent`,
/// highest first. Ties keep input order.
pub fn profit_percent_distribution(trades: &[EnrichedTrade]) -> Vec<ProfitPercentBar> {
    let mut bars: Vec<ProfitPercentBar> = trades
        .iter()
        .filter_map(|t| {
            t.record.profit_percent.map(|profit_percent| ProfitPercentBar {
                symbol: t.record.symbol.clone(),
                profit_percent,
                profit: t.record.profit,
                entry_sum: t.record.entry_sum,
            })
        })
        .collect();
    bars.sort_by(|a, b| b.profit_percent.cmp(&a.profit_percent));
    bars
}
