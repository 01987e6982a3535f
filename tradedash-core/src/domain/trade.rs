//! TradeRecord: one position/lot from an upstream snapshot, and its enriched form.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract multiplier applied to `profit` and `entry_sum` at normalization.
///
/// Every row is treated as a single-leg option contract. This is a fixed
/// policy, not something detected from the data; stock rows or spreads would
/// be scaled wrongly.
pub const OPTIONS_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// Lifecycle state of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    Open,
    Closed,
}

impl PositionState {
    pub fn is_open(self) -> bool {
        matches!(self, PositionState::Open)
    }

    pub fn is_closed(self) -> bool {
        matches!(self, PositionState::Closed)
    }
}

/// A canonical trade record produced by the normalizer.
///
/// `entry_sum` and `profit` are already scaled by [`OPTIONS_MULTIPLIER`].
/// Optional fields are `None` when the upstream value was missing, which is
/// distinct from an upstream zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Identification ──
    pub symbol: String,
    pub position_state: PositionState,

    // ── Cost and P&L (scaled) ──
    pub entry_sum: Decimal,
    pub profit: Decimal,
    pub profit_percent: Option<Decimal>,
    /// Warehouse-observed unrealized P&L (`FifoPnlUnrealized`).
    pub unrealized_pnl: Option<Decimal>,

    // ── Prices ──
    pub mark_price: Option<Decimal>,
    pub open_price: Option<Decimal>,
    pub position_value: Option<Decimal>,
    pub strike_price: Option<Decimal>,

    // ── Dates ──
    pub expiration_date: NaiveDate,
    pub earliest_entry_date: NaiveDate,
}

impl TradeRecord {
    pub fn is_open(&self) -> bool {
        self.position_state.is_open()
    }

    pub fn is_closed(&self) -> bool {
        self.position_state.is_closed()
    }
}

/// A trade record plus the fields derived against a given date.
///
/// Never persisted: `days_to_expiration` depends on the date the pipeline ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrade {
    #[serde(flatten)]
    pub record: TradeRecord,
    /// `expiration_date - as_of` in whole days. Negative once expired.
    pub days_to_expiration: i64,
    /// Locally derived unrealized P&L; `0` whenever it cannot be computed.
    pub unrealized: Decimal,
}

impl EnrichedTrade {
    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    pub fn position_state(&self) -> PositionState {
        self.record.position_state
    }
}
