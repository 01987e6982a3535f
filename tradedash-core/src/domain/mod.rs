//! Domain types for the trade dashboard.

pub mod summary;
pub mod trade;

pub use summary::{PortfolioSummary, ProfitPercentBar, SymbolGroup};
pub use trade::{EnrichedTrade, PositionState, TradeRecord, OPTIONS_MULTIPLIER};
