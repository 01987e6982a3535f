//! Metric deriver: per-record fields computed against an injected date.
//!
//! Pure and deterministic in `(record, as_of)`. Nothing is cached, so a
//! different `as_of` always yields a different `days_to_expiration`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{EnrichedTrade, TradeRecord};

/// Whole days from `as_of` to expiration. Negative once expired, never clamped.
pub fn days_to_expiration(record: &TradeRecord, as_of: NaiveDate) -> i64 {
    (record.expiration_date - as_of).num_days()
}

/// `(mark_price - open_price) * position_value` for open records with both
/// prices present; `0` otherwise.
///
/// The zero is a display default, not "unknown". A missing `position_value`
/// also yields zero.
pub fn derived_unrealized(record: &TradeRecord) -> Decimal {
    if !record.is_open() {
        return Decimal::ZERO;
    }
    let (Some(mark), Some(open)) = (record.mark_price, record.open_price) else {
        return Decimal::ZERO;
    };
    let quantity = record.position_value.unwrap_or(Decimal::ZERO);

    mark.checked_sub(open)
        .and_then(|diff| diff.checked_mul(quantity))
        .unwrap_or_else(|| {
            tracing::warn!(symbol = %record.symbol, "unrealized P&L overflowed; reporting 0");
            Decimal::ZERO
        })
}

/// Return `record` enriched with its derived fields.
pub fn enrich(record: TradeRecord, as_of: NaiveDate) -> EnrichedTrade {
    let days_to_expiration = days_to_expiration(&record, as_of);
    let unrealized = derived_unrealized(&record);
    EnrichedTrade {
        record,
        days_to_expiration,
        unrealized,
    }
}

/// Enrich a whole snapshot, preserving order.
pub fn enrich_all(records: Vec<TradeRecord>, as_of: NaiveDate) -> Vec<EnrichedTrade> {
    records.into_iter().map(|r| enrich(r, as_of)).collect()
}
