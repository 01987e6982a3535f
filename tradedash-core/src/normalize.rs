//! Row normalizer: untyped snapshot rows → canonical [`TradeRecord`]s.
//!
//! - Dates must be `YYYY-MM-DD`.
//! - `Profit` and `EntrySum` are scaled by [`OPTIONS_MULTIPLIER`] here and
//!   nowhere else.
//! - Optional numeric cells stay `None` when missing; they are never coerced
//!   to zero.
//! - The first bad row aborts the whole snapshot.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::{RawRow, RawValue};
use crate::domain::{PositionState, TradeRecord, OPTIONS_MULTIPLIER};

/// Snapshot column names.
pub mod columns {
    pub const SYMBOL: &str = "Symbol";
    pub const POSITION: &str = "Pos";
    pub const ENTRY_SUM: &str = "EntrySum";
    pub const PROFIT: &str = "Profit";
    pub const PROFIT_PERCENT: &str = "ProfitPercent";
    pub const UNREALIZED_PNL: &str = "FifoPnlUnrealized";
    pub const MARK_PRICE: &str = "MarkPrice";
    pub const OPEN_PRICE: &str = "OpenPrice";
    pub const POSITION_VALUE: &str = "PositionValue";
    pub const EXPIRATION_DATE: &str = "exp_dt";
    pub const STRIKE_PRICE: &str = "strike_price";
    pub const EARLIEST_ENTRY_DATE: &str = "EarliestEntryDate";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from row normalization. `row` is the 0-based index in the snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("row {row}: column '{column}' value '{value}' is not a YYYY-MM-DD date")]
    MalformedDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

impl NormalizeError {
    pub fn row(&self) -> usize {
        match self {
            NormalizeError::MalformedDate { row, .. } | NormalizeError::MalformedRow { row, .. } => {
                *row
            }
        }
    }
}

/// Normalize every row, stopping at the first failure.
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<TradeRecord>, NormalizeError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(i, row))
        .collect()
}

/// Normalize one row. `index` is only used for error reporting.
pub fn normalize_row(index: usize, row: &RawRow) -> Result<TradeRecord, NormalizeError> {
    let cells = Cells { index, row };

    let symbol = cells.required_text(columns::SYMBOL)?;
    let position_state = parse_position_state(index, &cells.required_text(columns::POSITION)?)?;

    let entry_sum = scale(index, columns::ENTRY_SUM, cells.required_decimal(columns::ENTRY_SUM)?)?;
    let profit = scale(index, columns::PROFIT, cells.required_decimal(columns::PROFIT)?)?;

    Ok(TradeRecord {
        symbol,
        position_state,
        entry_sum,
        profit,
        profit_percent: cells.optional_decimal(columns::PROFIT_PERCENT)?,
        unrealized_pnl: cells.optional_decimal(columns::UNREALIZED_PNL)?,
        mark_price: cells.optional_decimal(columns::MARK_PRICE)?,
        open_price: cells.optional_decimal(columns::OPEN_PRICE)?,
        position_value: cells.optional_decimal(columns::POSITION_VALUE)?,
        strike_price: cells.optional_decimal(columns::STRIKE_PRICE)?,
        expiration_date: cells.required_date(columns::EXPIRATION_DATE)?,
        earliest_entry_date: cells.required_date(columns::EARLIEST_ENTRY_DATE)?,
    })
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    // chrono accepts unpadded months/days; the feed format does not.
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

fn parse_position_state(row: usize, text: &str) -> Result<PositionState, NormalizeError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "open" => Ok(PositionState::Open),
        "close" | "closed" => Ok(PositionState::Closed),
        other => Err(NormalizeError::MalformedRow {
            row,
            reason: format!("column '{}' has unknown position state '{other}'", columns::POSITION),
        }),
    }
}

fn scale(row: usize, column: &str, value: Decimal) -> Result<Decimal, NormalizeError> {
    value
        .checked_mul(OPTIONS_MULTIPLIER)
        .ok_or_else(|| NormalizeError::MalformedRow {
            row,
            reason: format!("column '{column}' overflows when scaled"),
        })
}

fn parse_decimal(value: &RawValue) -> Option<Decimal> {
    match value {
        RawValue::Null => None,
        RawValue::Number(v) => Decimal::from_f64(*v),
        RawValue::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
    }
}

struct Cells<'a> {
    index: usize,
    row: &'a RawRow,
}

impl Cells<'_> {
    fn missing(&self, column: &str) -> NormalizeError {
        NormalizeError::MalformedRow {
            row: self.index,
            reason: format!("missing required column '{column}'"),
        }
    }

    fn required_text(&self, column: &str) -> Result<String, NormalizeError> {
        match self.row.value(column) {
            Some(RawValue::Text(s)) => Ok(s.trim().to_string()),
            Some(other) => Err(NormalizeError::MalformedRow {
                row: self.index,
                reason: format!("column '{column}' expected text, got '{}'", other.display()),
            }),
            None => Err(self.missing(column)),
        }
    }

    fn required_decimal(&self, column: &str) -> Result<Decimal, NormalizeError> {
        self.optional_decimal(column)?
            .ok_or_else(|| self.missing(column))
    }

    fn optional_decimal(&self, column: &str) -> Result<Option<Decimal>, NormalizeError> {
        match self.row.value(column) {
            None => Ok(None),
            Some(value) => parse_decimal(value)
                .map(Some)
                .ok_or_else(|| NormalizeError::MalformedRow {
                    row: self.index,
                    reason: format!("column '{column}' value '{}' is not a number", value.display()),
                }),
        }
    }

    fn required_date(&self, column: &'static str) -> Result<NaiveDate, NormalizeError> {
        let value = self.row.value(column).ok_or_else(|| self.missing(column))?;
        let parsed = match value {
            RawValue::Text(s) => parse_date(s),
            _ => None,
        };
        parsed.ok_or_else(|| NormalizeError::MalformedDate {
            row: self.index,
            column,
            value: value.display(),
        })
    }
}
