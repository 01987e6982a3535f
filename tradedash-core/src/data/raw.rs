//! Untyped snapshot rows, as delivered by a source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell of a snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Number(f64),
    Text(String),
}

impl RawValue {
    /// True for explicit nulls and the textual spellings of a missing value
    /// that tabular exports produce (blank, `NaN`, `null`, `None`).
    pub fn is_null(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Number(v) => v.is_nan(),
            RawValue::Text(s) => {
                let s = s.trim();
                s.is_empty()
                    || s.eq_ignore_ascii_case("nan")
                    || s.eq_ignore_ascii_case("null")
                    || s.eq_ignore_ascii_case("none")
            }
        }
    }

    /// Render the value for error messages.
    pub fn display(&self) -> String {
        match self {
            RawValue::Null => "null".to_string(),
            RawValue::Number(v) => v.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

/// One snapshot row: column name → cell. Columns the pipeline does not know
/// about are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// The cell for `column`, or `None` when the column is missing or the
    /// cell holds a null spelling.
    pub fn value(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
