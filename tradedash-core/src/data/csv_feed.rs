//! Headered CSV feed → [`RawRow`]s.

use super::raw::RawRow;
use super::source::SourceError;

/// Decode a headered CSV snapshot. Every cell becomes a text value; typing
/// happens later in the normalizer.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| SourceError::Format(format!("unreadable header: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| SourceError::Format(format!("record {i}: {e}")))?;
        let mut row = RawRow::new();
        for (column, cell) in headers.iter().zip(record.iter()) {
            row.insert(column, cell);
        }
        rows.push(row);
    }

    Ok(rows)
}
