use rusqlite::Statement;
use rusqlite::types::Value;
use tracing::debug;

use crate::error::CookieQueryError;
use crate::results::ResultSet;
use crate::types::CellValue;

/// Extract a `CellValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `CookieQueryError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<CellValue, CookieQueryError> {
    let value: Value = row.get(idx)?;
    Ok(CellValue::from(value))
}

/// Step an already-bound statement to completion and collect its rows.
///
/// # Errors
/// Returns the classified SQLite error if stepping or reading a column fails.
pub fn build_result_set(stmt: &mut Statement) -> Result<ResultSet, CookieQueryError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_columns(column_names, 10);
    let mut rows_iter = stmt.raw_query();
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    debug!(rows = result_set.len(), "fetched rows");
    Ok(result_set)
}
