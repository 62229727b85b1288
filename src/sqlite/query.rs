use rusqlite::Statement;
use rusqlite::types::Value;

use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns the rusqlite error if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<RowValues> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run `stmt` and materialize up to `limit` rows (all rows when `None`).
///
/// # Errors
/// Returns the rusqlite error from binding, stepping, or reading a column.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    params: &Params,
    limit: Option<usize>,
) -> rusqlite::Result<ResultSet> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(column_names, limit.unwrap_or(8).min(64));

    let mut rows = stmt.query(params.bind())?;
    while limit.is_none_or(|max| result_set.len() < max) {
        let Some(row) = rows.next()? else {
            break;
        };
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
