use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
///
/// Booleans become 0/1 integers; timestamps and JSON are stored as text.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Converted `SQLite` parameters, ready to bind positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_sqlite_value).collect())
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }

    /// Positional params for rusqlite's `execute`/`query`.
    pub fn bind(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
        rusqlite::params_from_iter(self.0.iter())
    }
}
