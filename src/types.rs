use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Values bound as statement parameters or read back from result columns.
///
/// The same enum is used by every backend so calling code never touches
/// driver-specific value types:
/// ```rust
/// use sql_handle::prelude::*;
///
/// let params: Vec<RowValues> = vec![1.into(), "alice".into(), true.into()];
/// assert_eq!(params[1].as_text(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans, or integers holding exactly 0 or 1.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(0) => Some(false),
            RowValues::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps, or text in `YYYY-MM-DD HH:MM:SS[.SSS]` form.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(value) => Some(*value),
            RowValues::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Short name of the variant, used in scan error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "integer",
            RowValues::Float(_) => "float",
            RowValues::Text(_) => "text",
            RowValues::Bool(_) => "bool",
            RowValues::Timestamp(_) => "timestamp",
            RowValues::Null => "NULL",
            RowValues::JSON(_) => "json",
            RowValues::Blob(_) => "blob",
        }
    }
}

impl fmt::Display for RowValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValues::Int(i) => write!(f, "{i}"),
            RowValues::Float(v) => write!(f, "{v}"),
            RowValues::Text(s) => f.write_str(s),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Timestamp(dt) => write!(f, "{}", dt.format("%F %T%.f")),
            RowValues::Null => f.write_str("NULL"),
            RowValues::JSON(j) => write!(f, "{j}"),
            RowValues::Blob(bytes) => {
                f.write_str("x'")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Summary returned by every execute call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows inserted, updated or deleted by the statement.
    pub rows_affected: usize,
    /// Row id of the most recent insert on the session, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// Column values for one row handed to [`Statement::batch_insert`](crate::Statement::batch_insert).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRow(pub Vec<RowValues>);

impl BatchRow {
    #[must_use]
    pub fn new(values: Vec<RowValues>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.0
    }
}

impl From<Vec<RowValues>> for BatchRow {
    fn from(values: Vec<RowValues>) -> Self {
        Self(values)
    }
}
