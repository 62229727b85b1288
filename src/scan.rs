use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlHandleError;
use crate::types::RowValues;

/// Conversion from a column value into a Rust type.
pub trait FromRowValue: Sized {
    /// Convert `value`, or describe why it cannot be converted.
    ///
    /// # Errors
    /// Returns a message describing the incompatibility; callers wrap it with
    /// the column position.
    fn from_row_value(value: &RowValues) -> Result<Self, String>;
}

/// A caller-supplied scan destination.
///
/// Implemented for every [`FromRowValue`] type, so destinations are passed as
/// `&mut [&mut dyn ScanTarget]`:
/// ```rust
/// use sql_handle::prelude::*;
///
/// let mut id = 0_i64;
/// let mut name = String::new();
/// let mut targets: [&mut dyn ScanTarget; 2] = [&mut id, &mut name];
/// targets[0].scan_from(&RowValues::Int(3)).unwrap();
/// targets[1].scan_from(&RowValues::Text("x".into())).unwrap();
/// assert_eq!((id, name.as_str()), (3, "x"));
/// ```
pub trait ScanTarget {
    /// Overwrite the destination with `value`.
    ///
    /// # Errors
    /// Returns a message when the value cannot be stored in this destination.
    fn scan_from(&mut self, value: &RowValues) -> Result<(), String>;
}

impl<T: FromRowValue> ScanTarget for T {
    fn scan_from(&mut self, value: &RowValues) -> Result<(), String> {
        *self = T::from_row_value(value)?;
        Ok(())
    }
}

/// Copy `values` positionally into `dest`.
///
/// # Errors
/// Returns `SqlHandleError::Scan` when the destination count differs from the
/// column count, or when a column cannot be converted.
pub(crate) fn scan_into(
    column_names: &[String],
    values: &[RowValues],
    dest: &mut [&mut dyn ScanTarget],
) -> Result<(), SqlHandleError> {
    if dest.len() != values.len() {
        return Err(SqlHandleError::Scan(format!(
            "expected {} destination arguments in Scan, not {}",
            values.len(),
            dest.len()
        )));
    }
    for (idx, (target, value)) in dest.iter_mut().zip(values).enumerate() {
        target.scan_from(value).map_err(|msg| {
            let name = column_names.get(idx).map_or("?", String::as_str);
            SqlHandleError::Scan(format!("column index {idx}, name {name:?}: {msg}"))
        })?;
    }
    Ok(())
}

fn unsupported(value: &RowValues, target: &str) -> String {
    format!("converting {} to {target} is unsupported", value.type_name())
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::Int(i) => Ok(*i),
            RowValues::Bool(b) => Ok(i64::from(*b)),
            RowValues::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| format!("parsing {s:?} as i64: {e}")),
            other => Err(unsupported(other, "i64")),
        }
    }
}

impl FromRowValue for i32 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        let wide = i64::from_row_value(value)?;
        i32::try_from(wide).map_err(|_| format!("value {wide} out of range for i32"))
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::Float(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(i) => Ok(*i as f64),
            RowValues::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| format!("parsing {s:?} as f64: {e}")),
            other => Err(unsupported(other, "f64")),
        }
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_bool().ok_or_else(|| unsupported(value, "bool"))
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::Null => Err(unsupported(value, "String")),
            RowValues::Blob(bytes) => {
                String::from_utf8(bytes.clone()).map_err(|e| format!("blob is not UTF-8: {e}"))
            }
            other => Ok(other.to_string()),
        }
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::Blob(bytes) => Ok(bytes.clone()),
            RowValues::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(unsupported(other, "bytes")),
        }
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_timestamp()
            .ok_or_else(|| unsupported(value, "timestamp"))
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::JSON(j) => Ok(j.clone()),
            RowValues::Text(s) => serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}")),
            RowValues::Null => Ok(JsonValue::Null),
            other => Err(unsupported(other, "JSON")),
        }
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    #[test]
    fn scans_positionally() {
        let values = vec![RowValues::Int(1), RowValues::Text("x".into()), RowValues::Null];
        let mut a = 0_i64;
        let mut b = String::new();
        let mut c: Option<f64> = Some(1.0);
        scan_into(&cols(3), &values, &mut [&mut a, &mut b, &mut c]).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "x");
        assert_eq!(c, None);
    }

    #[test]
    fn count_mismatch_is_a_scan_error() {
        let values = vec![RowValues::Int(1), RowValues::Int(2)];
        let mut a = 0_i64;
        let err = scan_into(&cols(2), &values, &mut [&mut a]).unwrap_err();
        assert!(matches!(err, SqlHandleError::Scan(ref m) if m.contains("expected 2")));
    }

    #[test]
    fn null_into_plain_type_names_the_column() {
        let values = vec![RowValues::Null];
        let mut a = 0_i64;
        let err = scan_into(&["score".to_string()], &values, &mut [&mut a]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"score\""), "{msg}");
        assert!(msg.contains("NULL"), "{msg}");
    }

    #[test]
    fn json_parses_from_text() {
        let v = JsonValue::from_row_value(&RowValues::Text("{\"a\":1}".into())).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn i32_rejects_out_of_range() {
        assert!(i32::from_row_value(&RowValues::Int(i64::MAX)).is_err());
        assert_eq!(i32::from_row_value(&RowValues::Int(-4)), Ok(-4));
    }
}
