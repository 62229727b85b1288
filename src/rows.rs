use std::sync::Arc;

use crate::error::SqlHandleError;
use crate::results::{CustomDbRow, ResultSet};
use crate::scan::{ScanTarget, scan_into};

/// A multi-row cursor.
///
/// Call [`Rows::next`] before every [`Rows::scan`]; when `next` returns
/// `false`, check [`Rows::err`] to tell exhaustion from failure.
pub trait Rows {
    /// Advance to the next row. Returns `false` when exhausted, closed, or failed.
    fn next(&mut self) -> bool;

    /// Copy the current row into `dest`.
    ///
    /// # Errors
    /// Returns `SqlHandleError::Scan` if there is no current row or `dest` does
    /// not fit it.
    fn scan(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<(), SqlHandleError>;

    /// Column names of the result.
    ///
    /// # Errors
    /// Fails once the cursor is closed, or if the query itself failed.
    fn columns(&self) -> Result<Vec<String>, SqlHandleError>;

    /// Error encountered while producing the rows, if any.
    fn err(&self) -> Option<&SqlHandleError>;

    /// Release the cursor. Further calls are no-ops.
    ///
    /// # Errors
    /// Backends that hold driver resources report release failures here.
    fn close(&mut self) -> Result<(), SqlHandleError>;
}

/// Cursor over a materialized [`ResultSet`].
///
/// A failed query still yields a cursor: `next` returns `false` and
/// [`Rows::err`] holds the failure.
#[derive(Debug)]
pub struct ResultSetRows {
    state: Result<ResultSet, SqlHandleError>,
    position: Option<usize>,
    closed: bool,
}

impl ResultSetRows {
    pub fn from_result(result: Result<ResultSet, SqlHandleError>) -> Self {
        Self {
            state: result,
            position: None,
            closed: false,
        }
    }

    /// Shared column names, without the copy [`Rows::columns`] makes.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.state.as_ref().ok().map(ResultSet::column_names)
    }

    fn current(&self) -> Result<&CustomDbRow, SqlHandleError> {
        if self.closed {
            return Err(SqlHandleError::Scan("rows are closed".into()));
        }
        let set = self.state.as_ref().map_err(|_| {
            SqlHandleError::Scan("query failed; check Rows::err".into())
        })?;
        self.position
            .and_then(|pos| set.results.get(pos))
            .ok_or_else(|| SqlHandleError::Scan("scan called without a current row".into()))
    }
}

impl Rows for ResultSetRows {
    fn next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let Ok(set) = &self.state else {
            return false;
        };
        let next = self.position.map_or(0, |pos| pos + 1);
        if next < set.len() {
            self.position = Some(next);
            true
        } else {
            self.position = Some(set.len());
            false
        }
    }

    fn scan(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<(), SqlHandleError> {
        let row = self.current()?;
        scan_into(&row.column_names, &row.rows, dest)
    }

    fn columns(&self) -> Result<Vec<String>, SqlHandleError> {
        if self.closed {
            return Err(SqlHandleError::Scan("rows are closed".into()));
        }
        match &self.state {
            Ok(set) => Ok(set.column_names().to_vec()),
            Err(_) => Err(SqlHandleError::Scan("query failed; check Rows::err".into())),
        }
    }

    fn err(&self) -> Option<&SqlHandleError> {
        self.state.as_ref().err()
    }

    fn close(&mut self) -> Result<(), SqlHandleError> {
        self.closed = true;
        if let Ok(set) = &mut self.state {
            set.results.clear();
        }
        Ok(())
    }
}
