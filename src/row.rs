use std::sync::Arc;

use crate::error::SqlHandleError;
use crate::results::{CustomDbRow, ResultSet};
use crate::scan::{ScanTarget, scan_into};

/// Result of a single-row fetch.
///
/// Acquiring a `Row` never fails; whatever went wrong while running the query
/// (including a query that matched nothing) is reported by [`Row::scan`].
#[derive(Debug)]
pub struct Row {
    outcome: Result<CustomDbRow, SqlHandleError>,
}

impl Row {
    /// Wrap a materialized result, keeping only its first row.
    pub fn from_result(result: Result<ResultSet, SqlHandleError>) -> Self {
        let outcome = result.and_then(|set| set.into_first().ok_or(SqlHandleError::NoRows));
        Self { outcome }
    }

    /// A row whose fetch already failed.
    pub fn from_error(err: SqlHandleError) -> Self {
        Self { outcome: Err(err) }
    }

    /// Copy the row's columns, in order, into `dest`.
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoRows` if the query matched nothing, the
    /// deferred query error if it failed, or `SqlHandleError::Scan` if `dest`
    /// does not fit the row.
    pub fn scan(self, dest: &mut [&mut dyn ScanTarget]) -> Result<(), SqlHandleError> {
        let row = self.outcome?;
        scan_into(&row.column_names, &row.rows, dest)
    }

    /// Take the row's values without scanning.
    ///
    /// # Errors
    /// Same deferred errors as [`Row::scan`], minus scan conversion failures.
    pub fn into_values(self) -> Result<CustomDbRow, SqlHandleError> {
        self.outcome
    }

    /// Column names of the fetched row, if the fetch succeeded.
    #[must_use]
    pub fn columns(&self) -> Option<&Arc<Vec<String>>> {
        self.outcome.as_ref().ok().map(|row| &row.column_names)
    }
}
