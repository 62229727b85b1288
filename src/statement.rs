use crate::error::SqlHandleError;
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::types::{BatchRow, ExecResult, RowValues};

/// A prepared statement bound to the session of the handle that created it.
///
/// Statements release their driver resources when dropped; [`Statement::close`]
/// does so explicitly and reports failures. Closing is idempotent: a second
/// call returns `Ok(())`, while executing a closed statement fails with
/// [`SqlHandleError::StatementClosed`].
pub trait Statement {
    /// Execute with the given arguments.
    ///
    /// # Errors
    /// Returns `SqlHandleError::StatementExec` on driver failure.
    fn exec(&mut self, args: &[RowValues]) -> Result<ExecResult, SqlHandleError>;

    /// Execute expecting a single row; failures surface on [`Row::scan`].
    fn query_row(&mut self, args: &[RowValues]) -> Row;

    /// Execute and return a cursor over all rows; failures surface through
    /// [`Rows::err`](crate::Rows::err).
    fn query(&mut self, args: &[RowValues]) -> ResultSetRows;

    /// Release the prepared statement.
    ///
    /// # Errors
    /// Returns `SqlHandleError::StatementClose` if the driver fails to release it.
    fn close(&mut self) -> Result<(), SqlHandleError>;

    fn is_closed(&self) -> bool;

    /// Push any client-side buffered writes to the server.
    ///
    /// Issues a zero-argument [`Statement::exec`] unless the backend overrides it.
    ///
    /// # Errors
    /// Whatever the flushing execute returns.
    fn flush(&mut self) -> Result<ExecResult, SqlHandleError> {
        self.exec(&[])
    }

    /// Execute the statement once per row, in order, then [`Statement::flush`].
    ///
    /// Stops at the first failing row and returns its error without flushing;
    /// rows before it have already reached the driver. No rollback happens
    /// here, so wrap the call in a transaction for all-or-nothing behaviour.
    ///
    /// # Errors
    /// The first row's execute error, or the flush error.
    fn batch_insert(&mut self, rows: &[BatchRow]) -> Result<(), SqlHandleError> {
        for (idx, row) in rows.iter().enumerate() {
            if let Err(err) = self.exec(row.values()) {
                tracing::debug!(row = idx, error = %err, "batch insert stopped");
                return Err(err);
            }
        }
        self.flush()?;
        tracing::trace!(rows = rows.len(), "batch insert flushed");
        Ok(())
    }
}
