use std::sync::Arc;

use rusqlite::Connection;

use crate::error::SqlHandleError;
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::statement::Statement;
use crate::types::{ExecResult, RowValues};

use super::executor::exec_result;
use super::params::Params;
use super::query::build_result_set;

/// Prepared `SQLite` statement borrowed from a connection or transaction.
///
/// Dropping the statement finalizes it; [`Statement::close`] does the same
/// but reports errors. `SQLite` writes are not buffered on the client, so
/// [`Statement::flush`] only checks that the statement is still open.
pub struct SqlitePreparedStatement<'conn> {
    conn: &'conn Connection,
    stmt: Option<rusqlite::Statement<'conn>>,
    sql: Arc<str>,
}

impl<'conn> SqlitePreparedStatement<'conn> {
    pub(crate) fn prepare(conn: &'conn Connection, sql: &str) -> Result<Self, SqlHandleError> {
        let stmt = conn
            .prepare(sql)
            .map_err(|e| SqlHandleError::StatementCreate(e.into()))?;
        tracing::trace!(sql, "statement prepared");
        Ok(Self {
            conn,
            stmt: Some(stmt),
            sql: Arc::from(sql),
        })
    }

    /// The SQL text the statement was prepared from.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of bind parameters, or `None` once closed.
    #[must_use]
    pub fn parameter_count(&self) -> Option<usize> {
        self.stmt.as_ref().map(rusqlite::Statement::parameter_count)
    }

    fn live(&mut self) -> Result<&mut rusqlite::Statement<'conn>, SqlHandleError> {
        self.stmt.as_mut().ok_or(SqlHandleError::StatementClosed)
    }
}

impl Statement for SqlitePreparedStatement<'_> {
    fn exec(&mut self, args: &[RowValues]) -> Result<ExecResult, SqlHandleError> {
        let conn = self.conn;
        let params = Params::convert(args);
        let affected = self
            .live()?
            .execute(params.bind())
            .map_err(|e| SqlHandleError::StatementExec(e.into()))?;
        Ok(exec_result(conn, affected))
    }

    fn query_row(&mut self, args: &[RowValues]) -> Row {
        let params = Params::convert(args);
        match self.live() {
            Ok(stmt) => Row::from_result(
                build_result_set(stmt, &params, Some(1))
                    .map_err(|e| SqlHandleError::Select(e.into())),
            ),
            Err(err) => Row::from_error(err),
        }
    }

    fn query(&mut self, args: &[RowValues]) -> ResultSetRows {
        let params = Params::convert(args);
        let result = self.live().and_then(|stmt| {
            build_result_set(stmt, &params, None).map_err(|e| SqlHandleError::Select(e.into()))
        });
        ResultSetRows::from_result(result)
    }

    fn close(&mut self) -> Result<(), SqlHandleError> {
        let Some(stmt) = self.stmt.take() else {
            return Ok(());
        };
        tracing::trace!(sql = %self.sql, "statement closed");
        stmt.finalize()
            .map_err(|e| SqlHandleError::StatementClose(e.into()))
    }

    fn is_closed(&self) -> bool {
        self.stmt.is_none()
    }

    fn flush(&mut self) -> Result<ExecResult, SqlHandleError> {
        self.live()?;
        Ok(ExecResult::default())
    }
}

impl Drop for SqlitePreparedStatement<'_> {
    fn drop(&mut self) {
        if self.stmt.is_some() {
            tracing::trace!(sql = %self.sql, "statement released on drop");
        }
    }
}
