//! Operations shared by `SqliteConnection` and `SqliteTransaction`.
//!
//! Both forward to a borrowed `rusqlite::Connection`; a transaction derefs to
//! the connection it was opened on.

use rusqlite::Connection;

use crate::error::SqlHandleError;
use crate::results::ResultSet;
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::types::{ExecResult, RowValues};

use super::params::Params;
use super::query::build_result_set;

pub(crate) fn exec_result(conn: &Connection, rows_affected: usize) -> ExecResult {
    let rowid = conn.last_insert_rowid();
    ExecResult {
        rows_affected,
        last_insert_id: (rowid != 0).then_some(rowid),
    }
}

pub(crate) fn execute(
    conn: &Connection,
    query: &str,
    args: &[RowValues],
) -> Result<ExecResult, SqlHandleError> {
    let params = Params::convert(args);
    let affected = conn.execute(query, params.bind())?;
    Ok(exec_result(conn, affected))
}

fn select(
    conn: &Connection,
    query: &str,
    args: &[RowValues],
    limit: Option<usize>,
) -> Result<ResultSet, SqlHandleError> {
    let params = Params::convert(args);
    let mut stmt = conn
        .prepare_cached(query)
        .map_err(|e| SqlHandleError::Select(e.into()))?;
    build_result_set(&mut stmt, &params, limit).map_err(|e| SqlHandleError::Select(e.into()))
}

pub(crate) fn query_row(conn: &Connection, query: &str, args: &[RowValues]) -> Row {
    Row::from_result(select(conn, query, args, Some(1)))
}

pub(crate) fn query(conn: &Connection, query: &str, args: &[RowValues]) -> ResultSetRows {
    ResultSetRows::from_result(select(conn, query, args, None))
}

pub(crate) fn execute_batch(conn: &Connection, sql: &str) -> Result<(), SqlHandleError> {
    conn.execute_batch(sql)?;
    Ok(())
}
