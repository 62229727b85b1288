use std::fmt;

use crate::error::{ErrorKind, SqlHandleError};
use crate::query::Query;
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::statement::Statement;
use crate::types::{ExecResult, RowValues};

/// Something that can run SQL: a live connection or an open transaction.
///
/// Statements borrow the handle that prepared them, so they cannot outlive
/// its session:
/// ```rust
/// # #[cfg(feature = "sqlite")] {
/// use sql_handle::prelude::*;
///
/// fn count<H: Handle>(h: &H) -> Result<i64, SqlHandleError> {
///     let mut n = 0_i64;
///     h.query_row("SELECT COUNT(*) FROM t", &[]).scan(&mut [&mut n])?;
///     Ok(n)
/// }
///
/// let conn = SqliteConnection::open_in_memory()?;
/// conn.execute_batch("CREATE TABLE t (a INTEGER)")?;
/// conn.exec("INSERT INTO t (a) VALUES (?)", &[RowValues::Int(1)])?;
/// assert_eq!(count(&conn)?, 1);
/// # }
/// # Ok::<(), sql_handle::SqlHandleError>(())
/// ```
pub trait Handle {
    type Statement<'a>: Statement
    where
        Self: 'a;

    /// Run a statement directly.
    ///
    /// The error is left unclassified ([`SqlHandleError::Driver`]); use
    /// [`Handle::insert`] / [`Handle::update`] or
    /// [`SqlHandleError::classify`] to attribute it.
    ///
    /// # Errors
    /// Returns the driver failure.
    fn exec(&self, query: &str, args: &[RowValues]) -> Result<ExecResult, SqlHandleError>;

    /// Prepare a reusable statement.
    ///
    /// # Errors
    /// Returns `SqlHandleError::StatementCreate` if the driver rejects the text.
    fn prepare(&self, query: &str) -> Result<Self::Statement<'_>, SqlHandleError>;

    /// Fetch a single row; failures surface on [`Row::scan`].
    fn query_row(&self, query: &str, args: &[RowValues]) -> Row;

    /// Fetch all rows; failures surface through [`Rows::err`](crate::Rows::err).
    fn query(&self, query: &str, args: &[RowValues]) -> ResultSetRows;

    /// [`Handle::exec`] taking a [`Query`].
    ///
    /// # Errors
    /// Returns the driver failure, unclassified.
    fn exec_query(&self, query: &Query) -> Result<ExecResult, SqlHandleError> {
        self.exec(query.text(), query.args())
    }

    /// Run an insert, classifying failures as [`ErrorKind::Insert`].
    ///
    /// # Errors
    /// Returns `SqlHandleError::Insert`.
    fn insert(&self, query: &Query) -> Result<ExecResult, SqlHandleError> {
        self.exec_query(query)
            .map_err(|err| err.classify(ErrorKind::Insert))
    }

    /// Run an update, classifying failures as [`ErrorKind::Update`].
    ///
    /// # Errors
    /// Returns `SqlHandleError::Update`.
    fn update(&self, query: &Query) -> Result<ExecResult, SqlHandleError> {
        self.exec_query(query)
            .map_err(|err| err.classify(ErrorKind::Update))
    }

    /// [`Handle::query_row`] taking a [`Query`].
    fn query_row_query(&self, query: &Query) -> Row {
        self.query_row(query.text(), query.args())
    }

    /// Prepare `query`, hand the statement to `f`, and close it whatever `f`
    /// returns.
    ///
    /// An error from `f` takes precedence over a close error.
    ///
    /// # Errors
    /// Prepare, close, or `f`'s own error.
    fn with_statement<'h, R, E, F>(&'h self, query: &str, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Self::Statement<'h>) -> Result<R, E>,
        E: From<SqlHandleError>,
    {
        let mut stmt = self.prepare(query)?;
        let outcome = f(&mut stmt);
        let closed = stmt.close();
        let value = outcome?;
        closed?;
        Ok(value)
    }
}

/// Lifecycle of a transaction. `Committed` and `RolledBack` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Committed,
    RolledBack,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxState::Open => "open",
            TxState::Committed => "committed",
            TxState::RolledBack => "rolled back",
        })
    }
}

/// A [`Handle`] with atomic commit/rollback.
///
/// Once the transaction leaves [`TxState::Open`], every operation fails with
/// [`SqlHandleError::TransactionDone`].
pub trait TransactionHandle: Handle {
    /// Make all work since the transaction began permanent.
    ///
    /// A failed commit leaves the transaction rolled back.
    ///
    /// # Errors
    /// Returns `SqlHandleError::TransactionCommit`, or `TransactionDone` if
    /// already finished.
    fn commit(&mut self) -> Result<(), SqlHandleError>;

    /// Discard all work since the transaction began.
    ///
    /// # Errors
    /// Returns `SqlHandleError::TransactionRollback`, or `TransactionDone` if
    /// already finished.
    fn rollback(&mut self) -> Result<(), SqlHandleError>;

    fn state(&self) -> TxState;
}

/// Run `f` inside `tx`: commit when it returns `Ok`, roll back when it
/// returns `Err`.
///
/// A rollback failure is logged and the error from `f` is returned.
///
/// # Errors
/// `f`'s error, or the commit error.
pub fn run_in_transaction<T, R, E, F>(mut tx: T, f: F) -> Result<R, E>
where
    T: TransactionHandle,
    F: FnOnce(&mut T) -> Result<R, E>,
    E: From<SqlHandleError>,
{
    match f(&mut tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if tx.state() == TxState::Open
                && let Err(rollback_err) = tx.rollback()
            {
                tracing::warn!(error = %rollback_err, "rollback after failed transaction body");
            }
            Err(err)
        }
    }
}
