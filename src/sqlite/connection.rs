use std::fmt;

use rusqlite::{Connection, TransactionBehavior};

use crate::error::SqlHandleError;
use crate::handle::{Handle, run_in_transaction};
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::types::{ExecResult, RowValues};

use super::config::SqliteOptions;
use super::executor;
use super::prepared::SqlitePreparedStatement;
use super::transaction::{SqliteTransaction, behavior_label};

/// A standalone `SQLite` session.
pub struct SqliteConnection {
    conn: Connection,
    tx_behavior: TransactionBehavior,
}

impl SqliteConnection {
    /// Wrap a connection opened elsewhere.
    #[must_use]
    pub fn from_rusqlite(conn: Connection) -> Self {
        Self {
            conn,
            tx_behavior: TransactionBehavior::Deferred,
        }
    }

    /// Open the database described by `opts` and apply its pragmas.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` for invalid options and
    /// `SqlHandleError::Connection` if the database cannot be opened or
    /// configured.
    pub fn open(opts: &SqliteOptions) -> Result<Self, SqlHandleError> {
        opts.validate()?;
        let conn = Connection::open(&opts.db_path)
            .map_err(|e| SqlHandleError::Connection(e.into()))?;
        opts.apply(&conn)
            .map_err(|e| SqlHandleError::Connection(e.into()))?;
        tracing::debug!(db_path = %opts.db_path, "sqlite connection opened");
        Ok(Self {
            conn,
            tx_behavior: opts.transaction_behavior(),
        })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns `SqlHandleError::Connection` if `SQLite` cannot allocate it.
    pub fn open_in_memory() -> Result<Self, SqlHandleError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SqlHandleError::Connection(e.into()))?;
        Ok(Self::from_rusqlite(conn))
    }

    /// Start a transaction; the connection is unusable until it finishes.
    ///
    /// # Errors
    /// Returns `SqlHandleError::TransactionBegin` if `BEGIN` fails.
    pub fn begin(&mut self) -> Result<SqliteTransaction<'_>, SqlHandleError> {
        SqliteTransaction::begin(&mut self.conn, self.tx_behavior)
    }

    /// Run `f` in a transaction, committing on `Ok` and rolling back on `Err`.
    ///
    /// # Errors
    /// Begin or commit failures, or the error returned by `f`.
    pub fn transaction<R, E, F>(&mut self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut SqliteTransaction<'_>) -> Result<R, E>,
        E: From<SqlHandleError>,
    {
        let tx = self.begin()?;
        run_in_transaction(tx, f)
    }

    /// Run a multi-statement script (DDL, seeding, pragmas).
    ///
    /// # Errors
    /// Returns the driver failure.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlHandleError> {
        executor::execute_batch(&self.conn, sql)
    }

    #[must_use]
    pub fn as_rusqlite(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .field("tx_behavior", &behavior_label(self.tx_behavior))
            .finish()
    }
}

impl Handle for SqliteConnection {
    type Statement<'a> = SqlitePreparedStatement<'a>;

    fn exec(&self, query: &str, args: &[RowValues]) -> Result<ExecResult, SqlHandleError> {
        executor::execute(&self.conn, query, args)
    }

    fn prepare(&self, query: &str) -> Result<Self::Statement<'_>, SqlHandleError> {
        SqlitePreparedStatement::prepare(&self.conn, query)
    }

    fn query_row(&self, query: &str, args: &[RowValues]) -> Row {
        executor::query_row(&self.conn, query, args)
    }

    fn query(&self, query: &str, args: &[RowValues]) -> ResultSetRows {
        executor::query(&self.conn, query, args)
    }
}
