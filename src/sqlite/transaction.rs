use rusqlite::{Connection, TransactionBehavior};

use crate::error::SqlHandleError;
use crate::handle::{Handle, TransactionHandle, TxState};
use crate::row::Row;
use crate::rows::ResultSetRows;
use crate::types::{ExecResult, RowValues};

use super::executor;
use super::prepared::SqlitePreparedStatement;

pub(crate) fn behavior_label(behavior: TransactionBehavior) -> &'static str {
    match behavior {
        TransactionBehavior::Deferred => "deferred",
        TransactionBehavior::Immediate => "immediate",
        TransactionBehavior::Exclusive => "exclusive",
        _ => "other",
    }
}

/// Transaction handle borrowing its `SQLite` connection until it is finished.
///
/// Dropping a transaction that is still open rolls it back.
pub struct SqliteTransaction<'conn> {
    tx: Option<rusqlite::Transaction<'conn>>,
    state: TxState,
}

impl<'conn> SqliteTransaction<'conn> {
    pub(crate) fn begin(
        conn: &'conn mut Connection,
        behavior: TransactionBehavior,
    ) -> Result<Self, SqlHandleError> {
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(|e| SqlHandleError::TransactionBegin(e.into()))?;
        tracing::debug!(behavior = behavior_label(behavior), "transaction started");
        Ok(Self {
            tx: Some(tx),
            state: TxState::Open,
        })
    }

    fn active(&self) -> Result<&Connection, SqlHandleError> {
        self.tx
            .as_deref()
            .ok_or(SqlHandleError::TransactionDone(self.state))
    }

    /// Run a multi-statement script inside the transaction.
    ///
    /// # Errors
    /// Returns the driver failure, or `TransactionDone` once finished.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlHandleError> {
        executor::execute_batch(self.active()?, sql)
    }
}

impl Handle for SqliteTransaction<'_> {
    type Statement<'a>
        = SqlitePreparedStatement<'a>
    where
        Self: 'a;

    fn exec(&self, query: &str, args: &[RowValues]) -> Result<ExecResult, SqlHandleError> {
        executor::execute(self.active()?, query, args)
    }

    fn prepare(&self, query: &str) -> Result<Self::Statement<'_>, SqlHandleError> {
        SqlitePreparedStatement::prepare(self.active()?, query)
    }

    fn query_row(&self, query: &str, args: &[RowValues]) -> Row {
        match self.active() {
            Ok(conn) => executor::query_row(conn, query, args),
            Err(err) => Row::from_error(err),
        }
    }

    fn query(&self, query: &str, args: &[RowValues]) -> ResultSetRows {
        match self.active() {
            Ok(conn) => executor::query(conn, query, args),
            Err(err) => ResultSetRows::from_result(Err(err)),
        }
    }
}

impl TransactionHandle for SqliteTransaction<'_> {
    fn commit(&mut self) -> Result<(), SqlHandleError> {
        let tx = self
            .tx
            .take()
            .ok_or(SqlHandleError::TransactionDone(self.state))?;
        match tx.commit() {
            Ok(()) => {
                self.state = TxState::Committed;
                tracing::debug!("transaction committed");
                Ok(())
            }
            Err(e) => {
                // rusqlite rolls back when the failed transaction is dropped.
                self.state = TxState::RolledBack;
                Err(SqlHandleError::TransactionCommit(e.into()))
            }
        }
    }

    fn rollback(&mut self) -> Result<(), SqlHandleError> {
        let tx = self
            .tx
            .take()
            .ok_or(SqlHandleError::TransactionDone(self.state))?;
        self.state = TxState::RolledBack;
        tracing::debug!("transaction rolled back");
        tx.rollback()
            .map_err(|e| SqlHandleError::TransactionRollback(e.into()))
    }

    fn state(&self) -> TxState {
        self.state
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::debug!("open transaction dropped; rolling back");
        }
    }
}
