use std::fmt;

use thiserror::Error;

use crate::handle::TxState;

/// Error raised by the wrapped database driver, passed through unchanged.
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// Build a driver error from a plain message (useful for custom backends).
    pub fn other(msg: impl Into<String>) -> Self {
        DriverError::Other(msg.into())
    }
}

/// Operation category a failure is attributed to.
///
/// The kind is a classification hint; the driver's own error is kept as the
/// error source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Insert,
    Select,
    Update,
    StatementCreate,
    StatementClose,
    StatementExec,
    TransactionBegin,
    TransactionCommit,
    TransactionRollback,
    Connection,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Insert => "insert",
            ErrorKind::Select => "select",
            ErrorKind::Update => "update",
            ErrorKind::StatementCreate => "statement create",
            ErrorKind::StatementClose => "statement close",
            ErrorKind::StatementExec => "statement exec",
            ErrorKind::TransactionBegin => "transaction begin",
            ErrorKind::TransactionCommit => "transaction commit",
            ErrorKind::TransactionRollback => "transaction rollback",
            ErrorKind::Connection => "connection",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum SqlHandleError {
    #[error("SQL insert failed: {0}")]
    Insert(#[source] DriverError),

    #[error("SQL select failed: {0}")]
    Select(#[source] DriverError),

    #[error("SQL update failed: {0}")]
    Update(#[source] DriverError),

    #[error("SQL create statement failed: {0}")]
    StatementCreate(#[source] DriverError),

    #[error("SQL close statement failed: {0}")]
    StatementClose(#[source] DriverError),

    #[error("SQL execute statement failed: {0}")]
    StatementExec(#[source] DriverError),

    #[error("SQL transaction begin failed: {0}")]
    TransactionBegin(#[source] DriverError),

    #[error("SQL transaction commit failed: {0}")]
    TransactionCommit(#[source] DriverError),

    #[error("SQL transaction rollback failed: {0}")]
    TransactionRollback(#[source] DriverError),

    #[error("SQL connection failed: {0}")]
    Connection(#[source] DriverError),

    /// Driver failure not yet attributed to an operation category.
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("no rows in result set")]
    NoRows,

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("statement is closed")]
    StatementClosed,

    #[error("transaction has already been {0}")]
    TransactionDone(TxState),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for SqlHandleError {
    fn from(err: rusqlite::Error) -> Self {
        SqlHandleError::Driver(DriverError::SqliteError(err))
    }
}

impl SqlHandleError {
    /// Wrap a driver error in the variant for `kind`.
    #[must_use]
    pub fn from_driver(kind: ErrorKind, err: DriverError) -> Self {
        match kind {
            ErrorKind::Insert => SqlHandleError::Insert(err),
            ErrorKind::Select => SqlHandleError::Select(err),
            ErrorKind::Update => SqlHandleError::Update(err),
            ErrorKind::StatementCreate => SqlHandleError::StatementCreate(err),
            ErrorKind::StatementClose => SqlHandleError::StatementClose(err),
            ErrorKind::StatementExec => SqlHandleError::StatementExec(err),
            ErrorKind::TransactionBegin => SqlHandleError::TransactionBegin(err),
            ErrorKind::TransactionCommit => SqlHandleError::TransactionCommit(err),
            ErrorKind::TransactionRollback => SqlHandleError::TransactionRollback(err),
            ErrorKind::Connection => SqlHandleError::Connection(err),
        }
    }

    /// Category of the failed operation, if the error came from the driver and
    /// has been classified.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            SqlHandleError::Insert(_) => Some(ErrorKind::Insert),
            SqlHandleError::Select(_) => Some(ErrorKind::Select),
            SqlHandleError::Update(_) => Some(ErrorKind::Update),
            SqlHandleError::StatementCreate(_) => Some(ErrorKind::StatementCreate),
            SqlHandleError::StatementClose(_) => Some(ErrorKind::StatementClose),
            SqlHandleError::StatementExec(_) => Some(ErrorKind::StatementExec),
            SqlHandleError::TransactionBegin(_) => Some(ErrorKind::TransactionBegin),
            SqlHandleError::TransactionCommit(_) => Some(ErrorKind::TransactionCommit),
            SqlHandleError::TransactionRollback(_) => Some(ErrorKind::TransactionRollback),
            SqlHandleError::Connection(_) => Some(ErrorKind::Connection),
            _ => None,
        }
    }

    /// Re-tag a driver failure with the caller's semantic category.
    ///
    /// Errors that did not originate in the driver (`NoRows`, `Scan`, ...) are
    /// returned unchanged.
    #[must_use]
    pub fn classify(self, kind: ErrorKind) -> Self {
        match self.into_driver_error() {
            Ok(err) => Self::from_driver(kind, err),
            Err(other) => other,
        }
    }

    /// Borrow the underlying driver error, if any.
    #[must_use]
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            SqlHandleError::Insert(e)
            | SqlHandleError::Select(e)
            | SqlHandleError::Update(e)
            | SqlHandleError::StatementCreate(e)
            | SqlHandleError::StatementClose(e)
            | SqlHandleError::StatementExec(e)
            | SqlHandleError::TransactionBegin(e)
            | SqlHandleError::TransactionCommit(e)
            | SqlHandleError::TransactionRollback(e)
            | SqlHandleError::Connection(e)
            | SqlHandleError::Driver(e) => Some(e),
            _ => None,
        }
    }

    /// True when a single-row fetch matched nothing.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, SqlHandleError::NoRows)
    }

    fn into_driver_error(self) -> Result<DriverError, Self> {
        match self {
            SqlHandleError::Insert(e)
            | SqlHandleError::Select(e)
            | SqlHandleError::Update(e)
            | SqlHandleError::StatementCreate(e)
            | SqlHandleError::StatementClose(e)
            | SqlHandleError::StatementExec(e)
            | SqlHandleError::TransactionBegin(e)
            | SqlHandleError::TransactionCommit(e)
            | SqlHandleError::TransactionRollback(e)
            | SqlHandleError::Connection(e)
            | SqlHandleError::Driver(e) => Ok(e),
            other => Err(other),
        }
    }
}
