use std::time::Duration;

use rusqlite::{Connection, TransactionBehavior};
use serde::Deserialize;

use crate::error::SqlHandleError;

/// Options for opening a `SQLite` connection.
///
/// Deserializable so it can live in an application's config file:
/// ```rust
/// use sql_handle::sqlite::SqliteOptions;
///
/// let opts = SqliteOptions::from_json(r#"{"db_path": "app.db", "busy_timeout_ms": 5000}"#)?;
/// assert!(opts.wal);
/// # Ok::<(), sql_handle::SqlHandleError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Switch the journal to write-ahead logging.
    pub wal: bool,
    pub busy_timeout_ms: Option<u64>,
    pub foreign_keys: bool,
    /// Take the write lock at `BEGIN` instead of at the first write.
    pub immediate_transactions: bool,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            wal: true,
            busy_timeout_ms: None,
            foreign_keys: false,
            immediate_transactions: false,
        }
    }
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Parse options from JSON.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` for malformed or invalid input.
    pub fn from_json(json: &str) -> Result<Self, SqlHandleError> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| SqlHandleError::ConfigError(format!("invalid sqlite options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// Returns `SqlHandleError::ConfigError` when `db_path` is empty.
    pub fn validate(&self) -> Result<(), SqlHandleError> {
        if self.db_path.trim().is_empty() {
            return Err(SqlHandleError::ConfigError(
                "db_path must not be empty".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn transaction_behavior(&self) -> TransactionBehavior {
        if self.immediate_transactions {
            TransactionBehavior::Immediate
        } else {
            TransactionBehavior::Deferred
        }
    }

    pub(crate) fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        if self.wal {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            tracing::debug!(journal_mode = %mode, "journal mode set");
        }
        if let Some(ms) = self.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(ms))?;
        }
        if self.foreign_keys {
            conn.pragma_update(None, "foreign_keys", true)?;
        }
        Ok(())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.opts.foreign_keys = enabled;
        self
    }

    #[must_use]
    pub fn immediate_transactions(mut self, immediate: bool) -> Self {
        self.opts.immediate_transactions = immediate;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a connection with the built options.
    ///
    /// # Errors
    /// See [`SqliteConnection::open`](super::SqliteConnection::open).
    pub fn open(self) -> Result<super::SqliteConnection, SqlHandleError> {
        super::SqliteConnection::open(&self.finish())
    }
}
