//! Handle, statement, and row abstractions over a database driver.
//!
//! Code written against [`Handle`] runs unchanged on a live connection or an
//! open transaction; every operation is forwarded to the driver as-is. The
//! `sqlite` feature (on by default) provides the rusqlite-backed
//! implementation.
//!
//! ```rust
//! # #[cfg(feature = "sqlite")] {
//! use sql_handle::prelude::*;
//!
//! let mut conn = SqliteConnection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE t (a INTEGER, b TEXT)")?;
//!
//! conn.transaction(|tx| {
//!     tx.with_statement("INSERT INTO t (a, b) VALUES (?, ?)", |stmt| {
//!         stmt.batch_insert(&[
//!             BatchRow(vec![1.into(), "x".into()]),
//!             BatchRow(vec![2.into(), "y".into()]),
//!         ])
//!     })
//! })?;
//!
//! let mut total = 0_i64;
//! conn.query_row("SELECT SUM(a) FROM t", &[]).scan(&mut [&mut total])?;
//! assert_eq!(total, 3);
//! # }
//! # Ok::<(), sql_handle::SqlHandleError>(())
//! ```

pub mod error;
pub mod handle;
pub mod prelude;
pub mod query;
pub mod results;
pub mod row;
pub mod rows;
pub mod scan;
pub mod statement;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{DriverError, ErrorKind, SqlHandleError};
pub use handle::{Handle, TransactionHandle, TxState, run_in_transaction};
pub use query::Query;
pub use results::{CustomDbRow, ResultSet};
pub use row::Row;
pub use rows::{ResultSetRows, Rows};
pub use scan::{FromRowValue, ScanTarget};
pub use statement::Statement;
pub use types::{BatchRow, ExecResult, RowValues};
