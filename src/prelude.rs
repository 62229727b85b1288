//! Convenient imports for common functionality.
//!
//! Brings the handle/statement traits into scope together with the value
//! types they exchange.

pub use crate::error::{DriverError, ErrorKind, SqlHandleError};
pub use crate::handle::{Handle, TransactionHandle, TxState, run_in_transaction};
pub use crate::query::Query;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::row::Row;
pub use crate::rows::{ResultSetRows, Rows};
pub use crate::scan::{FromRowValue, ScanTarget};
pub use crate::statement::Statement;
pub use crate::types::{BatchRow, ExecResult, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{
    SqliteConnection, SqliteOptions, SqlitePreparedStatement, SqliteTransaction,
};
