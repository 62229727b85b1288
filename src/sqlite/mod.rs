// SQLite backend, forwarding every operation to rusqlite.
//
// - config: connection options and pragmas
// - params: RowValues -> rusqlite values
// - query: result extraction
// - executor: operations shared by connections and transactions
// - connection / transaction / prepared: the Handle and Statement implementations

pub mod config;
mod connection;
mod executor;
pub mod params;
mod prepared;
pub mod query;
mod transaction;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use params::Params;
pub use prepared::SqlitePreparedStatement;
pub use query::build_result_set;
pub use transaction::SqliteTransaction;
pub use rusqlite::TransactionBehavior;
