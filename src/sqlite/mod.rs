// SQLite engine - the rusqlite-backed implementation of the step engine contract
//
// - config: engine options and builder
// - database: shared handle to a database served by a worker thread
// - worker: the thread that owns the rusqlite connection and its live statements
// - statement: statement id plus the row of the latest step
// - params / query: value conversion and one-row stepping helpers
// - executor: the `Engine` impl tying them together

pub mod config;
pub mod database;
mod executor;
pub mod params;
pub mod query;
pub mod statement;
mod worker;

pub use config::{SqliteEngine, SqliteEngineBuilder};
pub use database::SqliteDatabase;
pub use statement::SqliteStatement;
