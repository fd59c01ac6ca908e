//! Cursor-style driver bridge over a step-based embedded SQL engine.
//!
//! A host driver written against `open / prepare / exec / query / next / columns / reset /
//! close` drives an engine whose statements advance one step at a time and report failures
//! as errors. Failures reach the driver through three deliberately separate channels:
//!
//! - `Err(SqlBridgeError)` for caller-contract problems such as SQL that does not compile;
//! - [`QueryStatus::BindRejected`] when the engine refuses query arguments;
//! - [`ResultEnvelope`] for runtime failures of `exec`, `exec_many`, `execute` and
//!   `last_insert_rowid`, which callers are expected to inspect as data.
//!
//! ```rust
//! use sql_cursor_bridge::prelude::*;
//!
//! # fn main() -> Result<(), SqlBridgeError> {
//! let conn = sql_cursor_bridge::open("doc-a")?;
//! assert!(conn.exec_many("CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)").is_ok());
//!
//! let mut insert = conn.prepare("INSERT INTO t(v) VALUES (?)")?;
//! assert!(insert.exec(&[RowValues::Text("x".into())]).is_ok());
//! assert_eq!(conn.last_insert_rowid().result(), Some(&1));
//!
//! let mut select = conn.prepare("SELECT v FROM t")?;
//! assert!(select.query(&[])?.has_row());
//! let row = select.next()?.expect("one row");
//! assert_eq!(row.values, vec![RowValues::Text("x".into())]);
//! assert!(select.next()?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod config;
pub mod connection;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod results;
pub mod sqlite;
pub mod statement;
pub mod types;

pub use blocking::run_blocking;
pub use config::{BridgeOptions, BridgeOptionsBuilder, LastInsertRowidStrategy};
pub use connection::Connection;
pub use engine::Engine;
pub use envelope::{ResultEnvelope, RunResult};
pub use error::{ErrorDescriptor, SqlBridgeError};
pub use registry::{ConnectionRegistry, open};
pub use results::{ColumnNames, ResultSet, Row};
pub use sqlite::{SqliteEngine, SqliteEngineBuilder};
pub use statement::{CursorState, PreparedStatement, QueryStatus};
pub use types::RowValues;
