//! Convenient imports for common functionality.
//!
//! Brings the connection, statement and envelope types plus the process-wide registry into
//! scope with one `use`.

pub use crate::blocking::run_blocking;
pub use crate::config::{BridgeOptions, LastInsertRowidStrategy};
pub use crate::connection::Connection;
pub use crate::engine::Engine;
pub use crate::envelope::{ResultEnvelope, RunResult};
pub use crate::error::{ErrorDescriptor, SqlBridgeError};
pub use crate::registry::ConnectionRegistry;
pub use crate::results::{ResultSet, Row};
pub use crate::sqlite::SqliteEngine;
pub use crate::statement::{CursorState, PreparedStatement, QueryStatus};
pub use crate::types::RowValues;
