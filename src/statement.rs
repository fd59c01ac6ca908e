//! Cursor protocol over a step-based statement.
//!
//! The engine only learns whether a row exists by stepping, so the statement reads one step
//! ahead: `query` performs the first step, and each `next` hands out the row that step
//! produced before stepping again to decide whether another `next` will have anything.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::engine::Engine;
use crate::envelope::{ResultEnvelope, RunResult};
use crate::error::SqlBridgeError;
use crate::results::{ColumnNames, Row};
use crate::sqlite::SqliteEngine;
use crate::types::RowValues;

/// Outcome of [`PreparedStatement::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    /// The first step produced a row; `next` will return it.
    Row,
    /// The statement produced no rows.
    Done,
    /// The engine refused the arguments; the statement was not stepped.
    BindRejected,
}

impl QueryStatus {
    /// The boolean a cursor caller sees: is a row available?
    #[must_use]
    pub fn has_row(self) -> bool {
        matches!(self, QueryStatus::Row)
    }
}

/// Observable cursor position of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Not queried since prepare, reset or exec.
    Unset,
    /// The last step produced a row that has not been fetched.
    RowPending,
    /// The last step reported the end of the rows.
    Exhausted,
    /// The read-ahead step failed; the next `next` call reports it.
    Faulted,
}

enum Cursor {
    Unset,
    RowPending,
    Exhausted,
    Faulted(SqlBridgeError),
}

impl Cursor {
    fn state(&self) -> CursorState {
        match self {
            Cursor::Unset => CursorState::Unset,
            Cursor::RowPending => CursorState::RowPending,
            Cursor::Exhausted => CursorState::Exhausted,
            Cursor::Faulted(_) => CursorState::Faulted,
        }
    }
}

/// A compiled statement with its cursor state.
///
/// Every operation takes `&mut self`, so one statement serves one caller at a time.
/// [`PreparedStatement::close`] consumes the handle; dropping it without closing releases the
/// engine statement as well.
pub struct PreparedStatement<E: Engine = SqliteEngine> {
    conn: Connection<E>,
    raw: E::Statement,
    sql: Arc<str>,
    columns: Arc<ColumnNames>,
    cursor: Cursor,
}

impl<E: Engine> std::fmt::Debug for PreparedStatement<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("data_source", &self.conn.data_source())
            .field("sql", &self.sql)
            .field("state", &self.cursor.state())
            .finish_non_exhaustive()
    }
}

impl<E: Engine> PreparedStatement<E> {
    pub(crate) fn new(conn: Connection<E>, raw: E::Statement, sql: &str) -> Self {
        let columns = Arc::new(ColumnNames::new(conn.engine().column_names(&raw)));
        Self {
            conn,
            raw,
            sql: Arc::from(sql),
            columns,
            cursor: Cursor::Unset,
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn connection(&self) -> &Connection<E> {
        &self.conn
    }

    #[must_use]
    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    #[must_use]
    pub fn has_pending_row(&self) -> bool {
        matches!(self.cursor, Cursor::RowPending)
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.conn.engine().parameter_count(&self.raw)
    }

    /// Column names of the statement's result shape. Available before any step.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.columns.as_slice()
    }

    /// Bind `args` and run the statement to completion for its side effect.
    ///
    /// Rows affected and the last insert row id are read back before the connection's
    /// operation lock is released. Engine failures, including an argument count mismatch,
    /// are boxed; the connection stays usable afterwards.
    pub fn exec(&mut self, args: &[RowValues]) -> ResultEnvelope<RunResult> {
        debug!(sql = %self.sql, ?args, "executing statement");
        self.cursor = Cursor::Unset;
        let _guard = self.conn.lock_ops();
        let engine = self.conn.engine();
        engine
            .run(&mut self.raw, args)
            .and_then(|()| self.conn.run_result())
            .into()
    }

    /// Bind `args` and perform the first step.
    ///
    /// # Errors
    /// Returns the engine error when the first step fails. A refused bind is not an error:
    /// it is reported as [`QueryStatus::BindRejected`] and leaves the cursor exhausted.
    pub fn query(&mut self, args: &[RowValues]) -> Result<QueryStatus, SqlBridgeError> {
        debug!(sql = %self.sql, ?args, "querying statement");
        let engine = self.conn.engine();
        if !engine.bind(&mut self.raw, args) {
            self.cursor = Cursor::Exhausted;
            return Ok(QueryStatus::BindRejected);
        }
        match engine.step(&mut self.raw) {
            Ok(true) => {
                self.cursor = Cursor::RowPending;
                Ok(QueryStatus::Row)
            }
            Ok(false) => {
                self.cursor = Cursor::Exhausted;
                Ok(QueryStatus::Done)
            }
            Err(err) => {
                self.cursor = Cursor::Exhausted;
                Err(err)
            }
        }
    }

    /// Fetch the pending row, then step once more.
    ///
    /// Returns `Ok(None)` when no row is pending, and keeps doing so on further calls.
    ///
    /// # Errors
    /// When the read-ahead step after a fetched row failed, that row is still returned and the
    /// failure is reported by the following call; the cursor is exhausted afterwards.
    pub fn next(&mut self) -> Result<Option<Row>, SqlBridgeError> {
        match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::RowPending => {
                let engine = self.conn.engine();
                let values = engine.get(&self.raw)?;
                self.cursor = match engine.step(&mut self.raw) {
                    Ok(true) => Cursor::RowPending,
                    Ok(false) => Cursor::Exhausted,
                    Err(err) => {
                        warn!(sql = %self.sql, error = %err, "read-ahead step failed");
                        Cursor::Faulted(err)
                    }
                };
                Ok(Some(Row::new(Arc::clone(&self.columns), values)))
            }
            Cursor::Faulted(err) => Err(err),
            idle => {
                self.cursor = idle;
                Ok(None)
            }
        }
    }

    /// Rewind to the pre-bound state so the statement can be queried again.
    pub fn reset(&mut self) {
        debug!(sql = %self.sql, "resetting statement");
        self.conn.engine().reset(&mut self.raw);
        self.cursor = Cursor::Unset;
    }

    /// Release the engine statement.
    ///
    /// # Errors
    /// Returns the engine error if it could not release the statement.
    pub fn close(self) -> Result<(), SqlBridgeError> {
        debug!(sql = %self.sql, "closing statement");
        let Self { conn, raw, .. } = self;
        conn.engine().free(raw)
    }
}
