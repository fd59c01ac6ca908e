use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::{BridgeOptions, LastInsertRowidStrategy};
use crate::engine::Engine;
use crate::envelope::{ResultEnvelope, RunResult};
use crate::error::{ErrorDescriptor, SqlBridgeError};
use crate::results::ResultSet;
use crate::sqlite::SqliteEngine;
use crate::statement::PreparedStatement;
use crate::types::RowValues;

const LAST_INSERT_ROWID_SQL: &str = "SELECT last_insert_rowid()";

/// Handle to one open database, shared by every statement prepared against it.
///
/// Cloning is cheap and yields another handle to the same database; use
/// [`Connection::same_database`] to compare identity.
pub struct Connection<E: Engine = SqliteEngine> {
    inner: Arc<ConnectionInner<E>>,
}

struct ConnectionInner<E: Engine> {
    data_source: String,
    engine: Arc<E>,
    db: E::Database,
    options: Arc<BridgeOptions>,
    // Held across a write and the read-back of its connection-level counters.
    op_lock: Mutex<()>,
}

impl<E: Engine> Clone for Connection<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Engine> std::fmt::Debug for Connection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("data_source", &self.inner.data_source)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Connection<E> {
    pub(crate) fn new(
        data_source: String,
        engine: Arc<E>,
        db: E::Database,
        options: Arc<BridgeOptions>,
    ) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                data_source,
                engine,
                db,
                options,
                op_lock: Mutex::new(()),
            }),
        }
    }

    /// The registry key this connection was opened under.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.inner.data_source
    }

    /// `true` when both handles refer to the same engine database.
    #[must_use]
    pub fn same_database(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn database(&self) -> &E::Database {
        &self.inner.db
    }

    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.inner.options
    }

    pub(crate) fn engine(&self) -> &E {
        &self.inner.engine
    }

    pub(crate) fn lock_ops(&self) -> MutexGuard<'_, ()> {
        match self.inner.op_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Compile `sql` into a statement bound to this connection.
    ///
    /// # Errors
    /// Returns the engine's compile error. Preparation failures are never boxed.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement<E>, SqlBridgeError> {
        debug!(data_source = self.data_source(), sql, "preparing query");
        let raw = self.engine().prepare(&self.inner.db, sql)?;
        Ok(PreparedStatement::new(self.clone(), raw, sql))
    }

    /// Run one or more `;`-separated statements without arguments.
    ///
    /// Result sets are returned for statements that produced rows. Engine failures are boxed.
    pub fn exec_many(&self, sql: &str) -> ResultEnvelope<Vec<ResultSet>> {
        debug!(data_source = self.data_source(), sql, "executing script");
        let _guard = self.lock_ops();
        self.engine().exec(&self.inner.db, sql).into()
    }

    /// One-shot execution of `sql` with positional `args`.
    ///
    /// Trailing semicolons are ignored. Text that still holds a `;` is run as a script through
    /// the engine's multi-statement path, which takes no arguments. Otherwise the statement is
    /// prepared, executed and closed. Every failure, preparation included, is boxed.
    pub fn execute(&self, sql: &str, args: &[RowValues]) -> ResultEnvelope<RunResult> {
        let sql = sql.trim_end().trim_end_matches(';');
        if sql.contains(';') {
            if !args.is_empty() {
                return ResultEnvelope::err(ErrorDescriptor::new(format!(
                    "cannot exec multiple statements with placeholders, query: {sql} nargs={}",
                    args.len()
                )));
            }
            debug!(data_source = self.data_source(), sql, "executing script");
            let _guard = self.lock_ops();
            return self
                .engine()
                .exec(&self.inner.db, sql)
                .and_then(|_| self.run_result())
                .into();
        }

        let mut stmt = match self.prepare(sql) {
            Ok(stmt) => stmt,
            Err(err) => return ResultEnvelope::from(Err::<RunResult, _>(err)),
        };
        let outcome = stmt.exec(args);
        if let Err(err) = stmt.close() {
            warn!(error = %err, sql, "failed to free one-shot statement");
        }
        outcome
    }

    /// Rows changed by the most recently completed write on this connection.
    #[must_use]
    pub fn rows_modified(&self) -> i64 {
        self.engine().rows_modified(&self.inner.db)
    }

    /// Row id of the most recent successful insert on this connection.
    ///
    /// Only meaningful immediately after the write it describes: any other write on the same
    /// connection in between changes the answer. A connection with no inserts yet reports `0`.
    pub fn last_insert_rowid(&self) -> ResultEnvelope<i64> {
        let _guard = self.lock_ops();
        self.read_last_insert_rowid().into()
    }

    /// Read both connection-level counters. The caller must hold the operation lock.
    pub(crate) fn run_result(&self) -> Result<RunResult, SqlBridgeError> {
        let rows_affected = self.rows_modified();
        let last_insert_rowid = self.read_last_insert_rowid()?;
        Ok(RunResult {
            rows_affected,
            last_insert_rowid,
        })
    }

    fn read_last_insert_rowid(&self) -> Result<i64, SqlBridgeError> {
        if self.inner.options.last_insert_rowid == LastInsertRowidStrategy::Auto {
            if let Some(id) = self.engine().last_insert_rowid(&self.inner.db) {
                return Ok(id);
            }
        }
        let result_sets = self.engine().exec(&self.inner.db, LAST_INSERT_ROWID_SQL)?;
        scalar_rowid(&result_sets)
    }
}

/// Pull the row id out of the side query's output, which must be exactly one result set.
fn scalar_rowid(result_sets: &[ResultSet]) -> Result<i64, SqlBridgeError> {
    let [result_set] = result_sets else {
        return Err(SqlBridgeError::ExecutionError(format!(
            "last_insert_rowid: expected 1 result set, got {}",
            result_sets.len()
        )));
    };
    match result_set.scalar() {
        Some(RowValues::Int(id)) => Ok(*id),
        other => Err(SqlBridgeError::ExecutionError(format!(
            "last_insert_rowid: expected an integer, got {other:?}"
        ))),
    }
}
