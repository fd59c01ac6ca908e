use std::sync::Arc;

use rusqlite::types::Value;

use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::worker::{Command, PreparedInfo, SqliteWorker};

/// Shared handle to one in-memory `SQLite` database served by its own worker thread.
///
/// The worker stops, and the database is released, once the last handle is dropped.
#[derive(Clone)]
pub struct SqliteDatabase {
    worker: Arc<SqliteWorker>,
}

impl SqliteDatabase {
    pub(crate) fn spawn(conn: rusqlite::Connection) -> Result<Self, SqlBridgeError> {
        Ok(Self {
            worker: Arc::new(SqliteWorker::spawn(conn)?),
        })
    }

    pub(crate) fn prepare(&self, sql: &str) -> Result<PreparedInfo, SqlBridgeError> {
        self.worker.request(|respond_to| Command::Prepare {
            sql: sql.to_owned(),
            respond_to,
        })
    }

    pub(crate) fn bind(&self, id: u64, params: Vec<Value>) -> Result<(), SqlBridgeError> {
        self.worker.request(|respond_to| Command::Bind {
            id,
            params,
            respond_to,
        })
    }

    pub(crate) fn step(&self, id: u64) -> Result<Option<Vec<RowValues>>, SqlBridgeError> {
        self.worker
            .request(|respond_to| Command::Step { id, respond_to })
    }

    pub(crate) fn run(&self, id: u64, params: Vec<Value>) -> Result<(), SqlBridgeError> {
        self.worker.request(|respond_to| Command::Run {
            id,
            params,
            respond_to,
        })
    }

    /// Commands are served in order, so a later request on `id` sees the rewound statement.
    pub(crate) fn reset(&self, id: u64) -> Result<(), SqlBridgeError> {
        self.worker.send(Command::Reset { id })
    }

    pub(crate) fn finalize(&self, id: u64) {
        // a stopped worker has already dropped its statements
        let _ = self.worker.send(Command::Finalize { id });
    }

    pub(crate) fn execute_batch(&self, sql: &str) -> Result<Vec<ResultSet>, SqlBridgeError> {
        self.worker.request(|respond_to| Command::ExecuteBatch {
            sql: sql.to_owned(),
            respond_to,
        })
    }

    pub(crate) fn changes(&self) -> Result<u64, SqlBridgeError> {
        self.worker
            .request(|respond_to| Command::Changes { respond_to })
    }

    pub(crate) fn last_insert_rowid(&self) -> Result<i64, SqlBridgeError> {
        self.worker
            .request(|respond_to| Command::LastInsertRowid { respond_to })
    }
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("worker", &self.worker.name())
            .finish()
    }
}
