use std::sync::Arc;

use crate::types::RowValues;

use super::SqliteDatabase;
use super::worker::PreparedInfo;

/// Handle to a statement compiled on the database's worker thread.
///
/// The engine cursor lives on the worker; this handle keeps the statement id, the shape reported
/// at prepare time and the row fetched by the most recent step. Dropping it finalises the
/// statement on the worker.
pub struct SqliteStatement {
    pub(super) db: SqliteDatabase,
    pub(super) id: u64,
    pub(super) sql: Arc<str>,
    pub(super) columns: Vec<String>,
    pub(super) parameter_count: usize,
    pub(super) current: Option<Vec<RowValues>>,
}

impl SqliteStatement {
    pub(super) fn new(db: SqliteDatabase, sql: &str, info: PreparedInfo) -> Self {
        Self {
            db,
            id: info.id,
            sql: Arc::from(sql),
            columns: info.columns,
            parameter_count: info.parameter_count,
            current: None,
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Drop for SqliteStatement {
    fn drop(&mut self) {
        self.db.finalize(self.id);
    }
}

impl std::fmt::Debug for SqliteStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStatement")
            .field("id", &self.id)
            .field("sql", &self.sql)
            .field("columns", &self.columns)
            .field("parameter_count", &self.parameter_count)
            .field("has_row", &self.current.is_some())
            .finish_non_exhaustive()
    }
}
