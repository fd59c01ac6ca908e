use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::config::SqliteEngine;
use super::database::SqliteDatabase;
use super::params::convert_params;
use super::statement::SqliteStatement;

impl Engine for SqliteEngine {
    type Database = SqliteDatabase;
    type Statement = SqliteStatement;

    fn open_database(&self, data_source: &str) -> Result<SqliteDatabase, SqlBridgeError> {
        let conn = rusqlite::Connection::open_in_memory().map_err(|e| {
            SqlBridgeError::ConnectionError(format!(
                "failed to create SQLite database for {data_source}: {e}"
            ))
        })?;
        if let Some(init) = &self.init_batch {
            conn.execute_batch(init)?;
        }
        let db = SqliteDatabase::spawn(conn)?;
        info!(data_source, ?db, "created in-memory SQLite database");
        Ok(db)
    }

    fn prepare(&self, db: &SqliteDatabase, sql: &str) -> Result<SqliteStatement, SqlBridgeError> {
        let info = db.prepare(sql)?;
        Ok(SqliteStatement::new(db.clone(), sql, info))
    }

    fn bind(&self, stmt: &mut SqliteStatement, args: &[RowValues]) -> bool {
        if args.len() != stmt.parameter_count {
            debug!(
                expected = stmt.parameter_count,
                got = args.len(),
                "bind refused: argument count mismatch"
            );
            return false;
        }
        stmt.current = None;
        match stmt.db.bind(stmt.id, convert_params(args)) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "bind refused by the engine");
                false
            }
        }
    }

    fn step(&self, stmt: &mut SqliteStatement) -> Result<bool, SqlBridgeError> {
        let stepped = stmt.db.step(stmt.id);
        match stepped {
            Ok(row) => {
                let has_row = row.is_some();
                stmt.current = row;
                Ok(has_row)
            }
            Err(err) => {
                stmt.current = None;
                Err(err)
            }
        }
    }

    fn get(&self, stmt: &SqliteStatement) -> Result<Vec<RowValues>, SqlBridgeError> {
        stmt.current.clone().ok_or(SqlBridgeError::NoCurrentRow)
    }

    fn column_names(&self, stmt: &SqliteStatement) -> Vec<String> {
        stmt.columns.clone()
    }

    fn parameter_count(&self, stmt: &SqliteStatement) -> usize {
        stmt.parameter_count
    }

    fn run(&self, stmt: &mut SqliteStatement, args: &[RowValues]) -> Result<(), SqlBridgeError> {
        if args.len() != stmt.parameter_count {
            return Err(SqlBridgeError::ParameterError(format!(
                "statement expects {} argument(s), got {}",
                stmt.parameter_count,
                args.len()
            )));
        }
        stmt.current = None;
        stmt.db.run(stmt.id, convert_params(args))
    }

    fn reset(&self, stmt: &mut SqliteStatement) {
        stmt.current = None;
        if let Err(err) = stmt.db.reset(stmt.id) {
            warn!(sql = stmt.sql(), error = %err, "failed to reset statement");
        }
    }

    fn free(&self, stmt: SqliteStatement) -> Result<(), SqlBridgeError> {
        debug!(sql = stmt.sql(), "freeing statement");
        drop(stmt);
        Ok(())
    }

    fn exec(&self, db: &SqliteDatabase, sql: &str) -> Result<Vec<ResultSet>, SqlBridgeError> {
        db.execute_batch(sql)
    }

    fn rows_modified(&self, db: &SqliteDatabase) -> i64 {
        match db.changes() {
            Ok(changes) => i64::try_from(changes).unwrap_or(i64::MAX),
            Err(err) => {
                warn!(error = %err, "cannot read rows modified");
                0
            }
        }
    }

    fn last_insert_rowid(&self, db: &SqliteDatabase) -> Option<i64> {
        match db.last_insert_rowid() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "cannot read last insert rowid directly");
                None
            }
        }
    }
}
