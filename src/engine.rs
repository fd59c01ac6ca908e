//! The step-based engine contract the bridge drives.
//!
//! An engine exposes compiled statements that are advanced one step at a time and report
//! failures as errors. The bridge never inspects engine internals: it only sequences these
//! calls and translates their failures into the three channels the cursor caller expects.

use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

pub trait Engine: Send + Sync + 'static {
    /// One open database. Shared by every statement prepared against it.
    type Database: Send + Sync + 'static;
    /// One compiled statement. Owned by exactly one bridge statement.
    type Statement: Send + 'static;

    /// Create a new, empty database for `data_source`.
    ///
    /// # Errors
    /// Fails only when the engine cannot allocate a database.
    fn open_database(&self, data_source: &str) -> Result<Self::Database, SqlBridgeError>;

    /// Compile a single SQL statement.
    ///
    /// # Errors
    /// Fails when `sql` does not compile.
    fn prepare(&self, db: &Self::Database, sql: &str) -> Result<Self::Statement, SqlBridgeError>;

    /// Bind positional arguments. Returns `false` when the engine refuses the arguments.
    fn bind(&self, stmt: &mut Self::Statement, args: &[RowValues]) -> bool;

    /// Advance one step. `Ok(true)` means a row is available through [`Engine::get`].
    ///
    /// # Errors
    /// Any runtime failure raised while stepping.
    fn step(&self, stmt: &mut Self::Statement) -> Result<bool, SqlBridgeError>;

    /// The row produced by the most recent successful step.
    ///
    /// # Errors
    /// [`SqlBridgeError::NoCurrentRow`] when the last step did not produce a row.
    fn get(&self, stmt: &Self::Statement) -> Result<Vec<RowValues>, SqlBridgeError>;

    fn column_names(&self, stmt: &Self::Statement) -> Vec<String>;

    fn parameter_count(&self, stmt: &Self::Statement) -> usize;

    /// Bind `args` and run the statement to completion, discarding any rows.
    ///
    /// # Errors
    /// Binding or runtime failures.
    fn run(&self, stmt: &mut Self::Statement, args: &[RowValues]) -> Result<(), SqlBridgeError>;

    /// Rewind to the pre-bound state and clear bindings.
    fn reset(&self, stmt: &mut Self::Statement);

    /// Release the statement.
    ///
    /// # Errors
    /// When the engine reports it could not release the statement.
    fn free(&self, stmt: Self::Statement) -> Result<(), SqlBridgeError>;

    /// Run one or more `;`-separated statements directly against the database.
    ///
    /// # Errors
    /// The first compile or runtime failure; statements before it have already run.
    fn exec(&self, db: &Self::Database, sql: &str) -> Result<Vec<ResultSet>, SqlBridgeError>;

    /// Rows changed by the most recently completed write on this database.
    fn rows_modified(&self, db: &Self::Database) -> i64;

    /// Direct last-insert-rowid accessor, if the engine has one.
    fn last_insert_rowid(&self, _db: &Self::Database) -> Option<i64> {
        None
    }
}
