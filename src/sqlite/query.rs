use rusqlite::types::Value;
use rusqlite::{Batch, Connection, Statement};

use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlBridgeError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlBridgeError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

fn read_row(row: &rusqlite::Row, column_count: usize) -> Result<Vec<RowValues>, SqlBridgeError> {
    (0..column_count)
        .map(|idx| sqlite_extract_value(row, idx))
        .collect()
}

/// Rewind `stmt` to before its first step. Bindings are kept.
pub(crate) fn rewind(stmt: &mut Statement<'_>) {
    // dropping `Rows` resets its statement
    drop(stmt.raw_query());
}

/// Rewind `stmt` and bind `params` positionally.
///
/// # Errors
/// Returns the engine error if a value cannot be bound.
pub(crate) fn bind_values(
    stmt: &mut Statement<'_>,
    params: &[Value],
) -> Result<(), SqlBridgeError> {
    rewind(stmt);
    for (idx, value) in params.iter().enumerate() {
        stmt.raw_bind_parameter(idx + 1, value)?;
    }
    Ok(())
}

/// Advance `stmt` by exactly one step and read the row it produced, if any.
///
/// `Rows` resets its statement on drop, so after a row it is forgotten to leave the engine
/// cursor in place for the next call. It holds only borrows. At the end of the rows, or on a
/// failure, rusqlite has already reset the statement.
///
/// # Errors
/// Returns the runtime failure raised by this step.
pub(crate) fn step_row(
    stmt: &mut Statement<'_>,
) -> Result<Option<Vec<RowValues>>, SqlBridgeError> {
    let column_count = stmt.column_count();
    let mut rows = stmt.raw_query();
    let values = match rows.next()? {
        Some(row) => read_row(row, column_count),
        None => return Ok(None),
    };
    std::mem::forget(rows);
    values.map(Some)
}

/// Rebind `stmt` and run it for effect, draining any rows it yields.
///
/// # Errors
/// Propagates the first binding or runtime failure.
pub(crate) fn run_to_completion(
    stmt: &mut Statement<'_>,
    params: &[Value],
) -> Result<(), SqlBridgeError> {
    bind_values(stmt, params)?;
    let mut rows = stmt.raw_query();
    while rows.next()?.is_some() {}
    Ok(())
}

/// Run every statement in `sql`, collecting a [`ResultSet`] for each statement that yielded at
/// least one row.
///
/// # Errors
/// Returns the first compile or runtime failure. Statements before it have already taken
/// effect.
pub(crate) fn exec_batch(conn: &Connection, sql: &str) -> Result<Vec<ResultSet>, SqlBridgeError> {
    let mut batch = Batch::new(conn, sql);
    let mut result_sets = Vec::new();

    while let Some(mut stmt) = batch.next()? {
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        let column_count = column_names.len();

        let mut result_set: Option<ResultSet> = None;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = read_row(row, column_count)?;
            result_set
                .get_or_insert_with(|| ResultSet::with_capacity(column_names.clone(), 10))
                .add_row_values(values);
        }
        if let Some(result_set) = result_set {
            result_sets.push(result_set);
        }
    }

    Ok(result_sets)
}
