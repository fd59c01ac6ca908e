use std::sync::Arc;

use super::row::{ColumnNames, Row};
use crate::types::RowValues;

/// One result set produced by a multi-statement `exec_many` call.
///
/// Only statements that yielded at least one row produce a result set, so a script made of DDL
/// and DML alone returns an empty list.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub results: Vec<Row>,
    columns: Arc<ColumnNames>,
}

impl ResultSet {
    /// Create an empty result set for the given column shape with preallocated capacity.
    #[must_use]
    pub fn with_capacity(columns: Vec<String>, capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            columns: Arc::new(ColumnNames::new(columns)),
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.as_slice()
    }

    /// Add a row to the result set, sharing this set's column names.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results.push(Row::new(Arc::clone(&self.columns), row_values));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First column of the first row, the shape of a scalar query such as
    /// `SELECT last_insert_rowid()`.
    #[must_use]
    pub fn scalar(&self) -> Option<&RowValues> {
        self.results.first().and_then(|row| row.get_by_index(0))
    }
}
