use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// Column names of one result shape together with a name → position index.
///
/// Built once per compiled statement (or per `exec_many` result set) and shared by every row
/// it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnNames {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnNames {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // first occurrence wins for duplicated names (e.g. `SELECT a, a`)
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn position(&self, column_name: &str) -> Option<usize> {
        self.index.get(column_name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One row fetched through the cursor protocol.
///
/// `values` is the ordered column sequence the driver sees; the shared column names allow
/// lookups by name without copying them into each row.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<ColumnNames>,
    /// The values for this row, in column order
    pub values: Vec<RowValues>,
}

impl Row {
    #[must_use]
    pub fn new(columns: Arc<ColumnNames>, values: Vec<RowValues>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.as_slice()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<RowValues> {
        self.values
    }
}

impl PartialEq<Vec<RowValues>> for Row {
    fn eq(&self, other: &Vec<RowValues>) -> bool {
        &self.values == other
    }
}
