use std::sync::mpsc::Sender;

use rusqlite::types::Value;

use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

pub(crate) type Reply<T> = Sender<Result<T, SqlBridgeError>>;

/// What the worker reports back about a freshly compiled statement.
#[derive(Debug)]
pub(crate) struct PreparedInfo {
    pub(crate) id: u64,
    pub(crate) columns: Vec<String>,
    pub(crate) parameter_count: usize,
}

pub(crate) enum Command {
    Prepare {
        sql: String,
        respond_to: Reply<PreparedInfo>,
    },
    Bind {
        id: u64,
        params: Vec<Value>,
        respond_to: Reply<()>,
    },
    Step {
        id: u64,
        respond_to: Reply<Option<Vec<RowValues>>>,
    },
    Run {
        id: u64,
        params: Vec<Value>,
        respond_to: Reply<()>,
    },
    Reset {
        id: u64,
    },
    Finalize {
        id: u64,
    },
    ExecuteBatch {
        sql: String,
        respond_to: Reply<Vec<ResultSet>>,
    },
    Changes {
        respond_to: Reply<u64>,
    },
    LastInsertRowid {
        respond_to: Reply<i64>,
    },
}
