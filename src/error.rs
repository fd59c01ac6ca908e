use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlBridgeError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("No current row: step the statement before fetching")]
    NoCurrentRow,

    #[error("Other database error: {0}")]
    Other(String),
}

impl SqlBridgeError {
    /// Extended engine result code, when the failure came from the engine itself.
    #[must_use]
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            SqlBridgeError::SqliteError(rusqlite::Error::SqliteFailure(err, _)) => {
                Some(err.extended_code)
            }
            _ => None,
        }
    }
}

/// Flattened, engine-agnostic description of a failure carried inside a
/// [`ResultEnvelope`](crate::envelope::ResultEnvelope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub message: String,
    pub code: Option<i32>,
}

impl ErrorDescriptor {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

impl From<&SqlBridgeError> for ErrorDescriptor {
    fn from(err: &SqlBridgeError) -> Self {
        Self {
            message: err.to_string(),
            code: err.engine_code(),
        }
    }
}

impl From<SqlBridgeError> for ErrorDescriptor {
    fn from(err: SqlBridgeError) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorDescriptor {}
