//! Result-or-error envelope returned by the operations whose engine failures are expected
//! (constraint violations, type mismatches) and must reach the driver as data.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ErrorDescriptor, SqlBridgeError};

/// `{result: T, error: null}` or `{result: null, error: ErrorDescriptor}`.
///
/// Exactly one side is populated when built through [`ResultEnvelope::ok`],
/// [`ResultEnvelope::err`] or [`From<Result<T, SqlBridgeError>>`].
///
/// ```rust
/// use sql_cursor_bridge::prelude::*;
///
/// let env: ResultEnvelope<i64> = ResultEnvelope::ok(7);
/// assert_eq!(serde_json::to_string(&env).unwrap(), r#"{"result":7,"error":null}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    result: Option<T>,
    error: Option<ErrorDescriptor>,
}

impl<T> ResultEnvelope<T> {
    #[must_use]
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn err(error: impl Into<ErrorDescriptor>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    /// Convert back into a `Result`.
    ///
    /// # Errors
    /// Returns the boxed [`ErrorDescriptor`] when the envelope carries one, or a descriptor
    /// noting the missing result for a malformed (deserialised) envelope.
    pub fn into_result(self) -> Result<T, ErrorDescriptor> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ErrorDescriptor::new("envelope carries neither result nor error")),
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            result: self.result.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Result<T, SqlBridgeError>> for ResultEnvelope<T> {
    fn from(outcome: Result<T, SqlBridgeError>) -> Self {
        match outcome {
            Ok(result) => Self::ok(result),
            Err(err) => {
                warn!(error = %err, "boxing engine error into envelope");
                Self::err(&err)
            }
        }
    }
}

/// Outcome of running a statement to completion for its side effect.
///
/// Both counters are read while the connection's operation lock is still held, so they
/// describe this run even when other handles share the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunResult {
    pub rows_affected: i64,
    pub last_insert_rowid: i64,
}
