use crate::connection::Connection;
use crate::engine::Engine;
use crate::error::SqlBridgeError;

/// Run synchronous bridge calls for `conn` on tokio's blocking pool.
///
/// The closure always runs to completion; dropping the returned future does not interrupt it.
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), sql_cursor_bridge::SqlBridgeError> {
/// use sql_cursor_bridge::prelude::*;
///
/// let conn = sql_cursor_bridge::open("async-demo")?;
/// let env = run_blocking(conn, |conn| Ok(conn.execute("CREATE TABLE t(a)", &[]))).await?;
/// assert!(env.is_ok());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns the closure's error, or `SqlBridgeError::ExecutionError` if the blocking task
/// panicked or was cancelled.
pub async fn run_blocking<E, F, R>(conn: Connection<E>, func: F) -> Result<R, SqlBridgeError>
where
    E: Engine,
    F: FnOnce(&Connection<E>) -> Result<R, SqlBridgeError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || func(&conn))
        .await
        .map_err(|e| {
            SqlBridgeError::ExecutionError(format!("bridge spawn_blocking join error: {e}"))
        })?
}
