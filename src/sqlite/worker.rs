use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use tracing::debug;

use crate::error::SqlBridgeError;

mod channel;
mod dispatcher;

pub(crate) use channel::{Command, PreparedInfo, Reply};
use dispatcher::run_sqlite_worker;

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Dedicated thread owning one `rusqlite::Connection`.
///
/// Compiled statements borrow the connection and are `!Send`, so they live on this thread for
/// their whole life and are addressed by id. Commands are served in arrival order.
pub(crate) struct SqliteWorker {
    sender: Sender<Command>,
    name: String,
}

impl SqliteWorker {
    pub(crate) fn spawn(conn: rusqlite::Connection) -> Result<Self, SqlBridgeError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let name = format!(
            "sqlite-worker-{}",
            NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed)
        );
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                run_sqlite_worker(&conn, &receiver);
                debug!("SQLite worker stopped");
            })
            .map_err(|err| {
                SqlBridgeError::ConnectionError(format!(
                    "failed to spawn SQLite worker thread: {err}"
                ))
            })?;

        Ok(Self { sender, name })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn send(&self, command: Command) -> Result<(), SqlBridgeError> {
        self.sender
            .send(command)
            .map_err(|_| SqlBridgeError::ConnectionError("SQLite worker closed".into()))
    }

    /// Send a command carrying a reply channel and wait for the worker's answer.
    pub(crate) fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, SqlBridgeError> {
        let (tx, rx) = mpsc::channel();
        self.send(command(tx))?;
        rx.recv().map_err(|_| {
            SqlBridgeError::ConnectionError("SQLite worker dropped a pending request".into())
        })?
    }
}
