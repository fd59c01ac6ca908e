use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use tracing::debug;

use crate::config::BridgeOptions;
use crate::connection::Connection;
use crate::engine::Engine;
use crate::error::SqlBridgeError;
use crate::sqlite::SqliteEngine;

/// Maps data-source identifiers to their single shared [`Connection`].
///
/// Opening an identifier that is already registered returns the existing connection
/// unchanged. Lookup and creation happen under one lock, so concurrent opens of a new
/// identifier still produce exactly one database.
pub struct ConnectionRegistry<E: Engine = SqliteEngine> {
    engine: Arc<E>,
    options: Arc<BridgeOptions>,
    connections: Mutex<HashMap<String, Connection<E>>>,
}

impl<E: Engine> std::fmt::Debug for ConnectionRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("options", &self.options)
            .field("open", &self.len())
            .finish_non_exhaustive()
    }
}

impl<E: Engine> ConnectionRegistry<E> {
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, BridgeOptions::default())
    }

    #[must_use]
    pub fn with_options(engine: E, options: BridgeOptions) -> Self {
        Self {
            engine: Arc::new(engine),
            options: Arc::new(options),
            connections: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Connection<E>>> {
        match self.connections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Return the connection registered for `data_source`, creating its database on first use.
    ///
    /// # Errors
    /// Returns `SqlBridgeError` only if the engine cannot create a database.
    pub fn open(&self, data_source: &str) -> Result<Connection<E>, SqlBridgeError> {
        let key = self.options.registry_key(data_source);
        let mut entries = self.entries();
        if let Some(conn) = entries.get(key) {
            debug!(data_source = key, "reusing open database");
            return Ok(conn.clone());
        }
        let db = self.engine.open_database(key)?;
        let conn = Connection::new(
            key.to_owned(),
            Arc::clone(&self.engine),
            db,
            Arc::clone(&self.options),
        );
        entries.insert(key.to_owned(), conn.clone());
        Ok(conn)
    }

    /// Drop the registry entry for `data_source`. Handles already given out keep working; the
    /// database is released once the last of them is dropped. A later `open` creates a fresh,
    /// empty database.
    pub fn evict(&self, data_source: &str) -> bool {
        let key = self.options.registry_key(data_source);
        let removed = self.entries().remove(key).is_some();
        debug!(data_source = key, removed, "evicting database");
        removed
    }

    #[must_use]
    pub fn contains(&self, data_source: &str) -> bool {
        self.entries()
            .contains_key(self.options.registry_key(data_source))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

static GLOBAL_REGISTRY: LazyLock<ConnectionRegistry<SqliteEngine>> =
    LazyLock::new(|| ConnectionRegistry::new(SqliteEngine::new()));

/// The process-wide registry over the default `SQLite` engine.
#[must_use]
pub fn global() -> &'static ConnectionRegistry<SqliteEngine> {
    &GLOBAL_REGISTRY
}

/// Open `data_source` in the process-wide registry.
///
/// # Errors
/// Returns `SqlBridgeError` if the engine cannot create the database.
pub fn open(data_source: &str) -> Result<Connection<SqliteEngine>, SqlBridgeError> {
    global().open(data_source)
}
