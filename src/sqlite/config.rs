/// Step engine over bundled `SQLite` (via `rusqlite`).
///
/// Every data source gets its own in-memory database; the data-source identifier is only a
/// registry key. An optional initialisation batch runs once on each new database.
#[derive(Debug, Clone, Default)]
pub struct SqliteEngine {
    pub(crate) init_batch: Option<String>,
}

impl SqliteEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> SqliteEngineBuilder {
        SqliteEngineBuilder::default()
    }

    #[must_use]
    pub fn init_batch(&self) -> Option<&str> {
        self.init_batch.as_deref()
    }
}

/// Fluent builder for [`SqliteEngine`].
#[derive(Debug, Clone, Default)]
pub struct SqliteEngineBuilder {
    engine: SqliteEngine,
}

impl SqliteEngineBuilder {
    /// SQL run against each newly created database, e.g. `PRAGMA foreign_keys = ON;`.
    #[must_use]
    pub fn init_batch(mut self, sql: impl Into<String>) -> Self {
        self.engine.init_batch = Some(sql.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteEngine {
        self.engine
    }
}
