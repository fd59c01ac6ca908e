use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How `Connection::last_insert_rowid` obtains its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum LastInsertRowidStrategy {
    /// Use the engine's direct accessor when it has one, else fall back to the side query.
    #[default]
    Auto,
    /// Always issue `SELECT last_insert_rowid()` through `exec_many`.
    SideQuery,
}

/// Options shared by every connection handed out by a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    pub last_insert_rowid: LastInsertRowidStrategy,
    pub strip_file_prefix: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            last_insert_rowid: LastInsertRowidStrategy::Auto,
            strip_file_prefix: true,
        }
    }
}

impl BridgeOptions {
    #[must_use]
    pub fn builder() -> BridgeOptionsBuilder {
        BridgeOptionsBuilder::default()
    }

    /// Normalise a data-source identifier into its registry key.
    #[must_use]
    pub fn registry_key<'a>(&self, data_source: &'a str) -> &'a str {
        if self.strip_file_prefix {
            data_source.strip_prefix("file:").unwrap_or(data_source)
        } else {
            data_source
        }
    }
}

/// Fluent builder for [`BridgeOptions`].
#[derive(Debug, Clone, Default)]
pub struct BridgeOptionsBuilder {
    opts: BridgeOptions,
}

impl BridgeOptionsBuilder {
    #[must_use]
    pub fn last_insert_rowid(mut self, strategy: LastInsertRowidStrategy) -> Self {
        self.opts.last_insert_rowid = strategy;
        self
    }

    #[must_use]
    pub fn strip_file_prefix(mut self, strip: bool) -> Self {
        self.opts.strip_file_prefix = strip;
        self
    }

    #[must_use]
    pub fn finish(self) -> BridgeOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_prefix_is_stripped_by_default() {
        let opts = BridgeOptions::default();
        assert_eq!(opts.registry_key("file:test-1.db"), "test-1.db");
        assert_eq!(opts.registry_key("test-1.db"), "test-1.db");
    }

    #[test]
    fn builder_can_keep_the_prefix() {
        let opts = BridgeOptions::builder()
            .strip_file_prefix(false)
            .last_insert_rowid(LastInsertRowidStrategy::SideQuery)
            .finish();
        assert_eq!(opts.registry_key("file:a"), "file:a");
        assert_eq!(opts.last_insert_rowid, LastInsertRowidStrategy::SideQuery);
    }
}
