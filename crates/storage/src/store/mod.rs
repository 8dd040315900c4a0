#![forbid(unsafe_code)]

mod cache;
mod cascade;
mod config;
mod error;
mod persist;
mod support;
mod table;
mod tables;

pub use cache::{Cache, KeyedTable, RelationTable};
pub use config::StoreConfig;
pub use error::StoreError;
pub use persist::FlushStats;
pub use table::{Layout, Table};
pub use tables::ATTR_HEADING;

pub(crate) use support::{now_unix, rfc3339};

use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Delta cache in front of an optional SQLite connection.
///
/// Reads never touch the connection; writes are recorded in the cache and
/// reach disk only through `create_on_disk` or `flush_delta_to_disk`.
/// Single-threaded: the façade owns both the cache and the connection.
#[derive(Debug, Default)]
pub struct Database {
    cache: Cache,
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Empty, detached store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.conn.is_some()
    }

    pub fn has_delta(&self) -> bool {
        self.cache.has_delta()
    }

    pub fn schema_version(&self) -> Result<Option<String>, StoreError> {
        let conn = self.conn.as_ref().ok_or(StoreError::NotAttached)?;
        support::schema_version(conn)
    }
}
