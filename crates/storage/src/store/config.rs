#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FILE_NAME: &str = "outline.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
const SYNCHRONOUS_MODES: &[&str] = &["OFF", "NORMAL", "FULL", "EXTRA"];

/// Where the durable file lives and how the connection is tuned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    pub file_name: String,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| StoreError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `OUTLINE_STORAGE_DIR`, `OUTLINE_DB_FILE` and
    /// `OUTLINE_BUSY_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, StoreError> {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os("OUTLINE_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Ok(file_name) = std::env::var("OUTLINE_DB_FILE") {
            config.file_name = file_name;
        }
        if let Ok(raw) = std::env::var("OUTLINE_BUSY_TIMEOUT_MS") {
            config.busy_timeout_ms = raw.trim().parse().map_err(|_| {
                StoreError::InvalidConfig(format!("OUTLINE_BUSY_TIMEOUT_MS is not a number: {raw}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(&self.file_name)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        let file_name = self.file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(StoreError::InvalidConfig(format!(
                "file_name must be a plain file name: {:?}",
                self.file_name
            )));
        }
        if !JOURNAL_MODES.contains(&self.journal_mode.to_ascii_uppercase().as_str()) {
            return Err(StoreError::InvalidConfig(format!(
                "unsupported journal_mode: {}",
                self.journal_mode
            )));
        }
        if !SYNCHRONOUS_MODES.contains(&self.synchronous.to_ascii_uppercase().as_str()) {
            return Err(StoreError::InvalidConfig(format!(
                "unsupported synchronous: {}",
                self.synchronous
            )));
        }
        Ok(())
    }

    pub(crate) fn open_connection(&self) -> Result<Connection, StoreError> {
        self.validate()?;
        std::fs::create_dir_all(&self.storage_dir)?;

        let conn = Connection::open(self.db_path())?;
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        let journal_mode = self.journal_mode.to_ascii_uppercase();
        let _applied: String = conn.pragma_update_and_check(None, "journal_mode", &journal_mode, |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", self.synchronous.to_ascii_uppercase())?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = StoreConfig::from_json_str(r#"{"storage_dir":"/tmp/outline"}"#).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/outline"));
        assert_eq!(config.file_name, "outline.db");
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/outline/outline.db"));
    }

    #[test]
    fn pragmas_are_checked_against_allow_list() {
        let err = StoreConfig::from_json_str(r#"{"journal_mode":"WAL; DROP TABLE nodes"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
        let err = StoreConfig::from_json_str(r#"{"file_name":"../escape.db"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
        assert!(StoreConfig::from_json_str(r#"{"synchronous":"full"}"#).is_ok());
    }
}
