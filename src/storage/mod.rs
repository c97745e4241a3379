//! Persistent high scores using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The `HighScoreStore` contract the round engine writes through
//! - An in-memory store for tests and for running without a database

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and high_scores tables
const SCHEMA_VERSION: u32 = 1;

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "anagrams.db";

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
    /// Stored value does not fit a score
    InvalidScore { key: String, value: i64 },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
            StorageError::InvalidScore { key, value } => {
                write!(f, "stored score {} for '{}' is out of range", value, key)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

/// Key-value persistence for best scores, one key per difficulty.
pub trait HighScoreStore {
    /// Read the stored best score, `None` if nothing was saved yet.
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError>;

    /// Overwrite the stored best score.
    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// High scores kept only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some scores already saved
    #[cfg(test)]
    pub fn with_scores<I, K>(scores: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            scores: scores.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError> {
        Ok(self.scores.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError> {
        self.scores.insert(key.to_string(), value);
        Ok(())
    }
}

/// The main storage handle for saved high scores.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories unless `data_dir` is given:
    /// - Linux: `$XDG_DATA_HOME/anagrams/` or `~/.local/share/anagrams/`
    /// - macOS: `~/Library/Application Support/anagrams/`
    pub fn open(data_dir: Option<&Path>) -> Result<Self, StorageError> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::data_dir()?,
        };

        // Ensure directory exists
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        let storage = Storage { conn };
        storage.initialize_schema()?;

        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "anagrams")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// All saved scores, sorted by key.
    pub fn all_high_scores(&self) -> Result<Vec<(String, u32)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, score FROM high_scores ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let score: i64 = row.get(1)?;
            Ok((key, score))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (key, score) = row?;
            let score = score_from_db(&key, score)?;
            result.push((key, score));
        }
        Ok(result)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            // Fresh database, create schema
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of the game
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        // Check if meta table exists
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version bookkeeping
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Best score per difficulty key
            CREATE TABLE IF NOT EXISTS high_scores (
                key TEXT PRIMARY KEY,
                score INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute("DELETE FROM meta", [])?;
        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

impl HighScoreStore for Storage {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError> {
        let score: Option<i64> = self
            .conn
            .query_row(
                "SELECT score FROM high_scores WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        score.map(|s| score_from_db(key, s)).transpose()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO high_scores (key, score, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET score = excluded.score, updated_at = excluded.updated_at",
            params![key, i64::from(value), now_millis()],
        )?;
        Ok(())
    }
}

fn score_from_db(key: &str, value: i64) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::InvalidScore {
        key: key.to_string(),
        value,
    })
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_missing_score_is_none() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get("highScoreEasy").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut storage = Storage::open_in_memory().unwrap();

        storage.set("highScoreEasy", 250).unwrap();
        assert_eq!(storage.get("highScoreEasy").unwrap(), Some(250));

        // Overwrite
        storage.set("highScoreEasy", 410).unwrap();
        assert_eq!(storage.get("highScoreEasy").unwrap(), Some(410));

        // Other keys untouched
        assert_eq!(storage.get("highScoreHard").unwrap(), None);
    }

    #[test]
    fn test_all_high_scores_sorted() {
        let mut storage = Storage::open_in_memory().unwrap();
        storage.set("highScoreMedium", 30).unwrap();
        storage.set("highScoreEasy", 120).unwrap();

        assert_eq!(
            storage.all_high_scores().unwrap(),
            vec![
                ("highScoreEasy".to_string(), 120),
                ("highScoreMedium".to_string(), 30)
            ]
        );
    }

    #[test]
    fn test_negative_score_rejected() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO high_scores (key, score, updated_at) VALUES ('bad', -5, 0)",
                [],
            )
            .unwrap();

        let result = storage.get("bad");
        assert!(matches!(result, Err(StorageError::InvalidScore { value: -5, .. })));
    }

    #[test]
    fn test_future_schema_refused() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute("UPDATE meta SET schema_version = 99", [])
            .unwrap();

        let result = storage.initialize_schema();
        assert!(matches!(
            result,
            Err(StorageError::FutureSchemaVersion { found: 99, supported: SCHEMA_VERSION })
        ));
    }

    #[test]
    fn test_open_in_directory_persists() {
        let dir = std::env::temp_dir().join(format!("anagrams-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        {
            let mut storage = Storage::open(Some(&dir)).unwrap();
            storage.set("highScoreMedium", 77).unwrap();
        }
        {
            let storage = Storage::open(Some(&dir)).unwrap();
            assert_eq!(storage.get("highScoreMedium").unwrap(), Some(77));
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_data_dir() {
        // Should succeed on supported platforms
        if let Ok(dir) = Storage::data_dir() {
            assert!(dir.ends_with("anagrams"));
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with_scores([("highScoreHard", 90)]);
        assert_eq!(store.get("highScoreHard").unwrap(), Some(90));
        assert_eq!(store.get("highScoreEasy").unwrap(), None);

        store.set("highScoreEasy", 10).unwrap();
        assert_eq!(store.get("highScoreEasy").unwrap(), Some(10));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut boxed: Box<dyn HighScoreStore> = Box::new(MemoryStore::new());
        boxed.set("k", 5).unwrap();
        assert_eq!(boxed.get("k").unwrap(), Some(5));
    }

    #[test]
    fn test_error_display() {
        let e = StorageError::FutureSchemaVersion { found: 3, supported: 1 };
        assert_eq!(
            e.to_string(),
            "database schema version 3 is newer than supported version 1"
        );
        assert_eq!(
            StorageError::NoDataDirectory.to_string(),
            "could not determine data directory"
        );
    }
}
