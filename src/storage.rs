//! Local persistence for projects and settings.
//!
//! Both records live as self-contained JSON documents in a single `SQLite`
//! key-value table, one named slot each:
//!
//! ```text
//! <root>/forge.sqlite
//!   slots(name, document, updated_at)
//!     "projects"  -> [Project, ...]   most recent first
//!     "settings"  -> Settings
//! ```
//!
//! Reads are best-effort: a missing, unreadable, or malformed slot is
//! treated as "nothing saved" and logged.

mod projects;
mod settings;

use std::{fs, path::Path, path::PathBuf, time::Duration};

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::model::Project;

pub const PROJECTS_SLOT: &str = "projects";
pub const SETTINGS_SLOT: &str = "settings";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// The project record operations the workflow engine depends on.
pub trait ProjectRecords {
    /// Saves a new project at the front of the list.
    ///
    /// Fails rather than overwrite a saved list that cannot be read.
    fn create(&self, project: &Project) -> Result<()>;

    /// All projects, most recent first.
    fn list_all(&self) -> Result<Vec<Project>>;

    /// Applies `mutator` to every project with this name and saves the list.
    ///
    /// Matching is by name, not id: every saved project sharing the name is
    /// updated. Returns how many projects matched. Nothing is written when
    /// none match, or when the saved list cannot be read.
    fn update_by_name(&self, name: &str, mutator: &mut dyn FnMut(&mut Project)) -> Result<usize>;

    /// Removes the project with this id. Returns whether it existed.
    ///
    /// Nothing is written when the id is unknown.
    fn delete_by_id(&self, id: &str) -> Result<bool>;
}

/// `SQLite`-backed slot storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// A throwaway in-memory store.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// The default database path: `<forge home>/forge.sqlite`.
    pub fn default_path(home: &Path) -> PathBuf {
        home.join("forge.sqlite")
    }

    fn init(conn: Connection) -> Result<Self> {
        // A second `forge` process may hold the write lock briefly.
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS slots (
                name       TEXT PRIMARY KEY,
                document   TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Reads a slot's raw document, if present.
    pub fn read_raw(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT document FROM slots WHERE name = ?1",
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    /// Reads and decodes a slot. Any failure is logged and reads as `None`.
    pub fn read_slot<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let raw = match self.read_raw(name) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(slot = name, error = %e, "failed to read slot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(slot = name, error = %e, "ignoring malformed slot");
                None
            }
        }
    }

    /// Encodes and writes a slot, replacing any previous document.
    pub fn write_slot<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let document = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO slots (name, document, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE
             SET document = excluded.document, updated_at = excluded.updated_at",
            rusqlite::params![name, document, Timestamp::now().to_string()],
        )?;
        tracing::debug!(slot = name, "slot written");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn write_raw(&self, name: &str, document: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (name, document, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, document, Timestamp::now().to_string()],
        )?;
        Ok(())
    }
}
