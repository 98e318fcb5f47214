//! SQLite save file management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use super::schema;
use crate::solution::RecordError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Save file {0} not found")]
    NotFound(PathBuf),
    #[error("Failed to create directory: {0}")]
    CreateDir(std::io::Error),
    #[error("Lock poisoned")]
    LockPoisoned,
    #[error("Inconsistent solution rows: {0}")]
    Record(#[from] RecordError),
}

/// Connection to one of the game's SQLite files (a `<user>.user` save file
/// or `.locals`).
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    /// Path to the database file
    pub path: PathBuf,
}

impl Database {
    /// Open an existing file. The game owns these files, so nothing is
    /// created or migrated here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        if !path.is_file() {
            return Err(DatabaseError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "Opened save file");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Open or create a save file with the empty game tables in place.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        Self::create_with(path.into(), schema::ensure_schema)
    }

    /// Open or create a `.locals` file with the user table in place.
    pub fn create_locals(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        Self::create_with(path.into(), schema::ensure_locals_schema)
    }

    fn create_with(
        path: PathBuf,
        ensure: fn(&mut Connection) -> rusqlite::Result<()>,
    ) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DatabaseError::CreateDir)?;
        }

        let mut conn = Connection::open(&path)?;
        ensure(&mut conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Get a reference to the connection (for stores)
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    /// Execute a closure with the connection
    pub fn with_connection<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn).map_err(DatabaseError::Sqlite)
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish()
    }
}

pub(crate) fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
    conn.lock().map_err(|_| DatabaseError::LockPoisoned)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
