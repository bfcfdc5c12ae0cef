//! Application state: a cloneable handle to the catalog database.
//!
//! [`AppState`] holds no connection. Each request opens its own
//! [`SqliteStore`] through [`Database::run`], which runs the storage work on
//! tokio's blocking pool and drops the connection when the closure returns,
//! whether it succeeded or not.

use std::sync::Arc;

use pizzeria_storage::{SqliteStore, StorageError};
use uuid::Uuid;

use crate::error::ApiError;

/// Handle to the SQLite database file backing the catalog.
#[derive(Debug, Clone)]
pub struct Database {
    path: Arc<str>,
    /// Set for throwaway databases; the files go when the last clone drops.
    scratch: Option<Arc<ScratchFiles>>,
}

impl Database {
    /// Opens `path` once, applying pending migrations, and returns a handle.
    pub fn migrate(path: &str) -> Result<Self, ApiError> {
        SqliteStore::new(path)
            .map_err(|e| ApiError::InternalError(format!("failed to open database: {}", e)))?;
        Ok(Database {
            path: path.into(),
            scratch: None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs `work` against a connection scoped to this call.
    pub async fn run<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteStore) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.path);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut store = SqliteStore::connect(&path)?;
            work(&mut store)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("storage task failed: {}", e)))?;
        Ok(outcome?)
    }
}

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Creates a new `AppState` backed by the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        Ok(AppState {
            db: Database::migrate(db_path)?,
        })
    }

    /// Creates a new `AppState` on a fresh temporary database (for testing).
    ///
    /// A plain `:memory:` database would not survive between the
    /// per-request connections, so this uses a uniquely named temp file.
    ///
    /// The file and its `-wal`/`-shm` companions are deleted once every clone
    /// of the state has been dropped.
    pub fn in_memory() -> Result<Self, ApiError> {
        let temp_path = std::env::temp_dir()
            .join(format!("pizzeria_{}.db", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        // Created first so a failed migration still cleans up.
        let scratch = Arc::new(ScratchFiles {
            path: temp_path.clone(),
        });
        let mut db = Database::migrate(&temp_path)?;
        db.scratch = Some(scratch);
        Ok(AppState { db })
    }
}

/// A temporary database file removed on drop.
#[derive(Debug)]
struct ScratchFiles {
    path: String,
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let file = format!("{}{}", self.path, suffix);
            if let Err(e) = std::fs::remove_file(&file) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %file, "failed to remove temporary database: {}", e);
                }
            }
        }
    }
}
