//! Application state.

use crate::config::Config;
use crate::db::{DbError, SqliteProgressStore, SqliteRepository};
use std::sync::{Arc, Mutex, MutexGuard};

/// State shared by the CLI commands.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub config: Config,
}

impl AppState {
    pub fn new(repository: SqliteRepository, config: Config) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            config,
        }
    }

    /// Open the database named by `config`, creating its directory.
    pub fn open(config: Config) -> Result<Self, DbError> {
        if let Some(parent) = config.db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %e, "could not create data directory");
            }
        }
        tracing::debug!(path = %config.db_path.display(), "opening progress database");
        let repository = SqliteRepository::open(&config.db_path)?;
        Ok(Self::new(repository, config))
    }

    pub fn repo(&self) -> Result<MutexGuard<'_, SqliteRepository>, DbError> {
        self.repository.lock().map_err(|_| DbError::Poisoned)
    }

    /// Progress store for the configured profile.
    pub fn progress_store(&self) -> SqliteProgressStore {
        SqliteProgressStore::new(self.repository.clone(), self.config.profile.clone())
    }
}
