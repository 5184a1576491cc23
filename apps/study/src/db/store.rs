//! `ProgressStore` over the SQLite repository.

use crate::db::error::DbError;
use crate::db::repository::{ProgressRepository, SqliteRepository};
use std::sync::{Arc, Mutex};
use swipe_core::{ProgressSnapshot, ProgressStore, StoreError};

/// Progress of one profile kept in the local database.
#[derive(Clone)]
pub struct SqliteProgressStore {
    repository: Arc<Mutex<SqliteRepository>>,
    profile: String,
}

impl SqliteProgressStore {
    pub fn new(repository: Arc<Mutex<SqliteRepository>>, profile: impl Into<String>) -> Self {
        Self {
            repository,
            profile: profile.into(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    fn with_repo<T>(
        &self,
        f: impl FnOnce(&SqliteRepository) -> Result<T, DbError>,
    ) -> Result<T, StoreError> {
        let repo = self.repository.lock().map_err(|_| DbError::Poisoned)?;
        f(&*repo).map_err(Into::into)
    }
}

impl ProgressStore for SqliteProgressStore {
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError> {
        self.with_repo(|repo| repo.get_progress(&self.profile))
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        self.with_repo(|repo| repo.save_progress(&self.profile, snapshot))
    }
}
