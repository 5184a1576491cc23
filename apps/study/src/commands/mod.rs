//! CLI command implementations.

pub mod progress;
pub mod stats;
pub mod study;

use crate::db::DbError;
use swipe_core::StoreError;
use thiserror::Error;

pub use progress::{export_progress, import_progress, reset_progress};
pub use stats::{show_stats, DeckProgress};
pub use study::{run_study, StudyKey, StudySummary};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Refused(String),
}
