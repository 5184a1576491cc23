//! Local SQLite progress storage.

pub mod background;
pub mod error;
pub mod repository;
pub mod schema;
pub mod store;

pub use background::BackgroundStore;
pub use error::DbError;
pub use repository::{
    ProgressRepository, SessionRecord, SessionRepository, SessionTotals, SqliteRepository,
};
pub use store::SqliteProgressStore;
