//! Persistence seam for progress snapshots.

use crate::error::StoreError;
use crate::snapshot::ProgressSnapshot;

/// Backend that keeps progress between sessions.
///
/// `save` may return before the snapshot is durable; a session treats every
/// save as best-effort and never waits on it to continue studying.
pub trait ProgressStore {
    /// Stored progress, or `None` for a first session.
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError>;

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for &S {
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}
