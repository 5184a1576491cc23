//! Writer thread that takes progress saves off the study loop.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use swipe_core::{ProgressSnapshot, ProgressStore, StoreError};

/// Wraps a store so `save` only queues the snapshot.
///
/// The writer thread always writes the newest queued snapshot and drops older
/// ones. Write failures are logged there; the next queued snapshot supersedes
/// the failed one. A failure of the last write is reported by [`close`].
///
/// [`close`]: BackgroundStore::close
pub struct BackgroundStore<S: ProgressStore + Send + Sync + 'static> {
    inner: Arc<S>,
    tx: Option<Sender<ProgressSnapshot>>,
    handle: Option<JoinHandle<WriterReport>>,
}

/// What the writer thread did before it stopped.
#[derive(Debug, Default)]
struct WriterReport {
    written: usize,
    last_error: Option<StoreError>,
}

impl<S: ProgressStore + Send + Sync + 'static> BackgroundStore<S> {
    pub fn spawn(inner: S) -> Self {
        let inner = Arc::new(inner);
        let (tx, rx) = channel();
        let writer = inner.clone();
        let handle = thread::spawn(move || Self::write_loop(writer, rx));

        Self {
            inner,
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Stop the writer after it drains the queue.
    ///
    /// Returns the number of snapshots written, or the error of the last
    /// write when it failed and nothing newer replaced it.
    pub fn close(mut self) -> Result<usize, StoreError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<usize, StoreError> {
        self.tx.take();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(WriterReport {
                last_error: Some(e),
                ..
            })) => Err(e),
            Some(Ok(report)) => Ok(report.written),
            Some(Err(_)) => Err(StoreError::Backend(
                "progress writer thread panicked".to_string(),
            )),
            None => Ok(0),
        }
    }

    fn write_loop(store: Arc<S>, rx: Receiver<ProgressSnapshot>) -> WriterReport {
        let mut report = WriterReport::default();
        while let Ok(mut snapshot) = rx.recv() {
            // Skip to the newest queued snapshot.
            while let Ok(newer) = rx.try_recv() {
                snapshot = newer;
            }
            match store.save(&snapshot) {
                Ok(()) => {
                    report.written += 1;
                    report.last_error = None;
                    tracing::debug!(
                        known = snapshot.known_ids.len(),
                        learning = snapshot.learning_ids.len(),
                        "progress saved"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "background progress save failed");
                    report.last_error = Some(e);
                }
            }
        }
        report
    }
}

impl<S: ProgressStore + Send + Sync + 'static> ProgressStore for BackgroundStore<S> {
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError> {
        self.inner.load()
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| StoreError::Backend("progress writer stopped".to_string()))?;
        tx.send(snapshot.clone())
            .map_err(|_| StoreError::Backend("progress writer stopped".to_string()))
    }
}

impl<S: ProgressStore + Send + Sync + 'static> Drop for BackgroundStore<S> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "progress writer stopped with an unsaved snapshot");
        }
    }
}
