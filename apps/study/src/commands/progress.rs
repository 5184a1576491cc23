//! Export, import and reset of stored progress.

use super::CommandError;
use crate::db::ProgressRepository;
use crate::state::AppState;
use std::fs;
use std::io::Write;
use std::path::Path;
use swipe_core::{load_deck, ProgressSnapshot, ProgressStore, ReviewWindow};

/// Write the stored snapshot as JSON. Returns false when nothing was stored,
/// in which case an empty snapshot is written.
pub fn export_progress<O: Write>(app: &AppState, out: &mut O) -> Result<bool, CommandError> {
    let stored = app.progress_store().load()?;
    let found = stored.is_some();
    let snapshot = stored.unwrap_or_default();
    writeln!(out, "{}", snapshot.to_json()?)?;
    Ok(found)
}

/// Replace stored progress with the snapshot in `path`.
///
/// The file is sanitized like any loaded snapshot. The card index is only
/// clamped when a deck is configured.
pub fn import_progress(app: &AppState, path: &Path) -> Result<ProgressSnapshot, CommandError> {
    let content = fs::read_to_string(path)?;
    let snapshot = ProgressSnapshot::from_json(&content)?;

    let deck_len = match &app.config.deck_path {
        Some(deck) => match load_deck(deck) {
            Ok(cards) => cards.len(),
            Err(e) => {
                tracing::warn!(deck = %deck.display(), error = %e, "deck unreadable, card index left as is");
                usize::MAX
            }
        },
        None => usize::MAX,
    };
    let snapshot = snapshot.sanitize(ReviewWindow::default(), deck_len);

    app.progress_store().save(&snapshot)?;
    tracing::info!(
        path = %path.display(),
        known = snapshot.known_ids.len(),
        learning = snapshot.learning_ids.len(),
        "progress imported"
    );
    Ok(snapshot)
}

/// Delete stored progress for the configured profile. Refuses without `yes`.
pub fn reset_progress(app: &AppState, yes: bool) -> Result<bool, CommandError> {
    if !yes {
        return Err(CommandError::Refused(format!(
            "this deletes all progress for profile '{}'; pass --yes to confirm",
            app.config.profile
        )));
    }
    let deleted = app.repo()?.delete_progress(&app.config.profile)?;
    tracing::info!(profile = %app.config.profile, deleted, "progress reset");
    Ok(deleted)
}
