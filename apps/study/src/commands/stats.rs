//! Progress and session statistics.

use super::CommandError;
use crate::db::{SessionRecord, SessionRepository, SessionTotals};
use crate::state::AppState;
use std::io::Write;
use swipe_core::{load_deck, ProgressSnapshot, ProgressStore};

/// Stored progress counted against a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckProgress {
    pub total: usize,
    pub known: usize,
    pub learning: usize,
    pub unseen: usize,
}

impl DeckProgress {
    pub fn count(snapshot: &ProgressSnapshot, card_ids: &[String]) -> Self {
        let mut progress = Self {
            total: card_ids.len(),
            ..Default::default()
        };
        for id in card_ids {
            if snapshot.learning_ids.contains(id) {
                progress.learning += 1;
            } else if snapshot.known_ids.contains(id) {
                progress.known += 1;
            } else {
                progress.unseen += 1;
            }
        }
        progress
    }
}

/// Print stored progress, session totals and the latest `limit` sessions.
pub fn show_stats<O: Write>(app: &AppState, limit: usize, out: &mut O) -> Result<(), CommandError> {
    let profile = &app.config.profile;
    let snapshot = app.progress_store().load()?.unwrap_or_default();

    writeln!(out, "Profile: {}", profile)?;
    match snapshot.saved_at {
        Some(saved_at) => writeln!(out, "Last saved: {}", saved_at.format("%Y-%m-%d %H:%M UTC"))?,
        None => writeln!(out, "Last saved: never")?,
    }
    writeln!(
        out,
        "Known: {}  Learning: {}  Favourites: {}",
        snapshot.known_ids.len(),
        snapshot.learning_ids.len(),
        snapshot.favourites.len()
    )?;

    if let Some(deck) = &app.config.deck_path {
        match load_deck(deck) {
            Ok(cards) => {
                let ids: Vec<String> = cards.into_iter().map(|card| card.id).collect();
                let progress = DeckProgress::count(&snapshot, &ids);
                writeln!(
                    out,
                    "Deck {}: {} cards, {} known, {} learning, {} unseen",
                    deck.display(),
                    progress.total,
                    progress.known,
                    progress.learning,
                    progress.unseen
                )?;
            }
            Err(e) => writeln!(out, "Deck {}: unreadable ({})", deck.display(), e)?,
        }
    }

    let (totals, recent) = {
        let repo = app.repo()?;
        (repo.session_totals(profile)?, repo.recent_sessions(profile, limit)?)
    };
    render_totals(out, &totals)?;
    for session in &recent {
        render_session(out, session)?;
    }
    Ok(())
}

fn render_totals<O: Write>(out: &mut O, totals: &SessionTotals) -> std::io::Result<()> {
    writeln!(
        out,
        "Sessions: {}  Cards shown: {}  Reviews: {}  Time: {}m",
        totals.sessions,
        totals.cards_shown,
        totals.reviews_shown,
        totals.total_secs / 60
    )
}

fn render_session<O: Write>(out: &mut O, session: &SessionRecord) -> std::io::Result<()> {
    let duration = match session.duration_secs() {
        Some(secs) => format!("{}m{:02}s", secs / 60, secs % 60),
        None => "unfinished".to_string(),
    };
    writeln!(
        out,
        "  {}  {}  {} shown ({} review)  {} known / {} learning  {}",
        session.started_at.format("%Y-%m-%d %H:%M"),
        session.deck,
        session.cards_shown,
        session.reviews_shown,
        session.cards_known,
        session.cards_learning,
        duration
    )
}
