//! A study session: deck state, scheduler and progress store wired together.

use crate::error::{SessionError, StoreError};
use crate::scheduler::{ReviewRandom, ReviewScheduler};
use crate::snapshot::ProgressSnapshot;
use crate::state::DeckState;
use crate::store::ProgressStore;
use crate::types::{Card, HistoryEntry, NextCard, Outcome, ReviewWindow, SessionStats};
use std::collections::BTreeSet;

/// Knobs for a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub window: ReviewWindow,
    /// Continue from the stored card index instead of the first card.
    pub resume_position: bool,
}

/// One learner studying one deck.
///
/// Every change is saved through the store right away. A failed save is
/// logged and retried with the next change; studying is never blocked on it.
pub struct StudySession<S, R> {
    scheduler: ReviewScheduler<R>,
    state: DeckState,
    store: S,
    favourites: BTreeSet<String>,
    current: Option<NextCard>,
    save_pending: bool,
    reviews_shown: usize,
    linear_shown: usize,
}

impl<S: ProgressStore, R: ReviewRandom> StudySession<S, R> {
    /// Load stored progress and set up the deck.
    ///
    /// A store that fails to load is treated like an empty one.
    pub fn start(cards: Vec<Card>, store: S, random: R, options: SessionOptions) -> Self {
        let mut scheduler = ReviewScheduler::with_window(random, options.window);
        let deck_len = cards.len();
        let deck_favourites: BTreeSet<String> = cards
            .iter()
            .filter(|card| card.is_favourite)
            .map(|card| card.id.clone())
            .collect();

        let (state, favourites) = match store.load() {
            Ok(Some(progress)) => {
                let progress = progress.sanitize(options.window, deck_len);
                let state = scheduler.restore_state(cards, &progress, options.resume_position);
                tracing::info!(
                    known = state.known_ids().len(),
                    learning = state.learning_ids().len(),
                    favourites = progress.favourites.len(),
                    "restored progress"
                );
                (state, progress.favourites)
            }
            Ok(None) => {
                tracing::info!(cards = deck_len, "no stored progress, starting fresh");
                (scheduler.new_state(cards), deck_favourites)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load progress, starting fresh");
                (scheduler.new_state(cards), deck_favourites)
            }
        };

        Self {
            scheduler,
            state,
            store,
            favourites,
            current: None,
            save_pending: false,
            reviews_shown: 0,
            linear_shown: 0,
        }
    }

    pub fn state(&self) -> &DeckState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// End the session and hand back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The card on screen, drawing a new turn if none is pending.
    pub fn current(&mut self) -> Option<&NextCard> {
        if self.current.is_none() {
            self.current = Some(self.scheduler.get_next_card(&self.state)?);
        }
        self.current.as_ref()
    }

    /// Record `outcome` for the card on screen.
    pub fn record(&mut self, outcome: Outcome) -> Result<NextCard, SessionError> {
        if self.current().is_none() {
            return Err(SessionError::DeckExhausted);
        }
        let turn = self.current.take().ok_or(SessionError::DeckExhausted)?;

        if let Err(e) = self.scheduler.record_outcome(&mut self.state, &turn, outcome) {
            self.current = Some(turn);
            return Err(e);
        }
        if turn.is_review_card {
            self.reviews_shown += 1;
        } else {
            self.linear_shown += 1;
        }
        self.persist();
        Ok(turn)
    }

    /// Undo the last outcome. The undone card is shown again if it was linear.
    pub fn undo(&mut self) -> Result<HistoryEntry, SessionError> {
        let entry = self.scheduler.undo(&mut self.state)?;
        let shown = if entry.was_review_injection {
            &mut self.reviews_shown
        } else {
            &mut self.linear_shown
        };
        *shown = shown.saturating_sub(1);
        self.current = None;
        self.persist();
        Ok(entry)
    }

    /// Start over from the first card, keeping known and learning progress.
    pub fn reset(&mut self) {
        self.scheduler.reset_session(&mut self.state);
        self.current = None;
        self.reviews_shown = 0;
        self.linear_shown = 0;
        self.persist();
    }

    /// Flip the favourite flag of `card_id`; returns the new value.
    pub fn toggle_favourite(&mut self, card_id: &str) -> Result<bool, SessionError> {
        if !self.state.contains_card(card_id) {
            return Err(SessionError::UnknownCard(card_id.to_string()));
        }
        let now_favourite = if self.favourites.remove(card_id) {
            false
        } else {
            self.favourites.insert(card_id.to_string());
            true
        };
        self.persist();
        Ok(now_favourite)
    }

    pub fn is_favourite(&self, card_id: &str) -> bool {
        self.favourites.contains(card_id)
    }

    pub fn favourites(&self) -> &BTreeSet<String> {
        &self.favourites
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_cards: self.state.cards().len(),
            position: self.state.cursor(),
            known: self.state.known_ids().len(),
            learning: self.state.learning_ids().len(),
            favourites: self.favourites.len(),
            reviews_shown: self.reviews_shown,
            linear_shown: self.linear_shown,
            history_len: self.state.history().len(),
        }
    }

    /// `"current / total"`, counting the card on screen.
    pub fn progress_label(&self) -> String {
        let total = self.state.cards().len();
        let current = (self.state.cursor() + 1).min(total);
        format!("{} / {}", current, total)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::capture(&self.state, &self.favourites)
    }

    /// True while the latest change has not reached the store.
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_pending
    }

    /// Retry a failed save now. Used before quitting.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.save_pending {
            return Ok(());
        }
        self.store.save(&self.snapshot())?;
        self.save_pending = false;
        Ok(())
    }

    fn persist(&mut self) {
        if self.save_pending {
            tracing::debug!("retrying progress save");
        }
        match self.store.save(&self.snapshot()) {
            Ok(()) => self.save_pending = false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save progress, will retry on next change");
                self.save_pending = true;
            }
        }
    }
}
