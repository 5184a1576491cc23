//! Review-injection scheduler.
//!
//! Walks the deck linearly and, once `cards_since_last_review` reaches the
//! randomly drawn `next_review_interval`, shows a random still-learning card
//! instead of the next linear one. When the linear pass is over, still-learning
//! cards keep coming back until none are left.

mod random;

pub use random::{RandomSource, ReviewRandom};

#[cfg(test)]
pub(crate) use random::ScriptedRandom;

use crate::cursor::DeckCursor;
use crate::error::SessionError;
use crate::snapshot::ProgressSnapshot;
use crate::state::DeckState;
use crate::types::{Card, HistoryEntry, NextCard, Outcome, ReviewWindow};

/// Decides what to show next and applies outcomes and undos to a [`DeckState`].
#[derive(Debug, Clone)]
pub struct ReviewScheduler<R> {
    random: R,
    window: ReviewWindow,
}

impl<R: ReviewRandom> ReviewScheduler<R> {
    pub fn new(random: R) -> Self {
        Self::with_window(random, ReviewWindow::default())
    }

    pub fn with_window(random: R, window: ReviewWindow) -> Self {
        Self { random, window }
    }

    pub fn window(&self) -> ReviewWindow {
        self.window
    }

    /// Fresh state: cursor at the start, nothing classified, new interval.
    pub fn new_state(&mut self, cards: Vec<Card>) -> DeckState {
        let interval = self.draw_interval();
        DeckState::new(cards, interval)
    }

    /// State seeded from saved progress. The snapshot must already be sanitized.
    ///
    /// With `resume_position` the cursor continues from `last_card_index`,
    /// otherwise the session starts at the first card.
    pub fn restore_state(
        &mut self,
        cards: Vec<Card>,
        progress: &ProgressSnapshot,
        resume_position: bool,
    ) -> DeckState {
        let mut state = self.new_state(cards);
        state.seed_progress(progress.known_ids.clone(), progress.learning_ids.clone());
        state.cards_since_last_review = progress.cards_since_last_review;
        if let Some(interval) = progress.next_review_interval {
            state.next_review_interval = self.window.clamp(interval);
        }
        if resume_position {
            let position = progress.last_card_index.unwrap_or(0);
            state.cursor = DeckCursor::at(position, state.cards().len());
        }
        state
    }

    /// Pick the card for this turn.
    ///
    /// Returns `None` when the linear pass is done and no still-learning card
    /// remains. Review picks consume a random draw, so callers should hold on
    /// to the returned turn until its outcome is recorded.
    pub fn get_next_card(&mut self, state: &DeckState) -> Option<NextCard> {
        let pool = state.review_pool();
        let review_due =
            !pool.is_empty() && state.cards_since_last_review >= state.next_review_interval;

        if review_due {
            return Some(self.pick_review(&pool));
        }

        match state.peek_linear() {
            Some(card) => Some(NextCard {
                card: card.clone(),
                is_review_card: false,
            }),
            None if !pool.is_empty() => Some(self.pick_review(&pool)),
            None => None,
        }
    }

    /// Apply the user's outcome for `turn`.
    pub fn record_outcome(
        &mut self,
        state: &mut DeckState,
        turn: &NextCard,
        outcome: Outcome,
    ) -> Result<(), SessionError> {
        let id = turn.card.id.as_str();
        if !state.contains_card(id) {
            return Err(SessionError::UnknownCard(id.to_string()));
        }

        state.classify(id, outcome);
        state.history.push(HistoryEntry {
            outcome,
            card_id: id.to_string(),
            was_review_injection: turn.is_review_card,
        });

        if turn.is_review_card {
            state.cards_since_last_review = 0;
            state.next_review_interval = self.draw_interval();
        } else {
            state.cursor.advance();
            state.cards_since_last_review = state.cards_since_last_review.saturating_add(1);
        }

        tracing::trace!(
            card = id,
            ?outcome,
            review = turn.is_review_card,
            cursor = state.cursor(),
            since_review = state.cards_since_last_review,
            interval = state.next_review_interval,
            "recorded outcome"
        );
        Ok(())
    }

    /// Revert the most recent outcome.
    ///
    /// The card becomes unclassified. Undoing a review resolution only bumps
    /// the counter back by one; the interval drawn at that resolution stays.
    pub fn undo(&mut self, state: &mut DeckState) -> Result<HistoryEntry, SessionError> {
        let entry = state.history.pop().ok_or(SessionError::EmptyHistory)?;

        state.unclassify(&entry.card_id, entry.outcome);
        if entry.was_review_injection {
            state.cards_since_last_review = state.cards_since_last_review.saturating_add(1);
        } else {
            state.cursor.retreat();
            state.cards_since_last_review = state.cards_since_last_review.saturating_sub(1);
        }

        tracing::trace!(card = %entry.card_id, review = entry.was_review_injection, "undid outcome");
        Ok(entry)
    }

    /// Start the deck over, keeping known and still-learning progress.
    pub fn reset_session(&mut self, state: &mut DeckState) {
        state.cursor.rewind();
        state.history.clear();
        state.cards_since_last_review = 0;
        state.next_review_interval = self.draw_interval();
    }

    fn draw_interval(&mut self) -> u32 {
        let interval = self.random.draw_interval(self.window);
        self.window.clamp(interval)
    }

    fn pick_review(&mut self, pool: &[&Card]) -> NextCard {
        let index = self.random.pick_index(pool.len()).min(pool.len() - 1);
        NextCard {
            card: pool[index].clone(),
            is_review_card: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deck(ids: &[&str]) -> Vec<Card> {
        ids.iter().map(|id| Card::new(*id, *id, *id)).collect()
    }

    /// Scheduler whose window admits the short intervals the scripts use.
    fn scheduler(intervals: &[u32], picks: &[usize]) -> ReviewScheduler<ScriptedRandom> {
        let window = ReviewWindow::new(1, 50).unwrap();
        ReviewScheduler::with_window(ScriptedRandom::new(intervals, picks), window)
    }

    fn resolve(
        scheduler: &mut ReviewScheduler<ScriptedRandom>,
        state: &mut DeckState,
        outcome: Outcome,
    ) -> NextCard {
        let turn = scheduler.get_next_card(state).expect("card available");
        scheduler.record_outcome(state, &turn, outcome).unwrap();
        turn
    }

    #[test]
    fn fresh_state_starts_at_first_card() {
        let mut scheduler = scheduler(&[12], &[]);
        let state = scheduler.new_state(deck(&["a", "b"]));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.next_review_interval(), 12);
        assert!(state.history().is_empty());
        assert!(state.known_ids().is_empty());
    }

    #[test]
    fn linear_card_when_interval_not_reached() {
        let mut scheduler = scheduler(&[5], &[]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);

        let turn = scheduler.get_next_card(&state).unwrap();
        assert_eq!(turn.card.id, "b");
        assert!(!turn.is_review_card);
    }

    #[test]
    fn no_review_without_learning_cards() {
        let mut scheduler = scheduler(&[5], &[]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c", "d", "e", "f", "g"]));
        for _ in 0..6 {
            let turn = resolve(&mut scheduler, &mut state, Outcome::Known);
            assert!(!turn.is_review_card);
        }
        assert_eq!(state.cards_since_last_review(), 6);
        let turn = scheduler.get_next_card(&state).unwrap();
        assert_eq!(turn.card.id, "g");
        assert!(!turn.is_review_card);
    }

    #[test]
    fn review_injected_once_interval_reached() {
        let mut scheduler = scheduler(&[2, 17], &[0]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c"]));

        resolve(&mut scheduler, &mut state, Outcome::Learning);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.cards_since_last_review(), 1);

        resolve(&mut scheduler, &mut state, Outcome::Known);
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.cards_since_last_review(), 2);

        let turn = scheduler.get_next_card(&state).unwrap();
        assert_eq!(turn.card.id, "a");
        assert!(turn.is_review_card);

        scheduler.record_outcome(&mut state, &turn, Outcome::Known).unwrap();
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.cards_since_last_review(), 0);
        assert_eq!(state.next_review_interval(), 17);
        assert!(state.known_ids().contains("a"));
        assert!(!state.learning_ids().contains("a"));
    }

    #[test]
    fn review_pick_uses_deck_order() {
        let mut scheduler = scheduler(&[3], &[1]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c", "d"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        resolve(&mut scheduler, &mut state, Outcome::Known);
        resolve(&mut scheduler, &mut state, Outcome::Learning);

        let turn = scheduler.get_next_card(&state).unwrap();
        assert!(turn.is_review_card);
        assert_eq!(turn.card.id, "c");
    }

    #[test]
    fn exhausted_deck_keeps_reviewing_learning_cards() {
        let mut scheduler = scheduler(&[50], &[0, 0]);
        let mut state = scheduler.new_state(deck(&["a", "b"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        resolve(&mut scheduler, &mut state, Outcome::Known);
        assert!(state.is_linear_exhausted());

        let turn = resolve(&mut scheduler, &mut state, Outcome::Learning);
        assert!(turn.is_review_card);
        assert_eq!(turn.card.id, "a");

        let turn = resolve(&mut scheduler, &mut state, Outcome::Known);
        assert!(turn.is_review_card);
        assert!(state.is_finished());
        assert_eq!(scheduler.get_next_card(&state), None);
    }

    #[test]
    fn single_known_card_exhausts_deck() {
        let mut scheduler = scheduler(&[5], &[]);
        let mut state = scheduler.new_state(deck(&["a"]));
        resolve(&mut scheduler, &mut state, Outcome::Known);
        assert_eq!(scheduler.get_next_card(&state), None);
    }

    #[test]
    fn empty_deck_has_no_cards() {
        let mut scheduler = scheduler(&[5], &[]);
        let state = scheduler.new_state(Vec::new());
        assert_eq!(scheduler.get_next_card(&state), None);
    }

    #[test]
    fn reclassification_moves_between_sets() {
        let mut scheduler = scheduler(&[1], &[0]);
        let mut state = scheduler.new_state(deck(&["a", "b"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        let turn = resolve(&mut scheduler, &mut state, Outcome::Known);
        assert!(turn.is_review_card);
        assert_eq!(turn.card.id, "a");
        assert!(state.known_ids().contains("a"));
        assert!(state.learning_ids().is_empty());
    }

    #[test]
    fn sets_stay_disjoint() {
        let mut scheduler = ReviewScheduler::new(RandomSource::seeded(3));
        let ids: Vec<String> = (0..30).map(|i| format!("c{}", i)).collect();
        let cards = ids.iter().map(|id| Card::new(id.as_str(), "q", "a")).collect();
        let mut state = scheduler.new_state(cards);

        let mut step = 0usize;
        while let Some(turn) = scheduler.get_next_card(&state) {
            let outcome = if step % 3 == 0 { Outcome::Learning } else { Outcome::Known };
            scheduler.record_outcome(&mut state, &turn, outcome).unwrap();
            assert!(state.known_ids().is_disjoint(state.learning_ids()));
            assert!(scheduler.window().contains(state.next_review_interval()));
            assert!(state.cursor() <= state.cards().len());
            step += 1;
            if step > 500 {
                break;
            }
        }
        assert!(state.is_finished());
        assert_eq!(state.history().len(), step);
    }

    #[test]
    fn undo_linear_restores_position() {
        let mut scheduler = scheduler(&[10], &[]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c"]));
        resolve(&mut scheduler, &mut state, Outcome::Known);
        resolve(&mut scheduler, &mut state, Outcome::Learning);

        let entry = scheduler.undo(&mut state).unwrap();
        assert_eq!(entry.card_id, "b");
        assert_eq!(entry.outcome, Outcome::Learning);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.cards_since_last_review(), 1);
        assert_eq!(state.classification("b"), None);
        assert_eq!(state.classification("a"), Some(Outcome::Known));
        assert_eq!(scheduler.get_next_card(&state).unwrap().card.id, "b");
    }

    #[test]
    fn undo_reclassification_leaves_card_unclassified() {
        let mut scheduler = scheduler(&[1], &[0]);
        let mut state = scheduler.new_state(deck(&["a", "b"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        resolve(&mut scheduler, &mut state, Outcome::Known);

        scheduler.undo(&mut state).unwrap();
        assert_eq!(state.classification("a"), None);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn undo_review_bumps_counter() {
        let mut scheduler = scheduler(&[1, 30], &[0]);
        let mut state = scheduler.new_state(deck(&["a", "b"]));
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        resolve(&mut scheduler, &mut state, Outcome::Learning);
        assert_eq!(state.cards_since_last_review(), 0);

        let entry = scheduler.undo(&mut state).unwrap();
        assert!(entry.was_review_injection);
        assert_eq!(state.cards_since_last_review(), 1);
        assert_eq!(state.next_review_interval(), 30);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn undo_empty_history() {
        let mut scheduler = scheduler(&[9], &[]);
        let mut state = scheduler.new_state(deck(&["a"]));
        assert_eq!(scheduler.undo(&mut state), Err(SessionError::EmptyHistory));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.next_review_interval(), 9);
        assert_eq!(state.cards_since_last_review(), 0);
    }

    #[test]
    fn history_tracks_records_minus_undos() {
        let mut scheduler = scheduler(&[50], &[]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c", "d"]));
        for _ in 0..3 {
            resolve(&mut scheduler, &mut state, Outcome::Known);
        }
        scheduler.undo(&mut state).unwrap();
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn record_rejects_foreign_card() {
        let mut scheduler = scheduler(&[5], &[]);
        let mut state = scheduler.new_state(deck(&["a"]));
        let turn = NextCard {
            card: Card::new("zzz", "q", "a"),
            is_review_card: false,
        };
        assert_eq!(
            scheduler.record_outcome(&mut state, &turn, Outcome::Known),
            Err(SessionError::UnknownCard("zzz".to_string()))
        );
        assert_eq!(state.cursor(), 0);
        assert!(state.history().is_empty());
    }

    #[test]
    fn reset_keeps_progress() {
        let mut scheduler = scheduler(&[40, 8], &[]);
        let mut state = scheduler.new_state(deck(&["a", "b", "c"]));
        resolve(&mut scheduler, &mut state, Outcome::Known);
        resolve(&mut scheduler, &mut state, Outcome::Learning);

        scheduler.reset_session(&mut state);
        assert_eq!(state.cursor(), 0);
        assert!(state.history().is_empty());
        assert_eq!(state.cards_since_last_review(), 0);
        assert_eq!(state.next_review_interval(), 8);
        assert!(state.known_ids().contains("a"));
        assert!(state.learning_ids().contains("b"));
    }

    #[test]
    fn out_of_window_draws_are_clamped() {
        let mut scheduler = ReviewScheduler::new(ScriptedRandom::new(&[0, 900], &[]));
        let mut state = scheduler.new_state(deck(&["a"]));
        assert_eq!(state.next_review_interval(), 5);
        scheduler.reset_session(&mut state);
        assert_eq!(state.next_review_interval(), 50);
    }

    #[test]
    fn restore_state_resumes_when_asked() {
        let mut scheduler = scheduler(&[20, 20], &[]);
        let progress = ProgressSnapshot {
            known_ids: ["a".to_string()].into_iter().collect(),
            learning_ids: ["b".to_string()].into_iter().collect(),
            cards_since_last_review: 4,
            next_review_interval: Some(9),
            last_card_index: Some(2),
            ..Default::default()
        };

        let state = scheduler.restore_state(deck(&["a", "b", "c"]), &progress, true);
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.cards_since_last_review(), 4);
        assert_eq!(state.next_review_interval(), 9);
        assert!(state.known_ids().contains("a"));

        let state = scheduler.restore_state(deck(&["a", "b", "c"]), &progress, false);
        assert_eq!(state.cursor(), 0);
    }
}
