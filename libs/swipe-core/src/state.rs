//! Mutable study state shared by the cursor and the review scheduler.

use crate::cursor::DeckCursor;
use crate::history::History;
use crate::types::{Card, Outcome};
use std::collections::{BTreeSet, HashSet};

/// Session state. Mutated only through [`crate::ReviewScheduler`].
///
/// `known_ids` and `learning_ids` never share an id.
#[derive(Debug, Clone)]
pub struct DeckState {
    cards: Vec<Card>,
    card_ids: HashSet<String>,
    pub(crate) cursor: DeckCursor,
    pub(crate) known_ids: BTreeSet<String>,
    pub(crate) learning_ids: BTreeSet<String>,
    pub(crate) cards_since_last_review: u32,
    pub(crate) next_review_interval: u32,
    pub(crate) history: History,
}

impl DeckState {
    pub(crate) fn new(cards: Vec<Card>, next_review_interval: u32) -> Self {
        let card_ids = cards.iter().map(|card| card.id.clone()).collect();
        let cursor = DeckCursor::new(cards.len());
        Self {
            cards,
            card_ids,
            cursor,
            known_ids: BTreeSet::new(),
            learning_ids: BTreeSet::new(),
            cards_since_last_review: 0,
            next_review_interval,
            history: History::new(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    pub fn known_ids(&self) -> &BTreeSet<String> {
        &self.known_ids
    }

    pub fn learning_ids(&self) -> &BTreeSet<String> {
        &self.learning_ids
    }

    pub fn cards_since_last_review(&self) -> u32 {
        self.cards_since_last_review
    }

    pub fn next_review_interval(&self) -> u32 {
        self.next_review_interval
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn contains_card(&self, id: &str) -> bool {
        self.card_ids.contains(id)
    }

    /// Next card in deck order, or `None` once the linear pass is done.
    pub fn peek_linear(&self) -> Option<&Card> {
        self.cards.get(self.cursor.position())
    }

    pub fn is_linear_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Still-learning cards of this deck, in deck order.
    pub fn review_pool(&self) -> Vec<&Card> {
        if self.learning_ids.is_empty() {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|card| self.learning_ids.contains(&card.id))
            .collect()
    }

    /// True when the deck is done and nothing is left to review.
    pub fn is_finished(&self) -> bool {
        self.is_linear_exhausted() && self.review_pool().is_empty()
    }

    pub fn classification(&self, id: &str) -> Option<Outcome> {
        if self.known_ids.contains(id) {
            Some(Outcome::Known)
        } else if self.learning_ids.contains(id) {
            Some(Outcome::Learning)
        } else {
            None
        }
    }

    /// File `id` under `outcome`, removing it from the other set first.
    pub(crate) fn classify(&mut self, id: &str, outcome: Outcome) {
        self.known_ids.remove(id);
        self.learning_ids.remove(id);
        match outcome {
            Outcome::Known => self.known_ids.insert(id.to_string()),
            Outcome::Learning => self.learning_ids.insert(id.to_string()),
        };
    }

    /// Drop `id` from the set `outcome` placed it in. The other set is untouched.
    pub(crate) fn unclassify(&mut self, id: &str, outcome: Outcome) {
        match outcome {
            Outcome::Known => self.known_ids.remove(id),
            Outcome::Learning => self.learning_ids.remove(id),
        };
    }

    pub(crate) fn seed_progress(
        &mut self,
        known_ids: BTreeSet<String>,
        learning_ids: BTreeSet<String>,
    ) {
        self.known_ids = known_ids;
        self.learning_ids = learning_ids;
        let learning = &self.learning_ids;
        self.known_ids.retain(|id| !learning.contains(id));
    }
}
