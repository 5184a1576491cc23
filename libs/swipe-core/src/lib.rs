//! Core library for the swipe-deck study tool.
//!
//! Provides:
//! - Deck sources (markdown, `flashcards.json`, built-in sample deck)
//! - The deck cursor and review-injection scheduler with undo
//! - Progress snapshots and the persistence trait
//! - `StudySession`, which ties them together for a host application

pub mod cursor;
pub mod deck;
pub mod error;
pub mod history;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;

pub use deck::{load_deck, load_deck_or_sample, parse_json, sample_deck};
pub use error::{DeckError, Result, SessionError, StoreError};
pub use parser::parse_markdown;
pub use scheduler::{RandomSource, ReviewRandom, ReviewScheduler};
pub use session::{SessionOptions, StudySession};
pub use snapshot::{ProgressSnapshot, SNAPSHOT_VERSION};
pub use state::DeckState;
pub use store::ProgressStore;
pub use types::{
    Card, CardBack, CardContent, CardFront, HistoryEntry, NextCard, Outcome, ReviewWindow,
    SessionStats,
};
