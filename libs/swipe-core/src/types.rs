//! Core types for the study tool.

use serde::{Deserialize, Serialize};

/// Front face of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFront {
    pub primary_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Back face of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBack {
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Display payload. The scheduler never looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub front: CardFront,
    pub back: CardBack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// A card in a deck.
///
/// Cards are immutable once the deck is loaded. `is_favourite` only seeds the
/// session's favourite set; toggling a favourite never touches the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub content: CardContent,
    pub is_favourite: bool,
}

impl Card {
    /// Create a plain question/answer card.
    pub fn new(id: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: CardContent {
                front: CardFront {
                    primary_text: question.into(),
                    ..Default::default()
                },
                back: CardBack {
                    translation: answer.into(),
                    ..Default::default()
                },
                level: None,
            },
            is_favourite: false,
        }
    }
}

/// The user's classification of a shown card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Known,
    Learning,
}

impl Outcome {
    /// Swipe direction used by the browser tool: right is known, left is learning.
    pub fn as_direction(self) -> &'static str {
        match self {
            Self::Known => "right",
            Self::Learning => "left",
        }
    }

    /// Parse from a swipe direction.
    pub fn from_direction(direction: &str) -> Option<Self> {
        match direction {
            "right" => Some(Self::Known),
            "left" => Some(Self::Learning),
            _ => None,
        }
    }
}

/// One turn's card, tagged with how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextCard {
    pub card: Card,
    pub is_review_card: bool,
}

/// One recorded outcome in the undo log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub outcome: Outcome,
    pub card_id: String,
    pub was_review_injection: bool,
}

/// Inclusive bounds for the review countdown. Always `1 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewWindow {
    min: u32,
    max: u32,
}

impl Default for ReviewWindow {
    fn default() -> Self {
        Self { min: 5, max: 50 }
    }
}

impl ReviewWindow {
    /// `None` unless `1 <= min <= max`.
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min >= 1 && min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, interval: u32) -> bool {
        (self.min..=self.max).contains(&interval)
    }

    pub fn clamp(&self, interval: u32) -> u32 {
        interval.clamp(self.min, self.max)
    }
}

/// Counts describing the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_cards: usize,
    pub position: usize,
    pub known: usize,
    pub learning: usize,
    pub favourites: usize,
    pub reviews_shown: usize,
    pub linear_shown: usize,
    pub history_len: usize,
}
