//! Deck sources: `flashcards.json`, markdown files and the built-in sample deck.

use crate::error::{DeckError, Result};
use crate::parser;
use crate::types::{Card, CardBack, CardContent, CardFront};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A card as stored in `flashcards.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonCard {
    id: String,
    front: CardFront,
    back: CardBack,
    #[serde(default)]
    is_favourite: bool,
    #[serde(default)]
    level: Option<String>,
}

impl From<JsonCard> for Card {
    fn from(raw: JsonCard) -> Self {
        Card {
            id: raw.id,
            content: CardContent {
                front: raw.front,
                back: raw.back,
                level: raw.level.filter(|level| !level.is_empty()),
            },
            is_favourite: raw.is_favourite,
        }
    }
}

/// Parse a JSON array of cards.
pub fn parse_json(content: &str) -> Result<Vec<Card>> {
    let raw: Vec<JsonCard> = serde_json::from_str(content)?;
    let mut seen = HashSet::with_capacity(raw.len());
    let mut cards = Vec::with_capacity(raw.len());

    for card in raw {
        if !seen.insert(card.id.clone()) {
            return Err(DeckError::DuplicateCard(card.id));
        }
        cards.push(Card::from(card));
    }
    Ok(cards)
}

/// Load a deck from disk, choosing the parser by file extension.
pub fn load_deck<P: AsRef<Path>>(path: P) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let cards = match extension.as_str() {
        "json" => parse_json(&fs::read_to_string(path)?)?,
        "md" | "markdown" => parser::parse_markdown(&fs::read_to_string(path)?)?,
        other => return Err(DeckError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(path = %path.display(), cards = cards.len(), "loaded deck");
    Ok(cards)
}

/// Load a deck, falling back to the sample deck when loading fails.
pub fn load_deck_or_sample<P: AsRef<Path>>(path: P) -> Vec<Card> {
    let path = path.as_ref();
    match load_deck(path) {
        Ok(cards) if !cards.is_empty() => cards,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "deck is empty, using sample cards");
            sample_deck()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load deck, using sample cards");
            sample_deck()
        }
    }
}

/// Built-in five card German deck.
pub fn sample_deck() -> Vec<Card> {
    let entries = [
        ("1", "Hallo", "greeting", "Hello", "Hallo, wie geht es dir?", "Common greeting", "A1", false),
        ("2", "Danke", "expression of gratitude", "Thank you", "Danke für deine Hilfe!", "Polite expression", "A1", true),
        ("3", "Lernen", "verb (infinitive)", "To learn", "Ich möchte Deutsch lernen.", "Regular verb", "A2", false),
        ("4", "Haus", "noun (neuter)", "House", "Das Haus ist sehr groß.", "Das Haus, die Häuser", "A1", false),
        ("5", "Schön", "adjective", "Beautiful / Nice", "Das ist ein schönes Bild.", "Can mean beautiful, nice, or lovely", "A2", false),
    ];

    entries
        .into_iter()
        .map(|(id, word, kind, translation, example, notes, level, favourite)| Card {
            id: id.to_string(),
            content: CardContent {
                front: CardFront {
                    primary_text: word.to_string(),
                    secondary_text: Some(kind.to_string()),
                    audio_url: None,
                    image_url: None,
                },
                back: CardBack {
                    translation: translation.to_string(),
                    example: Some(example.to_string()),
                    notes: Some(notes.to_string()),
                },
                level: Some(level.to_string()),
            },
            is_favourite: favourite,
        })
        .collect()
}
