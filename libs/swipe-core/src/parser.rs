//! Markdown parser for deck files.
//!
//! # Format
//! ```markdown
//! ID: haus
//! Q: Haus
//! A: House
//!
//! Q: Schön
//! A: Beautiful / Nice
//! Can mean beautiful, nice, or lovely.
//! ```
//!
//! Cards without an `ID:` line get `card_<n>`, where `n` is the card's
//! 1-based position in the file.

use crate::error::{DeckError, Result};
use crate::types::Card;
use std::collections::HashSet;

/// Parse markdown content into cards, in file order.
pub fn parse_markdown(content: &str) -> Result<Vec<Card>> {
    let mut deck = DeckParser::default();
    for (idx, line) in content.lines().enumerate() {
        deck.feed(Line::classify(line), idx + 1)?;
    }
    deck.finish()
}

enum Line<'a> {
    Id(&'a str),
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let tagged = [
            ("ID:", Line::Id as fn(&'a str) -> Line<'a>),
            ("Q:", Line::Question),
            ("A:", Line::Answer),
        ];
        tagged
            .into_iter()
            .find_map(|(tag, make)| trimmed.strip_prefix(tag).map(|rest| make(rest.trim())))
            .unwrap_or(Line::Text(raw))
    }
}

/// Which field continuation lines belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Question,
    Answer,
}

/// A card still being read.
#[derive(Default)]
struct Draft {
    id: Option<String>,
    question: Vec<String>,
    answer: Vec<String>,
    section: Option<Section>,
    line: usize,
}

impl Draft {
    fn at(line: usize) -> Self {
        Self {
            line,
            ..Default::default()
        }
    }

    fn is_started(&self) -> bool {
        self.section.is_some()
    }

    fn push(&mut self, text: &str) {
        match self.section {
            Some(Section::Question) => self.question.push(text.to_string()),
            Some(Section::Answer) => self.answer.push(text.to_string()),
            None => {}
        }
    }

    fn into_card(self, position: usize) -> Result<Card> {
        if self.question.is_empty() {
            return Err(DeckError::MissingQuestion { line: self.line });
        }
        if self.answer.is_empty() {
            return Err(DeckError::MissingAnswer { line: self.line });
        }
        let id = self.id.unwrap_or_else(|| format!("card_{}", position));
        let question = self.question.join("\n");
        let answer = self.answer.join("\n");
        Ok(Card::new(id, question.trim(), answer.trim()))
    }
}

#[derive(Default)]
struct DeckParser {
    cards: Vec<Card>,
    ids: HashSet<String>,
    draft: Option<Draft>,
}

impl DeckParser {
    fn feed(&mut self, line: Line<'_>, line_num: usize) -> Result<()> {
        match line {
            Line::Id(id) => {
                if id.is_empty() || id.chars().any(char::is_whitespace) {
                    return Err(DeckError::InvalidId {
                        line: line_num,
                        value: id.to_string(),
                    });
                }
                self.close_started()?;
                let draft = self.draft_at(line_num);
                // Two ID lines for one card.
                if draft.id.is_some() {
                    return Err(DeckError::InvalidId {
                        line: line_num,
                        value: id.to_string(),
                    });
                }
                draft.id = Some(id.to_string());
            }
            Line::Question(text) => {
                // A new question closes the card before it.
                self.close_started()?;
                let draft = self.draft_at(line_num);
                draft.section = Some(Section::Question);
                draft.question.push(text.to_string());
            }
            Line::Answer(text) => {
                let draft = self.draft_at(line_num);
                draft.section = Some(Section::Answer);
                draft.answer.push(text.to_string());
            }
            Line::Text(text) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.push(if text.trim().is_empty() { "" } else { text });
                }
            }
        }
        Ok(())
    }

    fn draft_at(&mut self, line_num: usize) -> &mut Draft {
        self.draft.get_or_insert_with(|| Draft::at(line_num))
    }

    fn close_started(&mut self) -> Result<()> {
        if self.draft.as_ref().is_some_and(Draft::is_started) {
            self.close()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(draft) = self.draft.take() else {
            return Ok(());
        };
        let line = draft.line;
        let card = draft.into_card(self.cards.len() + 1)?;
        if !self.ids.insert(card.id.clone()) {
            return Err(DeckError::DuplicateId { id: card.id, line });
        }
        self.cards.push(card);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Card>> {
        self.close()?;
        Ok(self.cards)
    }
}
