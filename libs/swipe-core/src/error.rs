//! Error types for swipe-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors that can occur while loading or parsing a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("missing question at line {line}")]
    MissingQuestion { line: usize },

    #[error("missing answer at line {line}")]
    MissingAnswer { line: usize },

    #[error("invalid ID format at line {line}: {value:?}")]
    InvalidId { line: usize, value: String },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: String, line: usize },

    #[error("duplicate card ID {0} in deck")]
    DuplicateCard(String),

    #[error("unsupported deck format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read deck: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by study operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("nothing to undo")]
    EmptyHistory,

    #[error("card {0} is not part of this deck")]
    UnknownCard(String),

    #[error("no card left to answer")]
    DeckExhausted,
}

/// Errors reported by a progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress backend error: {0}")]
    Backend(String),

    #[error("progress serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_history() {
        assert_eq!(SessionError::EmptyHistory.to_string(), "nothing to undo");
    }

    #[test]
    fn display_duplicate_id() {
        let error = DeckError::DuplicateId {
            id: "card_1".to_string(),
            line: 7,
        };
        assert_eq!(error.to_string(), "duplicate ID card_1 at line 7");
    }

    #[test]
    fn display_backend() {
        let error = StoreError::Backend("disk full".to_string());
        assert_eq!(error.to_string(), "progress backend error: disk full");
    }
}
