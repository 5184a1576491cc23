//! Persisted progress.
//!
//! Serialized as camelCase JSON, the same shape the browser tool exports, so
//! exported progress files can be imported in either direction.

use crate::error::StoreError;
use crate::state::DeckState;
use crate::types::ReviewWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Durable progress for one learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub known_ids: BTreeSet<String>,
    #[serde(default)]
    pub learning_ids: BTreeSet<String>,
    #[serde(default)]
    pub favourites: BTreeSet<String>,
    #[serde(default)]
    pub cards_since_last_review: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_card_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            known_ids: BTreeSet::new(),
            learning_ids: BTreeSet::new(),
            favourites: BTreeSet::new(),
            cards_since_last_review: 0,
            next_review_interval: None,
            last_card_index: None,
            saved_at: None,
            version: SNAPSHOT_VERSION,
        }
    }
}

impl ProgressSnapshot {
    /// Capture the durable parts of `state`.
    pub fn capture(state: &DeckState, favourites: &BTreeSet<String>) -> Self {
        Self {
            known_ids: state.known_ids().clone(),
            learning_ids: state.learning_ids().clone(),
            favourites: favourites.clone(),
            cards_since_last_review: state.cards_since_last_review(),
            next_review_interval: Some(state.next_review_interval()),
            last_card_index: Some(state.cursor()),
            saved_at: Some(Utc::now()),
            version: SNAPSHOT_VERSION,
        }
    }

    /// Clamp or default anything a stored snapshot should not be trusted on.
    ///
    /// - blank ids are dropped
    /// - ids in both sets stay only in `learning_ids`
    /// - the interval is clamped into `window`
    /// - `last_card_index` is clamped to `deck_len`
    pub fn sanitize(mut self, window: ReviewWindow, deck_len: usize) -> Self {
        let non_blank = |id: &String| !id.trim().is_empty();
        self.known_ids.retain(non_blank);
        self.learning_ids.retain(non_blank);
        self.favourites.retain(non_blank);

        let overlap: Vec<String> = self
            .known_ids
            .intersection(&self.learning_ids)
            .cloned()
            .collect();
        if !overlap.is_empty() {
            tracing::warn!(count = overlap.len(), "card ids filed as both known and learning");
            for id in &overlap {
                self.known_ids.remove(id);
            }
        }

        if let Some(interval) = self.next_review_interval {
            if !window.contains(interval) {
                tracing::warn!(interval, "stored review interval out of range, clamping");
                self.next_review_interval = Some(window.clamp(interval));
            }
        }

        if let Some(index) = self.last_card_index {
            if index > deck_len {
                tracing::warn!(index, deck_len, "stored card index beyond deck, clamping");
                self.last_card_index = Some(deck_len);
            }
        }

        self
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sanitize_clamps_interval_and_index() {
        let snapshot = ProgressSnapshot {
            next_review_interval: Some(400),
            last_card_index: Some(99),
            ..Default::default()
        };
        let clean = snapshot.sanitize(ReviewWindow::default(), 10);
        assert_eq!(clean.next_review_interval, Some(50));
        assert_eq!(clean.last_card_index, Some(10));

        let low = ProgressSnapshot {
            next_review_interval: Some(1),
            ..Default::default()
        };
        assert_eq!(
            low.sanitize(ReviewWindow::default(), 10).next_review_interval,
            Some(5)
        );
    }

    #[test]
    fn sanitize_resolves_overlap_and_blanks() {
        let snapshot = ProgressSnapshot {
            known_ids: ids(&["a", "b", " "]),
            learning_ids: ids(&["b", "c", ""]),
            ..Default::default()
        };
        let clean = snapshot.sanitize(ReviewWindow::default(), 3);
        assert_eq!(clean.known_ids, ids(&["a"]));
        assert_eq!(clean.learning_ids, ids(&["b", "c"]));
    }

    #[test]
    fn sanitize_keeps_missing_interval_missing() {
        let clean = ProgressSnapshot::default().sanitize(ReviewWindow::default(), 0);
        assert_eq!(clean.next_review_interval, None);
    }

    #[test]
    fn reads_browser_export() {
        let json = r#"{
            "knownIds": ["card_1", "card_2"],
            "learningIds": ["card_3"],
            "favourites": ["card_2"],
            "theme": "dark",
            "lastCardIndex": 3,
            "totalSessionTime": 120000,
            "timestamp": 1718000000000,
            "version": 2
        }"#;
        let snapshot = ProgressSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.known_ids, ids(&["card_1", "card_2"]));
        assert_eq!(snapshot.learning_ids, ids(&["card_3"]));
        assert_eq!(snapshot.favourites, ids(&["card_2"]));
        assert_eq!(snapshot.last_card_index, Some(3));
        assert_eq!(snapshot.cards_since_last_review, 0);
        assert_eq!(snapshot.next_review_interval, None);
    }

    #[test]
    fn json_uses_camel_case() {
        let snapshot = ProgressSnapshot {
            learning_ids: ids(&["x"]),
            next_review_interval: Some(12),
            ..Default::default()
        };
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"learningIds\""));
        assert!(json.contains("\"nextReviewInterval\": 12"));
        assert_eq!(ProgressSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ProgressSnapshot::from_json("[1, 2"),
            Err(StoreError::Serialization(_))
        ));
    }
}
