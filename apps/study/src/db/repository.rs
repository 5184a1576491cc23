//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use swipe_core::{ProgressSnapshot, SessionStats};
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for progress snapshots.
pub trait ProgressRepository {
    fn get_progress(&self, profile: &str) -> Result<Option<ProgressSnapshot>>;
    fn save_progress(&self, profile: &str, snapshot: &ProgressSnapshot) -> Result<()>;
    fn delete_progress(&self, profile: &str) -> Result<bool>;
}

/// Repository for study session bookkeeping.
pub trait SessionRepository {
    fn start_session(&self, profile: &str, deck: &str) -> Result<Uuid>;
    fn finish_session(&self, id: Uuid, stats: &SessionStats) -> Result<()>;
    fn recent_sessions(&self, profile: &str, limit: usize) -> Result<Vec<SessionRecord>>;
    fn session_totals(&self, profile: &str) -> Result<SessionTotals>;
}

/// A recorded study session.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub deck: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_known: usize,
    pub cards_learning: usize,
    pub cards_shown: usize,
    pub reviews_shown: usize,
}

impl SessionRecord {
    pub fn duration_secs(&self) -> Option<i64> {
        self.ended_at
            .map(|end| (end - self.started_at).num_seconds().max(0))
    }
}

/// Aggregates over all sessions of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionTotals {
    pub sessions: usize,
    pub cards_shown: usize,
    pub reviews_shown: usize,
    pub total_secs: i64,
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<(String, SessionRecord)> {
        let id: String = row.get(0)?;
        let started_at: String = row.get(2)?;
        let ended_at: Option<String> = row.get(3)?;
        Ok((
            id.clone(),
            SessionRecord {
                id: Uuid::parse_str(&id).unwrap_or_default(),
                deck: row.get(1)?,
                started_at: parse_timestamp(&started_at).unwrap_or_default(),
                ended_at: ended_at.as_deref().and_then(parse_timestamp),
                cards_known: count(row, 4)?,
                cards_learning: count(row, 5)?,
                cards_shown: count(row, 6)?,
                reviews_shown: count(row, 7)?,
            },
        ))
    }
}

/// Non-negative counter column; anything else reads as zero.
fn count(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<usize> {
    let value: i64 = row.get(idx)?;
    Ok(usize::try_from(value).unwrap_or(0))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

impl ProgressRepository for SqliteRepository {
    fn get_progress(&self, profile: &str) -> Result<Option<ProgressSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot FROM progress WHERE profile = ?1",
                params![profile],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|json| {
            ProgressSnapshot::from_json(&json)
                .map_err(|e| DbError::InvalidData(format!("progress for {}: {}", profile, e)))
        })
        .transpose()
    }

    fn save_progress(&self, profile: &str, snapshot: &ProgressSnapshot) -> Result<()> {
        let json = snapshot
            .to_json()
            .map_err(|e| DbError::InvalidData(e.to_string()))?;
        let saved_at = snapshot.saved_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.conn.execute(
            "INSERT INTO progress (profile, snapshot, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(profile) DO UPDATE SET snapshot = excluded.snapshot, saved_at = excluded.saved_at",
            params![profile, json, saved_at],
        )?;
        Ok(())
    }

    fn delete_progress(&self, profile: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM progress WHERE profile = ?1", params![profile])?;
        Ok(count > 0)
    }
}

impl SessionRepository for SqliteRepository {
    fn start_session(&self, profile: &str, deck: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO study_sessions (id, profile, deck, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), profile, deck, Utc::now().to_rfc3339()],
        )?;
        Ok(id)
    }

    fn finish_session(&self, id: Uuid, stats: &SessionStats) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE study_sessions
             SET ended_at = ?1, cards_known = ?2, cards_learning = ?3, cards_shown = ?4, reviews_shown = ?5
             WHERE id = ?6",
            params![
                Utc::now().to_rfc3339(),
                stats.known as i64,
                stats.learning as i64,
                (stats.linear_shown + stats.reviews_shown) as i64,
                stats.reviews_shown as i64,
                id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(DbError::InvalidData(format!("unknown study session {}", id)));
        }
        Ok(())
    }

    fn recent_sessions(&self, profile: &str, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, deck, started_at, ended_at, cards_known, cards_learning, cards_shown, reviews_shown
             FROM study_sessions WHERE profile = ?1
             ORDER BY started_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![profile, limit as i64], Self::row_to_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            let (raw_id, record) = row?;
            if record.id.is_nil() {
                tracing::warn!(id = %raw_id, "skipping study session with malformed id");
                continue;
            }
            sessions.push(record);
        }
        Ok(sessions)
    }

    fn session_totals(&self, profile: &str) -> Result<SessionTotals> {
        let mut stmt = self.conn.prepare(
            "SELECT id, deck, started_at, ended_at, cards_known, cards_learning, cards_shown, reviews_shown
             FROM study_sessions WHERE profile = ?1",
        )?;
        let rows = stmt.query_map(params![profile], Self::row_to_session)?;

        let mut totals = SessionTotals::default();
        for row in rows {
            let (_, record) = row?;
            totals.sessions += 1;
            totals.cards_shown += record.cards_shown;
            totals.reviews_shown += record.reviews_shown;
            totals.total_secs += record.duration_secs().unwrap_or(0);
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot() -> ProgressSnapshot {
        ProgressSnapshot {
            known_ids: ["1".to_string()].into_iter().collect(),
            learning_ids: ["2".to_string()].into_iter().collect(),
            next_review_interval: Some(14),
            last_card_index: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn progress_roundtrip_per_profile() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(repo.get_progress("anna").unwrap().is_none());

        repo.save_progress("anna", &snapshot()).unwrap();
        assert_eq!(repo.get_progress("anna").unwrap(), Some(snapshot()));
        assert!(repo.get_progress("ben").unwrap().is_none());
    }

    #[test]
    fn save_progress_overwrites() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.save_progress("anna", &snapshot()).unwrap();

        let mut newer = snapshot();
        newer.cards_since_last_review = 9;
        repo.save_progress("anna", &newer).unwrap();
        assert_eq!(
            repo.get_progress("anna").unwrap().unwrap().cards_since_last_review,
            9
        );
    }

    #[test]
    fn delete_progress() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.save_progress("anna", &snapshot()).unwrap();
        assert!(repo.delete_progress("anna").unwrap());
        assert!(!repo.delete_progress("anna").unwrap());
        assert!(repo.get_progress("anna").unwrap().is_none());
    }

    #[test]
    fn corrupt_progress_is_invalid_data() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn
            .execute(
                "INSERT INTO progress (profile, snapshot, saved_at) VALUES ('anna', '{oops', '')",
                [],
            )
            .unwrap();
        assert!(matches!(repo.get_progress("anna"), Err(DbError::InvalidData(_))));
    }

    #[test]
    fn session_lifecycle() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = repo.start_session("anna", "german.json").unwrap();

        let stats = SessionStats {
            known: 3,
            learning: 2,
            linear_shown: 5,
            reviews_shown: 1,
            ..Default::default()
        };
        repo.finish_session(id, &stats).unwrap();

        let sessions = repo.recent_sessions("anna", 10).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].deck, "german.json");
        assert_eq!(sessions[0].cards_shown, 6);
        assert_eq!(sessions[0].reviews_shown, 1);
        assert!(sessions[0].ended_at.is_some());

        let totals = repo.session_totals("anna").unwrap();
        assert_eq!(totals.sessions, 1);
        assert_eq!(totals.cards_shown, 6);
        assert!(totals.total_secs >= 0);
        assert_eq!(repo.session_totals("ben").unwrap(), SessionTotals::default());
    }

    #[test]
    fn negative_counts_read_as_zero() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = repo.start_session("anna", "sample").unwrap();
        repo.conn
            .execute(
                "UPDATE study_sessions SET cards_shown = -3, reviews_shown = -1 WHERE id = ?1",
                params![id.to_string()],
            )
            .unwrap();

        let sessions = repo.recent_sessions("anna", 1).unwrap();
        assert_eq!(sessions[0].cards_shown, 0);
        assert_eq!(sessions[0].reviews_shown, 0);
        assert_eq!(repo.session_totals("anna").unwrap().cards_shown, 0);
    }

    #[test]
    fn finish_unknown_session_fails() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let result = repo.finish_session(Uuid::new_v4(), &SessionStats::default());
        assert!(matches!(result, Err(DbError::InvalidData(_))));
    }

    #[test]
    fn schema_version_recorded() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.schema_version().unwrap(), crate::db::schema::SCHEMA_VERSION);
    }
}
