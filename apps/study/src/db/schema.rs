//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local progress database.
pub const SCHEMA: &str = r#"
-- Latest progress snapshot per profile
CREATE TABLE IF NOT EXISTS progress (
    profile TEXT PRIMARY KEY,
    snapshot TEXT NOT NULL,
    saved_at TEXT NOT NULL
);

-- One row per study run
CREATE TABLE IF NOT EXISTS study_sessions (
    id TEXT PRIMARY KEY,
    profile TEXT NOT NULL,
    deck TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at TEXT,
    cards_known INTEGER NOT NULL DEFAULT 0,
    cards_learning INTEGER NOT NULL DEFAULT 0,
    cards_shown INTEGER NOT NULL DEFAULT 0,
    reviews_shown INTEGER NOT NULL DEFAULT 0
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_study_sessions_profile ON study_sessions(profile, started_at);
"#;

/// Record the schema version if not exists.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
