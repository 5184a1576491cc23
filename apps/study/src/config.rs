//! Runtime configuration from the environment (and `.env`).

use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SWIPE_DB_PATH";
pub const DECK_VAR: &str = "SWIPE_DECK";
pub const PROFILE_VAR: &str = "SWIPE_PROFILE";
pub const SEED_VAR: &str = "SWIPE_SEED";
pub const RESUME_VAR: &str = "SWIPE_RESUME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub deck_path: Option<PathBuf>,
    pub profile: String,
    pub seed: Option<u64>,
    pub resume: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            deck_path: None,
            profile: "default".to_string(),
            seed: None,
            resume: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }
        config.deck_path = get(DECK_VAR).map(PathBuf::from);
        if let Some(profile) = get(PROFILE_VAR) {
            config.profile = profile.trim().to_string();
        }
        if let Some(seed) = get(SEED_VAR) {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => tracing::warn!(value = %seed, "ignoring invalid {}", SEED_VAR),
            }
        }
        if let Some(resume) = get(RESUME_VAR) {
            config.resume = matches!(resume.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swipe-deck")
        .join("progress.db")
}
