//! Command line definition.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "swipe-study", about = "Study flashcards with adaptive review injection", version)]
pub struct Cli {
    /// Progress database (overrides SWIPE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Learner profile (overrides SWIPE_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Study a deck interactively (the default)
    Study {
        /// Deck file, markdown or JSON (overrides SWIPE_DECK)
        #[arg(long)]
        deck: Option<PathBuf>,
        /// Continue from the card where the last session stopped
        #[arg(long)]
        resume: bool,
        /// Seed for review intervals (overrides SWIPE_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show stored progress and recent study sessions
    Stats {
        /// Count progress against this deck
        #[arg(long)]
        deck: Option<PathBuf>,
        /// Number of recent sessions to list
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Write stored progress as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace stored progress with an exported JSON file
    Import {
        /// Exported progress file
        path: PathBuf,
    },

    /// Delete stored progress for the profile
    ResetProgress {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Apply flag overrides on top of the environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(profile) = &self.profile {
            config.profile = profile.clone();
        }
        if let Some(Command::Study { deck, resume, seed }) = &self.command {
            if deck.is_some() {
                config.deck_path = deck.clone();
            }
            config.resume |= *resume;
            if seed.is_some() {
                config.seed = *seed;
            }
        }
    }

    /// The subcommand to run; bare `swipe-study` studies.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Study {
            deck: None,
            resume: false,
            seed: None,
        })
    }
}
