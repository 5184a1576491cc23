pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::state::AppState;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never land in the study prompt or an export.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);

    let app = AppState::open(config)?;
    let stdout = io::stdout();

    match cli.command() {
        Command::Study { .. } => {
            let summary = commands::run_study(&app, io::stdin().lock(), &mut stdout.lock())?;
            let stats = summary.stats;
            println!(
                "{} known, {} learning, {} favourites.{}",
                stats.known,
                stats.learning,
                stats.favourites,
                if summary.finished { " Deck complete." } else { "" }
            );
        }
        Command::Stats { deck, limit } => {
            let mut app = app;
            if deck.is_some() {
                app.config.deck_path = deck;
            }
            commands::show_stats(&app, limit, &mut stdout.lock())?;
        }
        Command::Export { out } => {
            let found = match &out {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(path)?);
                    let found = commands::export_progress(&app, &mut file)?;
                    file.flush()?;
                    found
                }
                None => commands::export_progress(&app, &mut stdout.lock())?,
            };
            if !found {
                tracing::warn!(profile = %app.config.profile, "no stored progress, exported an empty snapshot");
            }
        }
        Command::Import { path } => {
            let snapshot = commands::import_progress(&app, &path)?;
            println!(
                "Imported {} known and {} learning cards for '{}'.",
                snapshot.known_ids.len(),
                snapshot.learning_ids.len(),
                app.config.profile
            );
        }
        Command::ResetProgress { yes } => {
            if commands::reset_progress(&app, yes)? {
                println!("Progress for '{}' deleted.", app.config.profile);
            } else {
                println!("No stored progress for '{}'.", app.config.profile);
            }
        }
    }

    Ok(())
}
