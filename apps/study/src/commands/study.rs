//! Interactive study loop.

use super::CommandError;
use crate::db::{BackgroundStore, SessionRepository};
use crate::state::AppState;
use std::io::{self, BufRead, Write};
use swipe_core::{
    load_deck_or_sample, sample_deck, NextCard, Outcome, ProgressStore, RandomSource,
    ReviewRandom, SessionError, SessionOptions, SessionStats, StudySession,
};

const HELP: &str = "keys: k/→ known  l/← learning  enter flip  u undo  f favourite  r restart  s stats  q quit";

/// A line typed at the study prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyKey {
    Known,
    Learning,
    Flip,
    Undo,
    Favourite,
    Reset,
    Stats,
    Help,
    Quit,
}

impl StudyKey {
    pub fn parse(input: &str) -> Option<Self> {
        // Arrow keys arrive as escape sequences in line mode.
        let key = match input.trim().to_ascii_lowercase().as_str() {
            "k" | "right" | "→" | "\u{1b}[c" => Self::Known,
            "l" | "left" | "←" | "\u{1b}[d" => Self::Learning,
            "" | "flip" => Self::Flip,
            "u" | "undo" => Self::Undo,
            "f" | "fav" | "favourite" => Self::Favourite,
            "r" | "reset" | "restart" => Self::Reset,
            "s" | "stats" => Self::Stats,
            "h" | "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(key)
    }
}

/// What a study run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySummary {
    pub deck: String,
    pub stats: SessionStats,
    pub finished: bool,
}

/// Study the configured deck, reading keys from `input`.
///
/// Progress is written by a background thread and is on disk when this
/// returns. The run is recorded as a study session row.
pub fn run_study<I: BufRead, O: Write>(
    app: &AppState,
    input: I,
    out: &mut O,
) -> Result<StudySummary, CommandError> {
    let config = &app.config;
    let (cards, deck) = match &config.deck_path {
        Some(path) => (load_deck_or_sample(path), path.display().to_string()),
        None => (sample_deck(), "sample".to_string()),
    };
    let random = match config.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    let options = SessionOptions {
        resume_position: config.resume,
        ..Default::default()
    };

    let store = BackgroundStore::spawn(app.progress_store());
    let mut session = StudySession::start(cards, store, random, options);

    let session_id = match app
        .repo()
        .and_then(|repo| repo.start_session(&config.profile, &deck))
    {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(error = %e, "could not record study session");
            None
        }
    };
    tracing::info!(profile = %config.profile, deck = %deck, "study session started");

    study_loop(&mut session, input, out)?;

    if let Err(e) = session.flush() {
        tracing::warn!(error = %e, "progress not saved on quit");
    }
    let stats = session.stats();
    let finished = session.state().is_finished();
    let last = session.snapshot();
    match session.into_store().close() {
        Ok(written) => tracing::debug!(written, "progress writer stopped"),
        Err(e) => {
            tracing::warn!(error = %e, "last progress write failed, retrying");
            if let Err(e) = app.progress_store().save(&last) {
                tracing::error!(error = %e, "progress not saved");
                writeln!(out, "Warning: progress could not be saved ({}).", e)?;
            }
        }
    }

    if let Some(id) = session_id {
        if let Err(e) = app.repo().and_then(|repo| repo.finish_session(id, &stats)) {
            tracing::warn!(error = %e, "could not finish study session");
        }
    }
    tracing::info!(
        known = stats.known,
        learning = stats.learning,
        reviews = stats.reviews_shown,
        "study session ended"
    );

    Ok(StudySummary {
        deck,
        stats,
        finished,
    })
}

fn study_loop<S, R, I, O>(
    session: &mut StudySession<S, R>,
    input: I,
    out: &mut O,
) -> io::Result<()>
where
    S: ProgressStore,
    R: ReviewRandom,
    I: BufRead,
    O: Write,
{
    let mut lines = input.lines();
    let mut flipped = false;
    writeln!(out, "{}", HELP)?;

    loop {
        match session.current().cloned() {
            Some(turn) => render_card(out, session, &turn, flipped)?,
            None => {
                let stats = session.stats();
                writeln!(
                    out,
                    "Deck complete: {} known, {} learning. r restarts, u undoes, q quits.",
                    stats.known, stats.learning
                )?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;

        let Some(key) = StudyKey::parse(&line) else {
            writeln!(out, "Unknown key {:?}. {}", line.trim(), HELP)?;
            continue;
        };

        match key {
            StudyKey::Known | StudyKey::Learning => {
                let outcome = if key == StudyKey::Known {
                    Outcome::Known
                } else {
                    Outcome::Learning
                };
                match session.record(outcome) {
                    Ok(_) => flipped = false,
                    Err(SessionError::DeckExhausted) => writeln!(out, "No card to grade.")?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            StudyKey::Flip => flipped = !flipped,
            StudyKey::Undo => match session.undo() {
                Ok(entry) => {
                    flipped = false;
                    let label = match entry.outcome {
                        Outcome::Known => "known",
                        Outcome::Learning => "learning",
                    };
                    writeln!(out, "Undid {} for card {}.", label, entry.card_id)?;
                }
                Err(SessionError::EmptyHistory) => writeln!(out, "Nothing to undo.")?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            StudyKey::Favourite => {
                let Some(card_id) = session.current().map(|turn| turn.card.id.clone()) else {
                    writeln!(out, "No card to mark.")?;
                    continue;
                };
                match session.toggle_favourite(&card_id) {
                    Ok(true) => writeln!(out, "Added to favourites.")?,
                    Ok(false) => writeln!(out, "Removed from favourites.")?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            StudyKey::Reset => {
                session.reset();
                flipped = false;
                writeln!(out, "Back to the first card.")?;
            }
            StudyKey::Stats => render_stats(out, &session.stats())?,
            StudyKey::Help => writeln!(out, "{}", HELP)?,
            StudyKey::Quit => return Ok(()),
        }
    }
}

fn render_card<S, R, O>(
    out: &mut O,
    session: &StudySession<S, R>,
    turn: &NextCard,
    flipped: bool,
) -> io::Result<()>
where
    S: ProgressStore,
    R: ReviewRandom,
    O: Write,
{
    let front = &turn.card.content.front;
    let mut header = format!("[{}] {}", session.progress_label(), front.primary_text);
    if let Some(secondary) = &front.secondary_text {
        header.push_str(&format!("  ({})", secondary));
    }
    if session.is_favourite(&turn.card.id) {
        header.push_str("  ★");
    }
    if turn.is_review_card {
        header.push_str("  [review]");
    }
    writeln!(out, "{}", header)?;

    if flipped {
        let back = &turn.card.content.back;
        writeln!(out, "  = {}", back.translation)?;
        if let Some(example) = &back.example {
            writeln!(out, "    {}", example)?;
        }
        if let Some(notes) = &back.notes {
            writeln!(out, "    note: {}", notes)?;
        }
    }
    Ok(())
}

fn render_stats<O: Write>(out: &mut O, stats: &SessionStats) -> io::Result<()> {
    writeln!(
        out,
        "{} cards, at {} | known {} | learning {} | favourites {} | shown {} linear, {} review",
        stats.total_cards,
        stats.position,
        stats.known,
        stats.learning,
        stats.favourites,
        stats.linear_shown,
        stats.reviews_shown
    )
}
