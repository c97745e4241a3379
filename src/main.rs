//! anaGrams - unscramble words against the clock
//!
//! Three difficulty levels, a shrinking clock, and a best score per level.

mod app;
mod config;
mod game;
mod services;
mod storage;
mod tui;
mod words;

use anyhow::{Context, Result};
use app::AppCoordinator;
use clap::Parser;
use config::Cli;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::{HighScoreStore, MemoryStore, Storage};
use tui::Tui;
use words::{Lexicon, EMBEDDED};

/// Longest the loop waits for input when nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.resolve_log_file().as_deref())?;
    info!("anagrams {} starting", env!("CARGO_PKG_VERSION"));

    let lexicon = match &cli.lexicon {
        Some(path) => Arc::new(
            Lexicon::load_from_file(path)
                .with_context(|| format!("loading word list {}", path.display()))?,
        ),
        None => Arc::clone(&*EMBEDDED),
    };
    info!("word list has {} entries", lexicon.words().len());

    let store = open_store(&cli);
    let mut coordinator = AppCoordinator::new(
        store,
        lexicon.clone(),
        lexicon,
        !cli.no_splash && cli.difficulty.is_none(),
    );
    if let Some(level) = cli.difficulty {
        coordinator.start_game(level);
    }

    // Initialize terminal
    let mut terminal = Tui::new().context("creating terminal")?;
    terminal.enter().context("entering raw mode")?;

    let result = run(&mut terminal, &mut coordinator);

    // Terminal cleanup also happens via Tui::drop
    terminal.exit().context("restoring terminal")?;
    info!("exiting");
    result
}

/// Main event loop
fn run(terminal: &mut Tui, coordinator: &mut AppCoordinator) -> Result<()> {
    loop {
        let now = Instant::now();
        coordinator.poll(now);
        if coordinator.should_quit {
            return Ok(());
        }

        // Render
        terminal.draw(|frame| tui::render(frame, coordinator, Instant::now()))?;

        // Wait until the next clock tick at most
        let timeout = coordinator
            .next_wakeup(Instant::now())
            .map_or(IDLE_POLL, |t| t.min(IDLE_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => coordinator.on_escape(),
                        KeyCode::Enter => coordinator.on_enter(),
                        KeyCode::Backspace => coordinator.on_backspace(),
                        KeyCode::Up => coordinator.on_up(),
                        KeyCode::Down => coordinator.on_down(),
                        KeyCode::Char(c) => coordinator.on_char(c),
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Open the score database, falling back to memory so the game still runs
fn open_store(cli: &Cli) -> Box<dyn HighScoreStore> {
    match Storage::open(cli.data_dir.as_deref()) {
        Ok(storage) => {
            match storage.all_high_scores() {
                Ok(scores) => info!("loaded {} saved scores", scores.len()),
                Err(e) => warn!("could not list saved scores: {}", e),
            }
            Box::new(storage)
        }
        Err(e) => {
            warn!("score storage unavailable, scores will not be saved: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}
