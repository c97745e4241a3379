//! Command line options and logging setup

use crate::game::Level;
use crate::storage::Storage;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "anagrams.log";

#[derive(Parser, Debug)]
#[command(
    name = "anagrams",
    about = "Unscramble words against the clock",
    version
)]
pub struct Cli {
    /// Skip the menu and start a game: easy, medium or hard
    #[arg(short, long)]
    pub difficulty: Option<Level>,

    /// Word list to play with (word<TAB>definition per line)
    #[arg(short, long)]
    pub lexicon: Option<PathBuf>,

    /// Directory for saved scores and the log file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Write the log here instead of the data directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Go straight to the menu
    #[arg(long, default_value_t = false)]
    pub no_splash: bool,
}

impl Cli {
    /// Data directory: `--data-dir` or the OS default
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| Storage::data_dir().ok())
    }

    /// Log file: `--log-file` or `anagrams.log` in the data directory
    pub fn resolve_log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| self.resolve_data_dir().map(|dir| dir.join(LOG_FILE_NAME)))
    }
}

/// Set up `env_logger`. The terminal belongs to the UI, so records go to a
/// file. With no usable file, logging is off and the game still starts.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(path: Option<&Path>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    match path.map(open_log_file) {
        Some(Ok(file)) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Some(Err(e)) => {
            // Nothing is on screen yet, so stderr is still readable
            eprintln!("anagrams: logging disabled: {:#}", e);
            builder.filter_level(LevelFilter::Off);
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

/// Open the log file for appending, creating its directory first
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}
