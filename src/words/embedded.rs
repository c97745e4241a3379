//! Lexicon compiled into the binary

use super::lexicon::Lexicon;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Embedded word list: `word<TAB>definition`, one entry per line
static LEXICON_DATA: &str = include_str!("../../data/lexicon.tsv");

/// Parsed once on first use
pub static EMBEDDED: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::parse(LEXICON_DATA)));
