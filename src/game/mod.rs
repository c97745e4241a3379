//! Game logic: word supply, scrambling, scoring, the round engine

pub mod definition;
pub mod difficulty;
pub mod engine;
pub mod scoring;
pub mod supply;
pub mod timer;

pub use difficulty::{Difficulty, Level};
pub use engine::{Phase, Request, RoundEngine, Signal, Ticket};
pub use supply::WordSupply;

use rand::prelude::*;

/// Shuffle the characters of a word (Fisher-Yates).
/// Every ordering is equally likely, including the unshuffled one.
pub fn scramble(word: &str) -> Vec<char> {
    scramble_with_rng(word, &mut rand::rng())
}

/// Shuffle using a specific RNG (for testing/seeding).
pub fn scramble_with_rng<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Vec<char> {
    let mut letters: Vec<char> = word.chars().collect();
    letters.shuffle(rng);
    letters
}

/// Letters in ascending order, the way the letter buttons are laid out.
pub fn sorted_letters(letters: &[char]) -> Vec<char> {
    let mut sorted = letters.to_vec();
    sorted.sort_unstable();
    sorted
}
