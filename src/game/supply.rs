//! The pool of candidate words for one game session

use std::collections::VecDeque;

/// Ordered queue of words for the active difficulty, shortest first.
/// Each round dequeues from the front; an empty queue means the player
/// has solved every word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSupply {
    words: VecDeque<String>,
}

impl WordSupply {
    /// Build a supply from raw source words: drop empty and hyphenated
    /// words, then order by character count. Order among equal lengths is unspecified.
    pub fn prepare<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = raw
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty() && !w.contains('-'))
            .collect();
        words.sort_by_key(|w| w.chars().count());
        Self {
            words: words.into(),
        }
    }

    /// Remove and return the shortest remaining word
    pub fn dequeue(&mut self) -> Option<String> {
        self.words.pop_front()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
