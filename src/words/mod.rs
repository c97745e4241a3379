//! Word and definition sources
//!
//! The round engine only sees these through the `WordSource` and
//! `DefinitionSource` traits. The bundled `Lexicon` answers both from a
//! tab-separated list embedded in the binary or loaded from a file.

mod embedded;
pub mod lexicon;

pub use embedded::EMBEDDED;
pub use lexicon::Lexicon;

/// Most words handed out by a single `random_words` call
pub const WORD_REQUEST_LIMIT: usize = 100;

/// Errors from word or definition lookups.
#[derive(Debug)]
pub enum FetchError {
    /// Reading a word list failed
    Io(std::io::Error),
    /// The source has nothing in the requested length range
    NoWordsInRange { min: usize, max: usize },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Io(e) => write!(f, "word list error: {}", e),
            FetchError::NoWordsInRange { min, max } => {
                write!(f, "no words between {} and {} letters", min, max)
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

/// Supplies candidate puzzle words.
pub trait WordSource: Send + Sync {
    /// Up to `WORD_REQUEST_LIMIT` random words whose length is within
    /// `min_len..=max_len`. May contain hyphenated entries.
    fn random_words(&self, min_len: usize, max_len: usize) -> Result<Vec<String>, FetchError>;
}

/// Looks up the meaning of a word.
pub trait DefinitionSource: Send + Sync {
    /// First definition for `word`, raw (may contain markup tags).
    fn define(&self, word: &str) -> Result<Option<String>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::NoWordsInRange { min: 4, max: 6 }.to_string(),
            "no words between 4 and 6 letters"
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(FetchError::from(io).to_string(), "word list error: gone");
    }

    #[test]
    fn test_io_error_converts() {
        let e: FetchError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, FetchError::Io(_)));
    }
}
