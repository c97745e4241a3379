//! Tab-separated word list with optional definitions

use super::{DefinitionSource, FetchError, WordSource, WORD_REQUEST_LIMIT};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Words and their definitions.
///
/// Format: one `word<TAB>definition` per line. A line without a tab is a
/// word with no definition. Blank lines and lines starting with `#` are
/// skipped. Words are lowercased.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: Vec<String>,
    definitions: HashMap<String, String>,
}

impl Lexicon {
    pub fn parse(content: &str) -> Self {
        let mut lexicon = Lexicon::default();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (word, definition) = match trimmed.split_once('\t') {
                Some((w, d)) => (w.trim(), Some(d.trim())),
                None => (trimmed, None),
            };
            if word.is_empty() {
                continue;
            }

            let word = word.to_lowercase();
            if let Some(def) = definition.filter(|d| !d.is_empty()) {
                lexicon
                    .definitions
                    .entry(word.clone())
                    .or_insert_with(|| def.to_string());
            }
            lexicon.words.push(word);
        }

        lexicon
    }

    /// Load a lexicon file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        self.definitions
            .get(&word.to_lowercase())
            .map(String::as_str)
    }

    /// Number of words whose length falls within the range
    #[cfg(test)]
    pub fn count_in_range(&self, min_len: usize, max_len: usize) -> usize {
        self.words
            .iter()
            .filter(|w| in_range(w, min_len, max_len))
            .count()
    }

    /// Random selection using a specific RNG (for testing/seeding).
    pub fn random_words_with_rng<R: Rng + ?Sized>(
        &self,
        min_len: usize,
        max_len: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, FetchError> {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| in_range(w, min_len, max_len))
            .collect();

        if candidates.is_empty() {
            return Err(FetchError::NoWordsInRange {
                min: min_len,
                max: max_len,
            });
        }

        Ok(candidates
            .choose_multiple(rng, WORD_REQUEST_LIMIT)
            .map(|w| (*w).clone())
            .collect())
    }
}

fn in_range(word: &str, min_len: usize, max_len: usize) -> bool {
    let len = word.chars().count();
    len >= min_len && len <= max_len
}

impl WordSource for Lexicon {
    fn random_words(&self, min_len: usize, max_len: usize) -> Result<Vec<String>, FetchError> {
        self.random_words_with_rng(min_len, max_len, &mut rand::rng())
    }
}

impl DefinitionSource for Lexicon {
    fn define(&self, word: &str) -> Result<Option<String>, FetchError> {
        Ok(self.definition(word).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# sample\n\
        cloud\tA visible mass of <em>water</em> droplets.\n\
        Bright\tGiving out much light.\n\
        \n\
        maple\n\
        x-ray\tA form of radiation.\n\
        ox\tA bovine animal.\n";

    #[test]
    fn test_parse_entries() {
        let lexicon = Lexicon::parse(SAMPLE);
        assert_eq!(lexicon.words(), &["cloud", "bright", "maple", "x-ray", "ox"]);
        assert_eq!(
            lexicon.definition("cloud"),
            Some("A visible mass of <em>water</em> droplets.")
        );
        assert_eq!(lexicon.definition("BRIGHT"), Some("Giving out much light."));
        assert_eq!(lexicon.definition("maple"), None);
    }

    #[test]
    fn test_random_words_respect_range() {
        let lexicon = Lexicon::parse(SAMPLE);
        let words = lexicon.random_words(5, 6).unwrap();
        assert_eq!(words.len(), 4);
        for w in &words {
            assert!(w.len() >= 5 && w.len() <= 6, "{} out of range", w);
        }
    }

    #[test]
    fn test_random_words_limit() {
        let content: String = (0..250).map(|i| format!("word{:03}\n", i)).collect();
        let lexicon = Lexicon::parse(&content);
        let words = lexicon.random_words(7, 7).unwrap();
        assert_eq!(words.len(), WORD_REQUEST_LIMIT);
    }

    #[test]
    fn test_random_words_empty_range() {
        let lexicon = Lexicon::parse(SAMPLE);
        assert!(matches!(
            lexicon.random_words(10, 12),
            Err(FetchError::NoWordsInRange { min: 10, max: 12 })
        ));
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        use rand::SeedableRng;

        let content: String = (0..300).map(|i| format!("word{:03}\n", i)).collect();
        let lexicon = Lexicon::parse(&content);
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(9);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(9);

        assert_eq!(
            lexicon.random_words_with_rng(7, 7, &mut rng1).unwrap(),
            lexicon.random_words_with_rng(7, 7, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_define() {
        let lexicon = Lexicon::parse(SAMPLE);
        assert_eq!(
            lexicon.define("ox").unwrap(),
            Some("A bovine animal.".to_string())
        );
        assert_eq!(lexicon.define("maple").unwrap(), None);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("anagrams-lexicon-{}.tsv", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let lexicon = Lexicon::load_from_file(&path).unwrap();
        assert_eq!(lexicon.words().len(), 5);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Lexicon::load_from_file("/definitely/not/here.tsv");
        assert!(matches!(result, Err(FetchError::Io(_))));
    }
}
