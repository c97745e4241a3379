//! Background lookups for word lists and definitions
//!
//! Each request runs on its own worker thread and reports back over a
//! channel. The UI loop drains finished results with `poll`; results carry
//! the ticket they were issued with so the engine can drop stale ones.

use crate::game::{Request, Ticket};
use crate::words::{DefinitionSource, FetchError, WordSource};
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// A finished lookup
#[derive(Debug)]
pub enum Completion {
    Words {
        ticket: Ticket,
        result: Result<Vec<String>, FetchError>,
    },
    Definition {
        ticket: Ticket,
        result: Result<Option<String>, FetchError>,
    },
}

/// Runs word and definition lookups off the UI thread
pub struct Fetcher {
    words: Arc<dyn WordSource>,
    definitions: Arc<dyn DefinitionSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl Fetcher {
    pub fn new(words: Arc<dyn WordSource>, definitions: Arc<dyn DefinitionSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            words,
            definitions,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start a lookup for an engine request
    pub fn dispatch(&mut self, request: Request) {
        let tx = self.tx.clone();
        self.in_flight += 1;

        match request {
            Request::FetchWords {
                ticket,
                min_len,
                max_len,
            } => {
                debug!("fetching words {}..={} ({:?})", min_len, max_len, ticket);
                let source = Arc::clone(&self.words);
                thread::spawn(move || {
                    let result = source.random_words(min_len, max_len);
                    // Receiver gone means the session ended; nothing to do
                    let _ = tx.send(Completion::Words { ticket, result });
                });
            }
            Request::FetchDefinition { ticket, word } => {
                debug!("fetching definition for '{}' ({:?})", word, ticket);
                let source = Arc::clone(&self.definitions);
                thread::spawn(move || {
                    let result = source.define(&word);
                    let _ = tx.send(Completion::Definition { ticket, result });
                });
            }
        }
    }

    /// Try to receive one finished lookup (non-blocking)
    pub fn try_recv(&mut self) -> Option<Completion> {
        match self.rx.try_recv() {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(completion)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Receive all finished lookups
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(completion) = self.try_recv() {
            completions.push(completion);
        }
        completions
    }

    /// Number of lookups dispatched but not yet received
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Lexicon;
    use std::time::{Duration, Instant};

    fn wait_for(fetcher: &mut Fetcher, count: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = Vec::new();
        while received.len() < count && Instant::now() < deadline {
            received.extend(fetcher.poll());
            thread::sleep(Duration::from_millis(10));
        }
        received
    }

    fn fetcher() -> Fetcher {
        let lexicon = Arc::new(Lexicon::parse("cloud\tWater in the sky.\nbright\nriver\n"));
        Fetcher::new(lexicon.clone(), lexicon)
    }

    #[test]
    fn test_words_lookup_completes() {
        let mut fetcher = fetcher();
        fetcher.dispatch(Request::FetchWords {
            ticket: Ticket(3),
            min_len: 5,
            max_len: 5,
        });
        assert_eq!(fetcher.in_flight(), 1);

        let completions = wait_for(&mut fetcher, 1);
        assert_eq!(completions.len(), 1);
        match &completions[0] {
            Completion::Words { ticket, result } => {
                assert_eq!(*ticket, Ticket(3));
                let mut words = result.as_ref().unwrap().clone();
                words.sort();
                assert_eq!(words, vec!["cloud", "river"]);
            }
            other => panic!("Expected words, got {:?}", other),
        }
        assert_eq!(fetcher.in_flight(), 0);
    }

    #[test]
    fn test_definition_lookup_completes() {
        let mut fetcher = fetcher();
        fetcher.dispatch(Request::FetchDefinition {
            ticket: Ticket(8),
            word: "cloud".into(),
        });

        let completions = wait_for(&mut fetcher, 1);
        match &completions[0] {
            Completion::Definition { ticket, result } => {
                assert_eq!(*ticket, Ticket(8));
                assert_eq!(result.as_ref().unwrap().as_deref(), Some("Water in the sky."));
            }
            other => panic!("Expected definition, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_lookup_is_reported() {
        let mut fetcher = fetcher();
        fetcher.dispatch(Request::FetchWords {
            ticket: Ticket(1),
            min_len: 9,
            max_len: 9,
        });

        let completions = wait_for(&mut fetcher, 1);
        assert!(matches!(
            &completions[0],
            Completion::Words { result: Err(FetchError::NoWordsInRange { .. }), .. }
        ));
    }

    #[test]
    fn test_poll_empty() {
        let mut fetcher = fetcher();
        assert!(fetcher.poll().is_empty());
    }
}
