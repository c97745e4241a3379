//! Game session state: one round engine wired to its lookups and the
//! messages shown on the puzzle screen

use crate::game::{Difficulty, Phase, RoundEngine, Signal};
use crate::services::{Completion, Fetcher};
use crate::storage::HighScoreStore;
use std::time::{Duration, Instant};

/// Shown after a wrong full-length guess
pub const WRONG_ANSWER_MESSAGE: &str = "Wrong Answer - Try again!";

/// Shown when every word has been solved
pub const EXHAUSTED_MESSAGE: &str = "Easter egg: you beat the game!";

/// Poll interval while lookups are in flight
const FETCH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Choice in the time's-up modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOption {
    Retry,
    Quit,
}

impl ModalOption {
    pub fn all() -> &'static [ModalOption] {
        &[ModalOption::Retry, ModalOption::Quit]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModalOption::Retry => "Retry",
            ModalOption::Quit => "Quit",
        }
    }
}

/// Contents of the time's-up modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeUp {
    pub word: String,
    pub score: u32,
    pub new_high_score: bool,
}

/// One game at one difficulty
pub struct GameSession {
    pub engine: RoundEngine<Box<dyn HighScoreStore>>,
    fetcher: Fetcher,
    /// Feedback message from the last answer
    pub feedback: String,
    /// Set while the time's-up modal is showing
    pub time_up: Option<TimeUp>,
    /// Highlighted choice in the time's-up modal
    pub modal_selected: ModalOption,
    /// Set once the player leaves; the coordinator returns to the menu
    pub should_leave: bool,
}

impl GameSession {
    /// Create the engine and send off its word list request
    pub fn new(difficulty: Difficulty, store: Box<dyn HighScoreStore>, fetcher: Fetcher) -> Self {
        let mut session = Self {
            engine: RoundEngine::new(difficulty, store),
            fetcher,
            feedback: String::new(),
            time_up: None,
            modal_selected: ModalOption::Retry,
            should_leave: false,
        };
        session.pump();
        session
    }

    /// Hand the store back once the session is over
    pub fn into_store(self) -> Box<dyn HighScoreStore> {
        self.engine.into_store()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Handle a typed letter
    pub fn on_char(&mut self, c: char) {
        match self.engine.phase() {
            Phase::Active => {
                self.feedback.clear();
                self.engine.select_letter(c.to_ascii_lowercase());
                self.pump();
            }
            Phase::TimedOut => match c.to_ascii_lowercase() {
                'r' => self.retry(),
                'q' => self.leave(),
                _ => {}
            },
            Phase::Exhausted | Phase::Unavailable => self.leave(),
            Phase::Loading | Phase::Quit => {}
        }
    }

    /// Backspace clears the guess
    pub fn on_backspace(&mut self) {
        if self.engine.phase() == Phase::Active {
            self.engine.reset_guess();
            self.feedback.clear();
        }
    }

    /// Enter confirms the modal choice or dismisses end screens
    pub fn on_enter(&mut self) {
        match self.engine.phase() {
            Phase::TimedOut => match self.modal_selected {
                ModalOption::Retry => self.retry(),
                ModalOption::Quit => self.leave(),
            },
            Phase::Exhausted | Phase::Unavailable => self.leave(),
            _ => {}
        }
    }

    /// Move the modal highlight
    pub fn on_up(&mut self) {
        if self.time_up.is_some() {
            self.modal_selected = ModalOption::Retry;
        }
    }

    pub fn on_down(&mut self) {
        if self.time_up.is_some() {
            self.modal_selected = ModalOption::Quit;
        }
    }

    /// Advance the clock and apply finished lookups
    pub fn tick(&mut self, now: Instant) {
        self.engine.poll_timer(now);
        for completion in self.fetcher.poll() {
            match completion {
                Completion::Words { ticket, result } => {
                    self.engine.on_words_fetched(ticket, result);
                }
                Completion::Definition { ticket, result } => {
                    self.engine.on_definition_fetched(ticket, result);
                }
            }
        }
        self.pump();
    }

    /// How long the event loop may wait before calling `tick` again
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let tick = self.engine.until_next_tick(now);
        if self.fetcher.in_flight() > 0 {
            Some(tick.map_or(FETCH_POLL_INTERVAL, |t| t.min(FETCH_POLL_INTERVAL)))
        } else {
            tick
        }
    }

    /// Start over after the clock ran out
    pub fn retry(&mut self) {
        self.time_up = None;
        self.feedback.clear();
        self.modal_selected = ModalOption::Retry;
        self.engine.restart();
        self.pump();
    }

    /// Quit to the menu
    pub fn leave(&mut self) {
        self.engine.quit();
        self.time_up = None;
        self.should_leave = true;
    }

    /// Send queued requests to the fetcher and turn signals into messages
    fn pump(&mut self) {
        for request in self.engine.take_requests() {
            self.fetcher.dispatch(request);
        }

        for signal in self.engine.take_signals() {
            match signal {
                Signal::WrongAnswer => {
                    self.feedback = WRONG_ANSWER_MESSAGE.to_string();
                }
                Signal::RoundAdvanced { word, points, .. } => {
                    self.feedback = format!("OK +{} ({})", points, word.to_uppercase());
                }
                Signal::TimedOut {
                    word,
                    score,
                    new_high_score,
                } => {
                    self.modal_selected = ModalOption::Retry;
                    self.time_up = Some(TimeUp {
                        word,
                        score,
                        new_high_score,
                    });
                }
                Signal::Exhausted { .. } => {
                    self.feedback = EXHAUSTED_MESSAGE.to_string();
                }
                Signal::WordsUnavailable { reason } => {
                    self.feedback = format!("No words available: {}", reason);
                }
                Signal::DefinitionReady => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Level;
    use crate::storage::MemoryStore;
    use crate::words::{DefinitionSource, FetchError, Lexicon, WordSource};
    use std::sync::Arc;
    use std::thread;

    const LEXICON: &str = "cat\tA small <em>feline</em>.\ndogs\tLoyal pets.\nbirds\n";

    fn offline() -> FetchError {
        FetchError::Io(std::io::Error::other("offline"))
    }

    struct OfflineSource;

    impl WordSource for OfflineSource {
        fn random_words(&self, _min: usize, _max: usize) -> Result<Vec<String>, FetchError> {
            Err(offline())
        }
    }

    impl DefinitionSource for OfflineSource {
        fn define(&self, _word: &str) -> Result<Option<String>, FetchError> {
            Err(offline())
        }
    }

    fn session_with(difficulty: Difficulty, fetcher: Fetcher) -> GameSession {
        GameSession::new(difficulty, Box::new(MemoryStore::new()), fetcher)
    }

    fn lexicon_fetcher() -> Fetcher {
        let lexicon = Arc::new(Lexicon::parse(LEXICON));
        Fetcher::new(lexicon.clone(), lexicon)
    }

    /// Keep ticking until `done` holds or five seconds pass
    fn pump_until(session: &mut GameSession, done: impl Fn(&GameSession) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(session) && Instant::now() < deadline {
            session.tick(Instant::now());
            thread::sleep(Duration::from_millis(5));
        }
        assert!(done(session), "condition not reached in time");
    }

    fn started(difficulty: Difficulty) -> GameSession {
        // Easy bounds are 4..=6; widen so the three-letter word is included
        let mut d = difficulty;
        d.min_length = 3;
        let mut session = session_with(d, lexicon_fetcher());
        pump_until(&mut session, |s| s.phase() != Phase::Loading);
        session
    }

    fn type_word(session: &mut GameSession, word: &str) {
        for c in word.chars() {
            session.on_char(c);
        }
    }

    #[test]
    fn test_session_loads_words_and_definition() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.engine.state().current_word, "cat");

        pump_until(&mut session, |s| s.engine.definition().is_some());
        assert_eq!(session.engine.definition(), Some("A small feline."));
    }

    #[test]
    fn test_correct_answer_feedback() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        type_word(&mut session, "CAT");
        assert_eq!(session.feedback, "OK +200 (CAT)");
        assert_eq!(session.engine.state().current_word, "dogs");
        assert_eq!(session.engine.state().round, 2);
    }

    #[test]
    fn test_wrong_answer_feedback_clears_on_typing() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        type_word(&mut session, "act");
        assert_eq!(session.feedback, WRONG_ANSWER_MESSAGE);
        assert!(session.engine.state().selected.is_empty());

        session.on_char('c');
        assert!(session.feedback.is_empty());
    }

    #[test]
    fn test_backspace_resets_guess() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        session.on_char('c');
        session.on_char('a');
        session.on_backspace();
        assert!(session.engine.state().selected.is_empty());
        assert_eq!(session.engine.state().available, vec!['a', 'c', 't']);
    }

    #[test]
    fn test_time_up_modal_and_retry() {
        let mut session = started(Difficulty::for_level(Level::Easy).with_timer(1));
        session.engine.tick();
        session.tick(Instant::now());

        assert_eq!(session.phase(), Phase::TimedOut);
        let time_up = session.time_up.clone().unwrap();
        assert_eq!(time_up.word, "cat");
        assert_eq!(time_up.score, 0);
        assert!(!time_up.new_high_score);
        assert_eq!(session.modal_selected, ModalOption::Retry);

        session.on_enter();
        assert!(session.time_up.is_none());
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.engine.state().current_word, "dogs");
        assert_eq!(session.engine.state().round, 1);
    }

    #[test]
    fn test_time_up_modal_quit() {
        let mut session = started(Difficulty::for_level(Level::Easy).with_timer(1));
        session.engine.tick();
        session.tick(Instant::now());

        session.on_down();
        assert_eq!(session.modal_selected, ModalOption::Quit);
        session.on_up();
        assert_eq!(session.modal_selected, ModalOption::Retry);
        session.on_down();
        session.on_enter();

        assert!(session.should_leave);
        assert_eq!(session.phase(), Phase::Quit);
    }

    #[test]
    fn test_time_up_shortcut_keys() {
        let mut session = started(Difficulty::for_level(Level::Easy).with_timer(1));
        session.engine.tick();
        session.tick(Instant::now());
        session.on_char('r');
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_beating_the_game() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        type_word(&mut session, "cat");
        type_word(&mut session, "dogs");
        type_word(&mut session, "birds");

        assert_eq!(session.phase(), Phase::Exhausted);
        assert_eq!(session.feedback, EXHAUSTED_MESSAGE);

        session.on_char('x');
        assert!(session.should_leave);
    }

    #[test]
    fn test_offline_source_is_unavailable() {
        let source = Arc::new(OfflineSource);
        let mut session = session_with(
            Difficulty::for_level(Level::Hard),
            Fetcher::new(source.clone(), source),
        );
        pump_until(&mut session, |s| s.phase() != Phase::Loading);

        assert_eq!(session.phase(), Phase::Unavailable);
        assert_eq!(session.feedback, "No words available: word list error: offline");

        session.on_enter();
        assert!(session.should_leave);
    }

    #[test]
    fn test_high_score_kept_in_returned_store() {
        let mut session = started(Difficulty::for_level(Level::Easy));
        type_word(&mut session, "cat");
        session.leave();

        let store = session.into_store();
        assert_eq!(store.get("highScoreEasy").unwrap(), Some(200));
    }

    #[test]
    fn test_next_wakeup_while_fetching() {
        let session = session_with(Difficulty::for_level(Level::Easy), lexicon_fetcher());
        // Word list request is in flight, no clock yet
        assert_eq!(session.next_wakeup(Instant::now()), Some(FETCH_POLL_INTERVAL));
    }

    #[test]
    fn test_modal_option_labels() {
        let labels: Vec<_> = ModalOption::all().iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["Retry", "Quit"]);
    }
}
