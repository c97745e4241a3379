//! Round engine: the state machine behind the puzzle screen
//!
//! The engine owns all per-round state and is only changed through its
//! methods, one event at a time: a letter typed, a clock tick, a lookup
//! finishing. It never blocks and never spawns anything itself. Lookups it
//! needs are queued as `Request`s and things the UI should react to are
//! queued as `Signal`s; the session drains both after every event.

use super::definition::{display_text, DEFINITION_UNAVAILABLE};
use super::scoring::compute_points;
use super::timer::Countdown;
use super::{scramble, sorted_letters, Difficulty, WordSupply};
use crate::storage::HighScoreStore;
use crate::words::FetchError;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Identifies one lookup request. Only the latest ticket of each kind is
/// honoured when its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u64);

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the word list
    Loading,
    /// A round is in progress and the clock is running
    Active,
    /// The clock ran out; waiting for retry or quit
    TimedOut,
    /// Every word has been solved
    Exhausted,
    /// The word list could not be fetched
    Unavailable,
    /// Left the game; nothing else is applied
    Quit,
}

/// Lookups the engine wants performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchWords {
        ticket: Ticket,
        min_len: usize,
        max_len: usize,
    },
    FetchDefinition {
        ticket: Ticket,
        word: String,
    },
}

/// Notifications for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A full-length guess was wrong; the guess has been reset
    WrongAnswer,
    /// Correct answer; `round` is the new round number
    RoundAdvanced {
        word: String,
        round: u32,
        score: u32,
        points: u32,
    },
    /// The clock ran out
    TimedOut {
        word: String,
        score: u32,
        new_high_score: bool,
    },
    /// No words left: the player beat the game
    Exhausted { score: u32 },
    /// The word list could not be loaded
    WordsUnavailable { reason: String },
    /// The definition for the current word arrived
    DefinitionReady,
}

/// Everything shown on the puzzle screen.
///
/// `available` and `selected` together always hold exactly the letters of
/// `scrambled`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub current_word: String,
    pub scrambled: Vec<char>,
    /// Letters not yet picked, in ascending order
    pub available: Vec<char>,
    /// Letters picked so far, in pick order
    pub selected: Vec<char>,
    pub time_remaining: u32,
    pub round: u32,
    pub score: u32,
    pub high_score: u32,
}

impl RoundState {
    pub fn scrambled_word(&self) -> String {
        self.scrambled.iter().collect()
    }

    pub fn guess(&self) -> String {
        self.selected.iter().collect()
    }
}

/// Drives rounds for one difficulty
pub struct RoundEngine<S> {
    difficulty: Difficulty,
    store: S,
    supply: WordSupply,
    state: RoundState,
    phase: Phase,
    definition: Option<String>,
    timer: Countdown,
    next_ticket: u64,
    words_ticket: Option<Ticket>,
    definition_ticket: Option<Ticket>,
    requests: VecDeque<Request>,
    signals: VecDeque<Signal>,
}

impl<S: HighScoreStore> RoundEngine<S> {
    /// Create an engine for a difficulty. Reads the stored high score and
    /// queues the word list request.
    pub fn new(difficulty: Difficulty, store: S) -> Self {
        let high_score = match store.get(difficulty.high_score_key) {
            Ok(score) => score.unwrap_or(0),
            Err(e) => {
                warn!(
                    "could not load high score '{}': {}",
                    difficulty.high_score_key, e
                );
                0
            }
        };

        let mut engine = Self {
            state: RoundState {
                round: 1,
                time_remaining: difficulty.timer_seconds,
                high_score,
                ..Default::default()
            },
            difficulty,
            store,
            supply: WordSupply::default(),
            phase: Phase::Loading,
            definition: None,
            timer: Countdown::default(),
            next_ticket: 0,
            words_ticket: None,
            definition_ticket: None,
            requests: VecDeque::new(),
            signals: VecDeque::new(),
        };

        let ticket = engine.issue_ticket();
        engine.words_ticket = Some(ticket);
        engine.requests.push_back(Request::FetchWords {
            ticket,
            min_len: engine.difficulty.min_length,
            max_len: engine.difficulty.max_length,
        });

        engine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Definition of the current word, once it has arrived
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Words left after the current one
    pub fn words_remaining(&self) -> usize {
        self.supply.len()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back when the session ends
    pub fn into_store(self) -> S {
        self.store
    }

    /// Drain queued lookup requests
    pub fn take_requests(&mut self) -> Vec<Request> {
        self.requests.drain(..).collect()
    }

    /// Drain queued UI signals
    pub fn take_signals(&mut self) -> Vec<Signal> {
        self.signals.drain(..).collect()
    }

    /// Time until the next clock tick, if the clock is running
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.until_next(now)
    }

    /// Apply the result of a word list lookup. Returns false if the result
    /// was stale and ignored.
    pub fn on_words_fetched(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<String>, FetchError>,
    ) -> bool {
        if self.words_ticket != Some(ticket) {
            debug!("discarding stale word list ({:?})", ticket);
            return false;
        }
        self.words_ticket = None;

        match result {
            Ok(words) => {
                self.supply = WordSupply::prepare(words);
                if self.supply.is_empty() {
                    self.make_unavailable("no words available".to_string());
                } else {
                    info!(
                        "loaded {} words for {}",
                        self.supply.len(),
                        self.difficulty.level
                    );
                    self.start_round();
                }
            }
            Err(e) => {
                warn!("failed to fetch words: {}", e);
                self.make_unavailable(e.to_string());
            }
        }
        true
    }

    /// Apply the result of a definition lookup. Returns false if it was for
    /// a word that is no longer on screen.
    pub fn on_definition_fetched(
        &mut self,
        ticket: Ticket,
        result: Result<Option<String>, FetchError>,
    ) -> bool {
        if self.definition_ticket != Some(ticket) {
            debug!("discarding stale definition ({:?})", ticket);
            return false;
        }
        self.definition_ticket = None;

        self.definition = Some(match result {
            Ok(text) => display_text(text.as_deref()),
            Err(e) => {
                warn!(
                    "failed to fetch definition for '{}': {}",
                    self.state.current_word, e
                );
                DEFINITION_UNAVAILABLE.to_string()
            }
        });
        self.signals.push_back(Signal::DefinitionReady);
        true
    }

    /// Begin the next round with the shortest remaining word, or finish the
    /// game if none are left.
    pub fn start_round(&mut self) {
        if self.phase == Phase::Quit {
            return;
        }

        self.timer.cancel();
        self.definition = None;
        self.definition_ticket = None;

        let Some(word) = self.supply.dequeue() else {
            self.phase = Phase::Exhausted;
            self.state.selected.clear();
            info!(
                "word list exhausted at round {} with score {}",
                self.state.round, self.state.score
            );
            self.signals.push_back(Signal::Exhausted {
                score: self.state.score,
            });
            return;
        };

        debug!("round {} starts", self.state.round);
        self.state.scrambled = scramble(&word);
        self.state.available = sorted_letters(&self.state.scrambled);
        self.state.selected.clear();
        self.state.current_word = word.clone();
        self.state.time_remaining = self.difficulty.timer_seconds;
        self.phase = Phase::Active;

        let ticket = self.issue_ticket();
        self.definition_ticket = Some(ticket);
        self.requests
            .push_back(Request::FetchDefinition { ticket, word });

        if self.state.time_remaining == 0 {
            self.time_out();
        } else {
            self.timer.start(Instant::now());
        }
    }

    /// Pick one available letter. Returns false, changing nothing, if no
    /// round is active or the letter is not available. Picking the last
    /// letter checks the answer.
    pub fn select_letter(&mut self, letter: char) -> bool {
        if self.phase != Phase::Active {
            return false;
        }

        let Some(pos) = self
            .state
            .available
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&letter))
        else {
            debug!("ignoring unavailable letter '{}'", letter);
            return false;
        };

        let picked = self.state.available.remove(pos);
        self.state.selected.push(picked);

        if self.state.selected.len() == self.state.current_word.chars().count() {
            self.check_answer();
        }
        true
    }

    /// Compare the current guess to the word (ignoring case). A match scores
    /// and moves to the next round; a miss resets the guess.
    pub fn check_answer(&mut self) {
        if self.phase != Phase::Active {
            return;
        }

        let guess = self.state.guess().to_lowercase();
        if guess != self.state.current_word.to_lowercase() {
            debug!("wrong answer '{}'", guess);
            self.reset_guess();
            self.signals.push_back(Signal::WrongAnswer);
            return;
        }

        let points = compute_points(self.state.time_remaining, self.difficulty.timer_seconds);
        self.state.score = self.state.score.saturating_add(points);

        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
            if let Err(e) = self
                .store
                .set(self.difficulty.high_score_key, self.state.high_score)
            {
                warn!(
                    "could not save high score '{}': {}",
                    self.difficulty.high_score_key, e
                );
            }
        }

        self.state.round += 1;
        self.signals.push_back(Signal::RoundAdvanced {
            word: self.state.current_word.clone(),
            round: self.state.round,
            score: self.state.score,
            points,
        });

        self.start_round();
    }

    /// Put every letter back and clear the guess. Score, clock and round are
    /// untouched.
    pub fn reset_guess(&mut self) {
        self.state.available = sorted_letters(&self.state.scrambled);
        self.state.selected.clear();
    }

    /// One second passes on the round clock
    pub fn tick(&mut self) {
        if self.phase != Phase::Active {
            return;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining == 0 {
            self.time_out();
        }
    }

    /// Apply every clock tick that is due at `now`
    pub fn poll_timer(&mut self, now: Instant) {
        if !self.timer.is_running() {
            return;
        }
        for _ in 0..self.timer.due(now) {
            if self.phase != Phase::Active {
                break;
            }
            self.tick();
        }
    }

    /// Start over from round one with zero score, using the words that are
    /// still left.
    pub fn restart(&mut self) {
        if !matches!(
            self.phase,
            Phase::Active | Phase::TimedOut | Phase::Exhausted
        ) {
            return;
        }

        info!("restarting {} game", self.difficulty.level);
        self.timer.cancel();
        self.state.score = 0;
        self.state.round = 1;
        self.start_round();
    }

    /// Leave the game. The clock stops and outstanding lookups are ignored
    /// when they come back.
    pub fn quit(&mut self) {
        self.timer.cancel();
        self.words_ticket = None;
        self.definition_ticket = None;
        self.requests.clear();
        self.phase = Phase::Quit;
    }

    fn time_out(&mut self) {
        self.timer.cancel();
        self.phase = Phase::TimedOut;

        let score = self.state.score;
        let new_high_score = score == self.state.high_score && score != 0;
        info!(
            "time's up on '{}' with score {}",
            self.state.current_word, score
        );
        self.signals.push_back(Signal::TimedOut {
            word: self.state.current_word.clone(),
            score,
            new_high_score,
        });
    }

    fn make_unavailable(&mut self, reason: String) {
        self.timer.cancel();
        self.phase = Phase::Unavailable;
        self.signals.push_back(Signal::WordsUnavailable { reason });
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }
}
