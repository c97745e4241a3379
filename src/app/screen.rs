//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Splash
//! - Main menu (with the How To Play modal)
//! - Playing a game session

use crate::game::{Difficulty, Level};
use crate::services::Fetcher;
use crate::storage::{HighScoreStore, MemoryStore};
use crate::words::{DefinitionSource, WordSource};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::state::GameSession;

/// How long the splash stays fully visible
pub const SPLASH_HOLD: Duration = Duration::from_secs(2);

/// How long the splash takes to fade out after the hold
pub const SPLASH_FADE: Duration = Duration::from_secs(1);

/// Rules shown in the How To Play modal
pub const HOW_TO_PLAY: [&str; 3] = [
    "Solve the scrambled word to earn points",
    "The faster you get it right, the more points you get",
    "Improve your skills and reach new high scores",
];

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Easy,
    Medium,
    Hard,
    HowToPlay,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::Easy,
            MenuOption::Medium,
            MenuOption::Hard,
            MenuOption::HowToPlay,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Easy => "Easy",
            MenuOption::Medium => "Medium",
            MenuOption::Hard => "Hard",
            MenuOption::HowToPlay => "How To Play",
            MenuOption::Quit => "Quit",
        }
    }

    /// Difficulty level this option starts, if any
    pub fn level(&self) -> Option<Level> {
        match self {
            MenuOption::Easy => Some(Level::Easy),
            MenuOption::Medium => Some(Level::Medium),
            MenuOption::Hard => Some(Level::Hard),
            MenuOption::HowToPlay | MenuOption::Quit => None,
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Startup logo
    Splash { started: Instant },
    /// Main menu
    Menu { selected: usize, show_help: bool },
    /// Playing a game session
    Playing { session: GameSession },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Best score per level, refreshed whenever the menu is shown
    pub best_scores: Vec<(Level, u32)>,
    /// Store for high scores; lent to the running session
    store: Option<Box<dyn HighScoreStore>>,
    words: Arc<dyn WordSource>,
    definitions: Arc<dyn DefinitionSource>,
}

impl AppCoordinator {
    /// Create a coordinator. Starts on the splash unless `show_splash` is
    /// false.
    pub fn new(
        store: Box<dyn HighScoreStore>,
        words: Arc<dyn WordSource>,
        definitions: Arc<dyn DefinitionSource>,
        show_splash: bool,
    ) -> Self {
        let screen = if show_splash {
            Screen::Splash {
                started: Instant::now(),
            }
        } else {
            Screen::Menu {
                selected: 0,
                show_help: false,
            }
        };

        let mut coordinator = Self {
            screen,
            should_quit: false,
            best_scores: Vec::new(),
            store: Some(store),
            words,
            definitions,
        };
        coordinator.refresh_best_scores();
        coordinator
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Start a game session at the given level
    pub fn start_game(&mut self, level: Level) {
        self.start_session(Difficulty::for_level(level));
    }

    /// Start a game session with explicit round parameters
    pub fn start_session(&mut self, difficulty: Difficulty) {
        info!("starting {} game", difficulty.level);
        let store = self.take_store();
        let fetcher = Fetcher::new(Arc::clone(&self.words), Arc::clone(&self.definitions));
        self.screen = Screen::Playing {
            session: GameSession::new(difficulty, store, fetcher),
        };
    }

    /// Go back to the main menu, reclaiming the store from any session
    pub fn go_to_menu(&mut self) {
        let previous = std::mem::replace(
            &mut self.screen,
            Screen::Menu {
                selected: 0,
                show_help: false,
            },
        );
        if let Screen::Playing { mut session } = previous {
            session.leave();
            self.store = Some(session.into_store());
        }
        self.refresh_best_scores();
    }

    /// Advance timers and apply finished lookups. Call regularly.
    pub fn poll(&mut self, now: Instant) {
        let leave = match &mut self.screen {
            Screen::Splash { started } => {
                now.saturating_duration_since(*started) >= SPLASH_HOLD + SPLASH_FADE
            }
            Screen::Menu { .. } => false,
            Screen::Playing { session } => {
                session.tick(now);
                session.should_leave
            }
        };

        if leave {
            self.go_to_menu();
        }
    }

    /// Longest the event loop may wait for input before polling again
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        match &self.screen {
            // Redraw often enough for a smooth fade
            Screen::Splash { .. } => Some(Duration::from_millis(50)),
            Screen::Menu { .. } => None,
            Screen::Playing { session } => session.next_wakeup(now),
        }
    }

    /// Handle navigation (up)
    pub fn on_up(&mut self) {
        match &mut self.screen {
            Screen::Menu {
                selected,
                show_help: false,
            } => {
                *selected = selected.saturating_sub(1);
            }
            Screen::Playing { session } => session.on_up(),
            _ => {}
        }
    }

    /// Handle navigation (down)
    pub fn on_down(&mut self) {
        match &mut self.screen {
            Screen::Menu {
                selected,
                show_help: false,
            } => {
                if *selected < MenuOption::all().len() - 1 {
                    *selected += 1;
                }
            }
            Screen::Playing { session } => session.on_down(),
            _ => {}
        }
    }

    /// Handle Enter
    pub fn on_enter(&mut self) {
        if self.dismiss_overlay() {
            return;
        }
        match &mut self.screen {
            Screen::Menu { selected, .. } => {
                let option = MenuOption::all()[*selected];
                self.menu_select(option);
            }
            Screen::Playing { session } => session.on_enter(),
            Screen::Splash { .. } => {}
        }
        self.leave_finished_session();
    }

    /// Handle a typed character
    pub fn on_char(&mut self, c: char) {
        if self.dismiss_overlay() {
            return;
        }
        match &mut self.screen {
            Screen::Menu { .. } => {
                // First letter shortcuts: e, m, h, ?, q
                let option = match c.to_ascii_lowercase() {
                    'e' => Some(MenuOption::Easy),
                    'm' => Some(MenuOption::Medium),
                    'h' => Some(MenuOption::Hard),
                    '?' => Some(MenuOption::HowToPlay),
                    'q' => Some(MenuOption::Quit),
                    _ => None,
                };
                if let Some(option) = option {
                    self.menu_select(option);
                }
            }
            Screen::Playing { session } => {
                if !c.is_control() {
                    session.on_char(c);
                }
            }
            Screen::Splash { .. } => {}
        }
        self.leave_finished_session();
    }

    /// Handle Backspace
    pub fn on_backspace(&mut self) {
        if let Screen::Playing { session } = &mut self.screen {
            session.on_backspace();
        }
    }

    /// Handle Esc: leave the game, close the modal, or quit from the menu
    pub fn on_escape(&mut self) {
        if self.dismiss_overlay() {
            return;
        }
        match &self.screen {
            Screen::Menu { .. } => self.quit(),
            Screen::Playing { .. } => self.go_to_menu(),
            Screen::Splash { .. } => {}
        }
    }

    /// Fraction of the splash still visible, from 1.0 down to 0.0
    pub fn splash_opacity(&self, now: Instant) -> f32 {
        match &self.screen {
            Screen::Splash { started } => splash_opacity(now.saturating_duration_since(*started)),
            _ => 0.0,
        }
    }

    fn menu_select(&mut self, option: MenuOption) {
        if let Some(level) = option.level() {
            self.start_game(level);
            return;
        }
        match option {
            MenuOption::HowToPlay => {
                if let Screen::Menu { show_help, .. } = &mut self.screen {
                    *show_help = true;
                }
            }
            MenuOption::Quit => self.quit(),
            _ => {}
        }
    }

    /// Skip the splash or close the help modal. Returns true if a key press
    /// was used up doing so.
    fn dismiss_overlay(&mut self) -> bool {
        match &mut self.screen {
            Screen::Splash { .. } => {
                self.go_to_menu();
                true
            }
            Screen::Menu {
                show_help: help @ true,
                ..
            } => {
                *help = false;
                true
            }
            _ => false,
        }
    }

    fn leave_finished_session(&mut self) {
        if let Screen::Playing { session } = &self.screen {
            if session.should_leave {
                self.go_to_menu();
            }
        }
    }

    fn take_store(&mut self) -> Box<dyn HighScoreStore> {
        self.store.take().unwrap_or_else(|| {
            warn!("high score store missing; scores will not be kept");
            Box::new(MemoryStore::new())
        })
    }

    fn refresh_best_scores(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        self.best_scores = Level::all()
            .iter()
            .map(|&level| {
                let key = Difficulty::for_level(level).high_score_key;
                let score = store.get(key).unwrap_or_else(|e| {
                    warn!("could not read high score '{}': {}", key, e);
                    None
                });
                (level, score.unwrap_or(0))
            })
            .collect();
    }
}

/// Splash opacity after `elapsed`: full during the hold, then a linear fade
pub fn splash_opacity(elapsed: Duration) -> f32 {
    if elapsed <= SPLASH_HOLD {
        return 1.0;
    }
    let fading = elapsed - SPLASH_HOLD;
    if fading >= SPLASH_FADE {
        return 0.0;
    }
    1.0 - fading.as_secs_f32() / SPLASH_FADE.as_secs_f32()
}
