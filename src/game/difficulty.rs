//! Difficulty levels and their round parameters

use std::fmt;
use std::str::FromStr;

/// Difficulty level picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// All levels in menu order
    pub fn all() -> &'static [Level] {
        &[Level::Easy, Level::Medium, Level::Hard]
    }

    /// Lowercase name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }

    /// Display label for menus and titles
    pub fn label(&self) -> &'static str {
        match self {
            Level::Easy => "Easy",
            Level::Medium => "Medium",
            Level::Hard => "Hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(format!("unknown difficulty '{}' (easy, medium, hard)", other)),
        }
    }
}

/// Round parameters for one game session. Fixed once the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difficulty {
    pub level: Level,
    /// Shortest word requested from the word source
    pub min_length: usize,
    /// Longest word requested from the word source
    pub max_length: usize,
    /// Seconds on the clock at the start of every round
    pub timer_seconds: u32,
    /// Key under which the best score for this level is stored
    pub high_score_key: &'static str,
}

impl Difficulty {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty {
                level,
                min_length: 4,
                max_length: 6,
                timer_seconds: 120,
                high_score_key: "highScoreEasy",
            },
            Level::Medium => Difficulty {
                level,
                min_length: 5,
                max_length: 7,
                timer_seconds: 90,
                high_score_key: "highScoreMedium",
            },
            Level::Hard => Difficulty {
                level,
                min_length: 6,
                max_length: 8,
                timer_seconds: 60,
                high_score_key: "highScoreHard",
            },
        }
    }

    /// Same parameters with a different round duration
    #[cfg(test)]
    pub fn with_timer(mut self, timer_seconds: u32) -> Self {
        self.timer_seconds = timer_seconds;
        self
    }

    /// Screen title, e.g. "MEDIUM"
    pub fn title(&self) -> String {
        self.level.label().to_uppercase()
    }
}
