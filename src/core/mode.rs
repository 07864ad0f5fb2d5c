//! Question types and game modes
//!
//! Both are fixed for the whole round and dispatched by exhaustive matching.

use std::fmt;
use std::time::Duration;

/// Lives granted in classic mode
pub const CLASSIC_LIVES: u32 = 3;

/// Lives granted in every other mode
pub const OTHER_LIVES: u32 = 1;

/// Time budget of a time-limited round
pub const TIME_LIMIT: Duration = Duration::from_secs(60);

/// Which numeric attribute is compared during a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// Airport elevation above sea level, in feet
    Elevation,
    /// Country population
    Population,
}

impl QuestionType {
    /// All question types in menu order
    pub const ALL: [Self; 2] = [Self::Elevation, Self::Population];

    /// Parse a question type from a name
    ///
    /// Accepts "elevation"/"airport" and "population"/"country".
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "elevation" | "airport" | "airports" => Some(Self::Elevation),
            "population" | "country" | "countries" => Some(Self::Population),
            _ => None,
        }
    }

    /// Stable lowercase tag
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Elevation => "elevation",
            Self::Population => "population",
        }
    }

    /// Human-readable question label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Elevation => "Airport elevation",
            Self::Population => "Country population",
        }
    }

    /// Label placed in front of a formatted value
    #[must_use]
    pub const fn value_label(self) -> &'static str {
        match self {
            Self::Elevation => "Elevation",
            Self::Population => "Population",
        }
    }

    /// Unit suffix for formatted values
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Elevation => " ft",
            Self::Population => "",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule set governing the lives/time budget and game-over narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Three lives, no clock
    Classic,
    /// One life, no clock
    SuddenDeath,
    /// One life and a 60 second budget
    TimeLimited,
}

impl GameMode {
    /// All modes in menu order
    pub const ALL: [Self; 3] = [Self::Classic, Self::SuddenDeath, Self::TimeLimited];

    /// Parse a mode from its tag or a close variant of it
    ///
    /// `time_attack` is accepted for score histories written under the older tag.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "classic" => Some(Self::Classic),
            "sudden_death" | "sudden" => Some(Self::SuddenDeath),
            "time_limited" | "time_attack" | "timed" => Some(Self::TimeLimited),
            _ => None,
        }
    }

    /// Tag stored alongside persisted scores
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::SuddenDeath => "sudden_death",
            Self::TimeLimited => "time_limited",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::SuddenDeath => "Sudden death",
            Self::TimeLimited => "Time limit",
        }
    }

    /// One-paragraph rules summary shown before a round
    #[must_use]
    pub const fn intro(self) -> &'static str {
        match self {
            Self::Classic => {
                "Classic mode - 3 lives\nGuess whether the next value is HIGHER or LOWER!"
            }
            Self::SuddenDeath => "SUDDEN DEATH - 1 life!\nOne mistake ends the game!",
            Self::TimeLimited => "TIME LIMIT - 60 seconds!\n1 life and 60 seconds on the clock!",
        }
    }

    #[must_use]
    pub const fn initial_lives(self) -> u32 {
        match self {
            Self::Classic => CLASSIC_LIVES,
            Self::SuddenDeath | Self::TimeLimited => OTHER_LIVES,
        }
    }

    /// Wall-clock budget, only present in time-limited mode
    #[must_use]
    pub const fn time_budget(self) -> Option<Duration> {
        match self {
            Self::TimeLimited => Some(TIME_LIMIT),
            Self::Classic | Self::SuddenDeath => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::TimeLimited)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
