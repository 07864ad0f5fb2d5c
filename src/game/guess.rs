//! Player guesses and the comparison rule

use std::fmt;

/// Direction the player expects the next value to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guess {
    Higher,
    Lower,
}

impl Guess {
    /// Whether this guess is right for the given pair of values
    ///
    /// Equal values satisfy both directions.
    ///
    /// ```
    /// use higher_lower::game::Guess;
    ///
    /// assert!(Guess::Higher.is_correct(500, 1500));
    /// assert!(Guess::Lower.is_correct(500, 500));
    /// assert!(!Guess::Lower.is_correct(500, 501));
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_correct(self, current: i64, next: i64) -> bool {
        match self {
            Self::Higher => next >= current,
            Self::Lower => next <= current,
        }
    }

    /// Parse console input: `h`/`higher`/`+` or `l`/`lower`/`-`
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "h" | "higher" | "+" | "1" => Some(Self::Higher),
            "l" | "lower" | "-" | "2" => Some(Self::Lower),
            _ => None,
        }
    }
}

impl From<bool> for Guess {
    /// `true` means "higher"
    fn from(is_higher: bool) -> Self {
        if is_higher { Self::Higher } else { Self::Lower }
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Higher => f.write_str("higher"),
            Self::Lower => f.write_str("lower"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_are_correct_both_ways() {
        for value in [-1_266, 0, 500, 1_412_175_000] {
            assert!(Guess::Higher.is_correct(value, value));
            assert!(Guess::Lower.is_correct(value, value));
        }
    }

    #[test]
    fn strict_differences() {
        assert!(Guess::Higher.is_correct(10, 11));
        assert!(!Guess::Higher.is_correct(11, 10));
        assert!(Guess::Lower.is_correct(11, 10));
        assert!(!Guess::Lower.is_correct(10, 11));
    }

    #[test]
    fn from_bool() {
        assert_eq!(Guess::from(true), Guess::Higher);
        assert_eq!(Guess::from(false), Guess::Lower);
    }

    #[test]
    fn from_input_variants() {
        assert_eq!(Guess::from_input(" H "), Some(Guess::Higher));
        assert_eq!(Guess::from_input("lower"), Some(Guess::Lower));
        assert_eq!(Guess::from_input("2"), Some(Guess::Lower));
        assert_eq!(Guess::from_input("maybe"), None);
    }
}
