//! Player identity
//!
//! A [`Username`] is validated once at login; afterwards the engine only needs
//! the resolved [`PlayerId`] for persistence calls.

use std::fmt;

/// Minimum accepted username length, in characters
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum accepted username length, in characters
pub const MAX_USERNAME_LEN: usize = 32;

/// Stable player identifier assigned by the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
}

/// A validated display name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

/// Error type for invalid usernames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    Empty,
    TooShort(usize),
    TooLong(usize),
    ControlCharacters,
}

impl fmt::Display for UsernameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username cannot be empty"),
            Self::TooShort(len) => write!(
                f,
                "Username must be at least {MIN_USERNAME_LEN} characters, got {len}"
            ),
            Self::TooLong(len) => write!(
                f,
                "Username must be at most {MAX_USERNAME_LEN} characters, got {len}"
            ),
            Self::ControlCharacters => write!(f, "Username contains control characters"),
        }
    }
}

impl std::error::Error for UsernameError {}

impl Username {
    /// Validate a username
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    /// Returns `UsernameError` if the trimmed name is empty, shorter than
    /// three characters, longer than 32, or contains control characters.
    ///
    /// # Examples
    /// ```
    /// use higher_lower::core::Username;
    ///
    /// let name = Username::new("  aino ").unwrap();
    /// assert_eq!(name.as_str(), "aino");
    ///
    /// assert!(Username::new("ab").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, UsernameError> {
        let text: String = text.into();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = trimmed.chars().count();
        if len < MIN_USERNAME_LEN {
            return Err(UsernameError::TooShort(len));
        }
        if len > MAX_USERNAME_LEN {
            return Err(UsernameError::TooLong(len));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(UsernameError::ControlCharacters);
        }

        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
