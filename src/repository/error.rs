//! Error types raised by repository implementations.

use crate::core::PlayerId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("username '{0}' is already taken")]
    DuplicatePlayer(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
