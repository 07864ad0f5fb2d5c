//! Higher or Lower
//!
//! A trivia game: guess whether the next airport sits higher or the next
//! country has a larger population than the current one.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use higher_lower::core::{GameMode, QuestionType, Username};
//! use higher_lower::game::{GameEngine, Guess};
//! use higher_lower::repository::{InMemoryRepository, PlayerRegistry};
//!
//! let mut repository = InMemoryRepository::from_embedded();
//! let player = repository
//!     .get_or_create_player(&Username::new("aino").unwrap())
//!     .unwrap();
//!
//! let mut engine = GameEngine::new(repository);
//! engine
//!     .start_round(&player, QuestionType::Elevation, GameMode::Classic)
//!     .unwrap();
//! let outcome = engine.submit_guess(Guess::Higher);
//! println!("{}", outcome.message);
//! ```

// Core domain types
pub mod core;

// Embedded reference tables
pub mod dataset;

// Persistence
pub mod repository;

// Round engine
pub mod game;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

// Runtime configuration and logging
pub mod config;
pub mod logging;
