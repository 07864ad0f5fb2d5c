//! Core domain types for the higher-or-lower game
//!
//! Items, question types, game modes and players. Nothing here performs I/O.

mod item;
mod mode;
mod player;

pub use item::{Airport, AirportClass, Country, Item, ItemKey};
pub use mode::{GameMode, QuestionType};
pub use player::{Player, PlayerId, Username, UsernameError};
