//! Round engine
//!
//! [`GameEngine`] drives one round at a time over an
//! [`ItemRepository`](crate::repository::ItemRepository). Front ends submit
//! [`Guess`]es, read back [`GuessOutcome`]s and draw from [`DisplaySnapshot`]s.

pub mod clock;
pub mod display;
pub mod engine;
mod error;
pub mod guess;
pub mod outcome;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use display::DisplaySnapshot;
pub use engine::GameEngine;
pub use error::EngineError;
pub use guess::Guess;
pub use outcome::{GuessOutcome, OutcomeKind, SaveStatus};
pub use state::{Phase, RoundState, UsedItems};
