//! Command implementations

pub mod leaderboard;
pub mod login;
pub mod seed;
pub mod simple;
pub mod stats;

pub use leaderboard::{LeaderboardSection, leaderboard};
pub use login::{login, prompt_login};
pub use seed::{ensure_seeded, import_files, seed_embedded};
pub use simple::{run_simple, run_simple_with};
pub use stats::{PlayerReport, player_report};
