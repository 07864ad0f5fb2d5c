//! Higher or Lower - CLI
//!
//! TUI and console front ends plus score and data management commands.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use higher_lower::{
    commands::{
        ensure_seeded, import_files, leaderboard, login, player_report, prompt_login, run_simple,
        seed_embedded,
    },
    config::{AppConfig, Overrides, Storage},
    core::{GameMode, Player},
    game::GameEngine,
    logging::{self, LogTarget},
    output::{print_leaderboard, print_player_report, print_seed_result},
    repository::{InMemoryRepository, ItemRepository, PlayerRegistry, SqliteRepository},
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "higher_lower",
    about = "Higher or lower: airport elevations and country populations",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// SQLite database file (default: platform data directory)
    #[arg(long, global = true, env = "HIGHER_LOWER_DB")]
    db: Option<PathBuf>,

    /// Player name; prompts when absent
    #[arg(short, long, global = true, env = "HIGHER_LOWER_PLAYER")]
    player: Option<String>,

    /// Directory for the TUI log file
    #[arg(long, global = true, env = "HIGHER_LOWER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Tracing filter, e.g. "debug" or "higher_lower=trace" (`RUST_LOG` wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, global = true)]
    in_memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI mode (default)
    Play,

    /// Console mode without the TUI
    Simple,

    /// Show a player's statistics and recent games
    Stats,

    /// Show the best scores per game mode
    Leaderboard {
        /// Only this mode: classic, sudden_death, time_limited
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<GameMode>,

        /// Rows per mode
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Load the built-in airport and country tables into the database
    Seed {
        /// Wipe existing reference rows first
        #[arg(short, long)]
        force: bool,
    },

    /// Import airport and country tables from TSV files
    Import {
        /// Airport TSV file
        #[arg(long)]
        airports: PathBuf,

        /// Country TSV file
        #[arg(long)]
        countries: PathBuf,
    },
}

fn parse_mode(name: &str) -> std::result::Result<GameMode, String> {
    GameMode::from_name(name).ok_or_else(|| {
        format!("unknown mode '{name}' (expected classic, sudden_death or time_limited)")
    })
}

fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    let config = AppConfig::resolve(Overrides {
        database: cli.db,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
        player: cli.player,
        in_memory: cli.in_memory,
    });

    // Interactive modes own the terminal, so they log to a file
    let target = match command {
        Commands::Play | Commands::Simple => LogTarget::File(config.log_dir.clone()),
        _ => LogTarget::Stderr,
    };
    let _guard = logging::init(&config.log_level, &target)?;

    match &config.storage {
        Storage::InMemory => {
            if matches!(command, Commands::Seed { .. } | Commands::Import { .. }) {
                bail!("`seed` and `import` need a database; drop --in-memory");
            }
            info!("using in-memory storage, scores will not be kept");
            run_with(InMemoryRepository::from_embedded(), command, &config)
        }
        Storage::Sqlite(path) => {
            let mut repository = open_database(path)?;
            match command {
                Commands::Seed { force } => {
                    let stats = seed_embedded(&mut repository, force)?;
                    print_seed_result(&stats);
                    Ok(())
                }
                Commands::Import {
                    airports,
                    countries,
                } => {
                    let stats = import_files(&mut repository, &airports, &countries)?;
                    print_seed_result(&stats);
                    Ok(())
                }
                command => {
                    if let Some(stats) = ensure_seeded(&mut repository)? {
                        info!(
                            airports = stats.airports,
                            countries = stats.countries,
                            "seeded empty database"
                        );
                    }
                    run_with(repository, command, &config)
                }
            }
        }
    }
}

fn open_database(path: &Path) -> Result<SqliteRepository> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    info!(path = %path.display(), "opening database");
    SqliteRepository::open(path).with_context(|| format!("failed to open {}", path.display()))
}

/// Commands that only need the repository traits
fn run_with<R>(mut repository: R, command: Commands, config: &AppConfig) -> Result<()>
where
    R: ItemRepository + PlayerRegistry,
{
    match command {
        Commands::Leaderboard { mode, limit } => {
            let modes = mode.map_or_else(|| GameMode::ALL.to_vec(), |m| vec![m]);
            print_leaderboard(&leaderboard(&repository, &modes, limit));
            Ok(())
        }
        Commands::Stats => {
            let Some(player) = resolve_player(&mut repository, config)? else {
                return Ok(());
            };
            print_player_report(&player_report(&repository, &player));
            Ok(())
        }
        Commands::Simple => {
            let Some(player) = resolve_player(&mut repository, config)? else {
                return Ok(());
            };
            run_simple(&mut repository, &player).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Play => {
            use higher_lower::interactive::{App, run_tui};

            let Some(player) = resolve_player(&mut repository, config)? else {
                return Ok(());
            };
            run_tui(App::new(GameEngine::new(repository), player))
        }
        Commands::Seed { .. } | Commands::Import { .. } => {
            bail!("`seed` and `import` need a database")
        }
    }
}

/// Configured player name, or ask on the terminal
fn resolve_player<P: PlayerRegistry>(
    registry: &mut P,
    config: &AppConfig,
) -> Result<Option<Player>> {
    if let Some(name) = &config.player {
        return login(registry, name).map(Some);
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    prompt_login(registry, &mut input, &mut output)
}
