//! Simple interactive CLI mode
//!
//! Text-based menus and rounds without the TUI

use super::leaderboard::{DEFAULT_LIMIT, leaderboard};
use super::stats::player_report;
use crate::core::{GameMode, Player, QuestionType};
use crate::game::{GameEngine, Guess, Phase};
use crate::output::display::{
    print_banner, print_leaderboard, print_outcome, print_player_report, print_round_intro,
    print_snapshot,
};
use crate::repository::ItemRepository;
use std::io::{self, BufRead, Write};

/// Run the menu loop on stdin until the player quits
///
/// # Errors
///
/// Returns an error if there's an I/O error reading user input.
pub fn run_simple<R: ItemRepository>(repository: &mut R, player: &Player) -> Result<(), String> {
    let stdin = io::stdin();
    run_simple_with(repository, player, &mut stdin.lock())
}

/// Run the menu loop over any input; end of input quits
///
/// # Errors
///
/// Returns an error if there's an I/O error reading user input.
pub fn run_simple_with<R, I>(
    repository: &mut R,
    player: &Player,
    input: &mut I,
) -> Result<(), String>
where
    R: ItemRepository,
    I: BufRead,
{
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Higher or Lower - Console                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Playing as {}.", player.username);

    loop {
        println!("\n1. Play");
        println!("2. My statistics");
        println!("3. Leaderboard (top {DEFAULT_LIMIT})");
        println!("4. Quit");

        let Some(choice) = get_user_input(input, "Choose (1-4)")? else {
            println!("\n👋 Thanks for playing!\n");
            return Ok(());
        };
        match choice.as_str() {
            "1" | "p" | "play" => {
                let Some(question_type) = choose_question_type(input)? else {
                    continue;
                };
                let Some(mode) = choose_mode(input)? else {
                    continue;
                };
                play_round(repository, player, question_type, mode, input)?;
            }
            "2" | "s" | "stats" => print_player_report(&player_report(&*repository, player)),
            "3" | "l" | "leaderboard" => {
                print_leaderboard(&leaderboard(&*repository, &GameMode::ALL, DEFAULT_LIMIT));
            }
            "4" | "q" | "quit" | "exit" => {
                println!("\n👋 Thanks for playing!\n");
                return Ok(());
            }
            _ => println!("❌ Invalid choice! Pick 1, 2, 3 or 4."),
        }
    }
}

fn choose_question_type<I: BufRead>(input: &mut I) -> Result<Option<QuestionType>, String> {
    print_banner("CHOOSE A QUESTION");
    for (i, question) in QuestionType::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, question.label());
    }
    println!("{}. Back", QuestionType::ALL.len() + 1);

    while let Some(choice) = get_user_input(input, "Choose")? {
        if let Ok(n) = choice.parse::<usize>() {
            if let Some(&question) = QuestionType::ALL.get(n.wrapping_sub(1)) {
                return Ok(Some(question));
            }
            if n == QuestionType::ALL.len() + 1 {
                return Ok(None);
            }
        } else if let Some(question) = QuestionType::from_name(&choice) {
            return Ok(Some(question));
        }
        println!("❌ Invalid choice!");
    }
    Ok(None)
}

fn choose_mode<I: BufRead>(input: &mut I) -> Result<Option<GameMode>, String> {
    print_banner("CHOOSE A GAME MODE");
    println!("1. Classic - 3 lives, no clock");
    println!("2. Sudden death - 1 life");
    println!("3. Time limit - 1 life, 60 seconds");
    println!("4. Back");

    while let Some(choice) = get_user_input(input, "Choose (1-4)")? {
        let mode = match choice.as_str() {
            "1" => Some(GameMode::Classic),
            "2" => Some(GameMode::SuddenDeath),
            "3" => Some(GameMode::TimeLimited),
            "4" | "b" | "back" => return Ok(None),
            other => GameMode::from_name(other),
        };
        if mode.is_some() {
            return Ok(mode);
        }
        println!("❌ Invalid choice! Pick 1, 2, 3 or 4.");
    }
    Ok(None)
}

/// One round on the console; quitting mid-round discards the score
fn play_round<R: ItemRepository, I: BufRead>(
    repository: &mut R,
    player: &Player,
    question_type: QuestionType,
    mode: GameMode,
    input: &mut I,
) -> Result<(), String> {
    loop {
        let mut engine = GameEngine::new(&mut *repository);
        if let Err(err) = engine.start_round(player, question_type, mode) {
            println!("\n❌ {err}. Try `seed` to load reference data.");
            return Ok(());
        }
        print_round_intro(question_type, mode);

        while engine.phase() == Phase::InProgress {
            let Some(snapshot) = engine.current_display() else {
                break;
            };
            if snapshot.game_over {
                // Clock ran out while waiting
                if let Some(message) = engine.game_over_message() {
                    println!("\n⏰ Time's up!{message}");
                }
                break;
            }
            print_snapshot(&snapshot);

            let guess = loop {
                // Closed input counts as quitting
                let answer = get_user_input(input, "Higher or lower? (h/l, q to quit)")?
                    .unwrap_or_else(|| "q".to_string());
                if matches!(answer.to_lowercase().as_str(), "q" | "quit") {
                    println!("\nRound abandoned, score not saved.");
                    return Ok(());
                }
                if let Some(guess) = Guess::from_input(&answer) {
                    break guess;
                }
                println!("❌ Type h for higher or l for lower.");
            };

            print_outcome(&engine.submit_guess(guess));
        }

        match get_user_input(input, "\nPlay again? (yes/no)")?
            .map(|answer| answer.to_lowercase())
            .as_deref()
        {
            Some("yes" | "y") => {}
            _ => return Ok(()),
        }
    }
}

/// Get user input with a prompt; `None` once input is closed
fn get_user_input<I: BufRead>(input: &mut I, prompt: &str) -> Result<Option<String>, String> {
    print!("{prompt}: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    if input.read_line(&mut line).map_err(|e| e.to_string())? == 0 {
        println!();
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Username;
    use crate::repository::{InMemoryRepository, PlayerRegistry};
    use std::io::Cursor;

    fn setup() -> (InMemoryRepository, Player) {
        let mut repository = InMemoryRepository::from_embedded();
        let player = repository
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();
        (repository, player)
    }

    fn games_played(repository: &InMemoryRepository, player: &Player) -> u32 {
        player_report(repository, player).stats.games_played
    }

    #[test]
    fn closed_input_ends_menu() {
        let (mut repository, player) = setup();
        let mut input = Cursor::new("");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));
    }

    #[test]
    fn junk_then_closed_input_ends_menu() {
        let (mut repository, player) = setup();
        let mut input = Cursor::new("what\n9\n");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));
    }

    #[test]
    fn closed_input_in_submenus_returns_to_menu_and_quits() {
        let (mut repository, player) = setup();
        let mut input = Cursor::new("1\n");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));

        let mut input = Cursor::new("1\n1\n");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));
    }

    #[test]
    fn closed_input_mid_round_saves_nothing() {
        let (mut repository, player) = setup();
        let mut input = Cursor::new("1\n1\n1\nnot a guess\n");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));
        assert_eq!(games_played(&repository, &player), 0);
    }

    #[test]
    fn quit_option_leaves_menu() {
        let (mut repository, player) = setup();
        let mut input = Cursor::new("2\n3\n4\n1\n");
        assert_eq!(run_simple_with(&mut repository, &player, &mut input), Ok(()));
        // "1" after quitting is never read
        assert_eq!(input.position(), "2\n3\n4\n".len() as u64);
    }
}
