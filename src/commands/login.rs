//! Player resolution

use crate::core::{Player, Username};
use crate::repository::PlayerRegistry;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::info;

/// Resolve a name given on the command line or in the environment
///
/// # Errors
///
/// Returns an error if the name is invalid or the registry cannot be reached.
pub fn login<P: PlayerRegistry>(registry: &mut P, name: &str) -> Result<Player> {
    let username = Username::new(name).with_context(|| format!("invalid player name '{name}'"))?;
    let player = registry
        .get_or_create_player(&username)
        .context("failed to look up player")?;
    info!(player = %player.username, "logged in");
    Ok(player)
}

/// Ask for a name until a valid one is entered
///
/// Returns `Ok(None)` if the player types `q` or input ends.
///
/// # Errors
///
/// Returns an error on I/O failure or if the registry cannot be reached.
pub fn prompt_login<P, I, O>(
    registry: &mut P,
    input: &mut I,
    output: &mut O,
) -> Result<Option<Player>>
where
    P: PlayerRegistry,
    I: BufRead,
    O: Write,
{
    loop {
        write!(output, "Username ('q' to quit): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match Username::new(line) {
            Ok(username) => {
                let existing = registry
                    .find_player(&username)
                    .context("failed to look up player")?;
                let player = registry
                    .get_or_create_player(&username)
                    .context("failed to register player")?;

                if existing.is_some() {
                    writeln!(output, "Welcome back, {}!", player.username)?;
                } else {
                    writeln!(output, "Welcome, {}! A new player was created.", player.username)?;
                }
                info!(player = %player.username, new = existing.is_none(), "logged in");
                return Ok(Some(player));
            }
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use std::io::Cursor;

    fn run(script: &str, repo: &mut InMemoryRepository) -> (Option<Player>, String) {
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        let player = prompt_login(repo, &mut input, &mut output).unwrap();
        (player, String::from_utf8(output).unwrap())
    }

    #[test]
    fn invalid_names_are_reprompted() {
        let mut repo = InMemoryRepository::new();
        let (player, output) = run("\nab\naino\n", &mut repo);

        assert_eq!(player.unwrap().username, "aino");
        assert!(output.contains("cannot be empty"));
        assert!(output.contains("at least 3"));
        assert!(output.contains("Welcome, aino!"));
    }

    #[test]
    fn returning_player_is_welcomed_back() {
        let mut repo = InMemoryRepository::new();
        let first = login(&mut repo, "aino").unwrap();
        let (player, output) = run("aino\n", &mut repo);

        assert_eq!(player, Some(first));
        assert!(output.contains("Welcome back"));
    }

    #[test]
    fn q_or_eof_aborts() {
        let mut repo = InMemoryRepository::new();
        assert_eq!(run("q\n", &mut repo).0, None);
        assert_eq!(run("", &mut repo).0, None);
    }

    #[test]
    fn login_rejects_short_names() {
        let mut repo = InMemoryRepository::new();
        assert!(login(&mut repo, "x").is_err());
        assert!(login(&mut repo, " aino ").is_ok());
    }
}
