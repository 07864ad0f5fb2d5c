//! Display functions for command results

use super::formatters::{format_played_at, time_bar};
use crate::commands::{LeaderboardSection, PlayerReport};
use crate::core::{GameMode, QuestionType};
use crate::game::{DisplaySnapshot, GuessOutcome, OutcomeKind, SaveStatus};
use crate::repository::SeedStats;
use colored::Colorize;
use std::time::Duration;

/// Boxed title line
pub fn print_banner(title: &str) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", title.bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());
}

/// Rules shown before a round starts
pub fn print_round_intro(question_type: QuestionType, mode: GameMode) {
    print_banner(&format!("{} · {}", question_type.label(), mode.display_name()));
    println!("{}", mode.intro().bright_white());
    println!(
        "\nType {} for higher, {} for lower, {} to quit.",
        "h".green().bold(),
        "l".red().bold(),
        "q".bright_black()
    );
}

/// Current round as plain console lines
pub fn print_snapshot(snapshot: &DisplaySnapshot) {
    println!("\n{}", "─".repeat(60).cyan());
    let mut status = format!(
        "Score: {}   Best: {}   {}",
        snapshot.score.to_string().bright_yellow().bold(),
        snapshot.high_score,
        snapshot.life_indicator
    );
    if let (Some(remaining), Some(text)) = (snapshot.time_remaining, &snapshot.time_remaining_text)
    {
        let budget = snapshot.mode.time_budget().unwrap_or(Duration::ZERO);
        status.push_str(&format!("  [{}] {text}", time_bar(remaining, budget, 20)));
    }
    println!("{status}");
    println!("{}", "─".repeat(60).cyan());

    println!(
        "\n  {}\n  {}",
        snapshot.current_name.bright_white().bold(),
        snapshot.current_value_text
    );
    println!("\n  {}", "vs.".bright_black());
    println!(
        "\n  {}\n  {}",
        snapshot.next_name.bright_white().bold(),
        snapshot.next_value_text.bright_black()
    );
    println!(
        "\nIs the next {} {} or {}?",
        snapshot.question_type.value_label().to_lowercase(),
        "higher".green(),
        "lower".red()
    );
}

/// Narrated guess result
pub fn print_outcome(outcome: &GuessOutcome) {
    let message = match outcome.kind {
        OutcomeKind::Correct => outcome.message.green().bold(),
        OutcomeKind::Wrong | OutcomeKind::OutOfLives => outcome.message.red().bold(),
        OutcomeKind::TimedOut | OutcomeKind::PoolExhausted => outcome.message.yellow().bold(),
        OutcomeKind::AlreadyEnded | OutcomeKind::NotStarted => outcome.message.bright_black(),
    };
    println!("\n{message}");

    if outcome.save_status == Some(SaveStatus::NotSaved) {
        eprintln!(
            "{}",
            "Warning: the score was not written to the database.".yellow()
        );
    }
}

/// Personal stats and recent games
pub fn print_player_report(report: &PlayerReport) {
    print_banner(&format!("STATISTICS: {}", report.username));

    if !report.has_games() {
        println!("\nNo games played yet.");
        return;
    }

    let stats = &report.stats;
    println!("\n📊 {}", "Overall:".bright_cyan().bold());
    println!("   Games played:  {}", stats.games_played);
    println!(
        "   Best score:    {}",
        stats.best.to_string().bright_yellow().bold()
    );
    println!("   Average:       {:.1}", stats.average);
    println!("   Worst score:   {}", stats.worst);

    if !report.recent.is_empty() {
        println!("\n🕑 {}", "Recent games:".bright_cyan().bold());
        for game in &report.recent {
            println!(
                "   {:4} points  ({})  ({})",
                game.score,
                game.mode.display_name(),
                format_played_at(&game.played_at).bright_black()
            );
        }
    }
}

/// Top scores, one block per mode
pub fn print_leaderboard(sections: &[LeaderboardSection]) {
    print_banner("LEADERBOARD");

    for section in sections {
        println!(
            "\n🏆 {}",
            section.mode.display_name().bright_cyan().bold()
        );
        if section.entries.is_empty() {
            println!("   {}", "No scores yet.".bright_black());
            continue;
        }
        for (rank, entry) in section.entries.iter().enumerate() {
            let line = format!(
                "{:2}. {:20} {:4} points",
                rank + 1,
                entry.username,
                entry.score
            );
            let line = if rank == 0 {
                line.bright_yellow().bold()
            } else {
                line.normal()
            };
            println!(
                "   {line}  ({})",
                format_played_at(&entry.played_at).bright_black()
            );
        }
    }
}

/// Rows written by `seed` or `import`
pub fn print_seed_result(stats: &SeedStats) {
    println!(
        "{} {} airports, {} countries",
        "✅ Reference data loaded:".green().bold(),
        stats.airports,
        stats.countries
    );
}
