//! Formatting utilities for round values and terminal output

use crate::core::{GameMode, QuestionType};
use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// Text shown in place of a value that has not been revealed yet
pub const MASK: &str = "???";

/// Day-first timestamp shown in score listings
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Group digits in threes with a space separator
///
/// ```
/// use higher_lower::output::formatters::group_thousands;
///
/// assert_eq!(group_thousands(1_234_567), "1 234 567");
/// assert_eq!(group_thousands(-4_500), "-4 500");
/// ```
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    grouped
}

/// Value with its unit, e.g. `5 300 ft`
#[must_use]
pub fn format_value(question_type: QuestionType, value: i64) -> String {
    format!("{}{}", group_thousands(value), question_type.unit())
}

/// Value with its label, e.g. `Elevation: 5 300 ft`
#[must_use]
pub fn format_labelled_value(question_type: QuestionType, value: i64) -> String {
    format!(
        "{}: {}",
        question_type.value_label(),
        format_value(question_type, value)
    )
}

/// Mode-specific life/time indicator
#[must_use]
pub fn life_indicator(mode: GameMode, lives: u32) -> String {
    match mode {
        GameMode::Classic => "❤️ ".repeat(lives as usize).trim_end().to_string(),
        GameMode::SuddenDeath => "💀".to_string(),
        GameMode::TimeLimited => "⏰".to_string(),
    }
}

/// Seconds with one decimal, e.g. `42.3s`
#[must_use]
pub fn format_seconds(remaining: Duration) -> String {
    format!("{:.1}s", remaining.as_secs_f64())
}

/// Score timestamp in local time
#[must_use]
pub fn format_played_at(played_at: &DateTime<Utc>) -> String {
    played_at.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64).max(0.0) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Remaining time as a bar against the full budget
#[must_use]
pub fn time_bar(remaining: Duration, budget: Duration, width: usize) -> String {
    create_progress_bar(remaining.as_secs_f64(), budget.as_secs_f64(), width)
}
