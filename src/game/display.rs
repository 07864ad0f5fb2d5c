//! Read-only projection of a round for front ends

use super::state::RoundState;
use crate::core::{GameMode, QuestionType};
use crate::output::formatters::{MASK, format_labelled_value, format_seconds, life_indicator};
use std::time::Duration;

/// Everything a front end draws for the round in progress
///
/// Built fresh from [`RoundState`] on every call; holds no references into
/// engine-owned data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub player_username: String,
    pub question_type: QuestionType,
    pub question_label: &'static str,
    pub mode: GameMode,
    pub score: u32,
    pub lives: u32,
    pub life_indicator: String,
    pub high_score: u32,
    pub current_name: String,
    /// `None` until the first guess has been resolved
    pub current_value: Option<i64>,
    /// Labelled value, or the mask while hidden
    pub current_value_text: String,
    pub next_name: String,
    pub next_value_text: String,
    pub first_guess: bool,
    pub game_over: bool,
    pub time_remaining: Option<Duration>,
    pub time_remaining_text: Option<String>,
}

impl DisplaySnapshot {
    #[must_use]
    pub fn from_state(state: &RoundState) -> Self {
        let question_type = state.question_type();
        let revealed = state.is_revealed();
        let current_value = revealed.then(|| state.current_item().value());

        let current_value_text = current_value.map_or_else(
            || format!("{}: {MASK}", question_type.value_label()),
            |value| format_labelled_value(question_type, value),
        );

        Self {
            player_username: state.player().username.clone(),
            question_type,
            question_label: question_type.label(),
            mode: state.mode(),
            score: state.score(),
            lives: state.lives(),
            life_indicator: life_indicator(state.mode(), state.lives()),
            high_score: state.high_score(),
            current_name: state.current_item().display_name(),
            current_value,
            current_value_text,
            next_name: state.next_item().display_name(),
            next_value_text: format!("{}: {MASK}", question_type.value_label()),
            first_guess: !revealed,
            game_over: state.is_game_over(),
            time_remaining: state.time_remaining(),
            time_remaining_text: state.time_remaining().map(format_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Airport, AirportClass, Item, Player, PlayerId};
    use crate::game::state::UsedItems;
    use std::time::Instant;

    fn airport(id: i64, name: &str, elevation: i64) -> Item {
        Item::Airport(Airport {
            id,
            ident: format!("X{id:03}"),
            class: AirportClass::LargeAirport,
            name: name.to_string(),
            latitude_deg: None,
            longitude_deg: None,
            elevation_ft: Some(elevation),
            continent: None,
            iso_country: Some("FI".to_string()),
            municipality: None,
            country_name: Some("Finland".to_string()),
        })
    }

    fn state(mode: GameMode) -> RoundState {
        RoundState::new(
            Player {
                id: PlayerId(1),
                username: "aino".to_string(),
            },
            QuestionType::Elevation,
            mode,
            2,
            (airport(1, "Alpha", 12_500), airport(2, "Bravo", 300)),
            UsedItems::default(),
            Instant::now(),
        )
    }

    #[test]
    fn current_value_masked_before_first_guess() {
        let snapshot = DisplaySnapshot::from_state(&state(GameMode::Classic));
        assert!(snapshot.first_guess);
        assert_eq!(snapshot.current_value, None);
        assert_eq!(snapshot.current_value_text, "Elevation: ???");
        assert_eq!(snapshot.next_value_text, "Elevation: ???");
    }

    #[test]
    fn current_value_shown_after_reveal() {
        let mut s = state(GameMode::Classic);
        s.revealed = true;
        let snapshot = DisplaySnapshot::from_state(&s);

        assert!(!snapshot.first_guess);
        assert_eq!(snapshot.current_value, Some(12_500));
        assert_eq!(snapshot.current_value_text, "Elevation: 12 500 ft");
        assert_eq!(snapshot.next_value_text, "Elevation: ???");
    }

    #[test]
    fn labels_and_indicators() {
        let snapshot = DisplaySnapshot::from_state(&state(GameMode::Classic));
        assert_eq!(snapshot.question_label, "Airport elevation");
        assert_eq!(snapshot.current_name, "Alpha (Finland)");
        assert_eq!(snapshot.life_indicator, "❤️ ❤️ ❤️");
        assert_eq!(snapshot.high_score, 2);
        assert_eq!(snapshot.time_remaining_text, None);

        let timed = DisplaySnapshot::from_state(&state(GameMode::TimeLimited));
        assert_eq!(timed.life_indicator, "⏰");
        assert_eq!(timed.time_remaining_text.as_deref(), Some("60.0s"));
    }

    #[test]
    fn snapshot_is_stable() {
        let s = state(GameMode::SuddenDeath);
        assert_eq!(DisplaySnapshot::from_state(&s), DisplaySnapshot::from_state(&s));
    }
}
