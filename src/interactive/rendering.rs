//! TUI rendering with ratatui
//!
//! Draws the setup menu, the current-vs-next panels and the game over view.

use super::app::{App, MessageStyle, Screen};
use crate::core::{GameMode, QuestionType};
use crate::game::{Clock, DisplaySnapshot};
use crate::output::formatters::format_played_at;
use crate::repository::ItemRepository;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

/// Main UI rendering function
pub fn ui<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Gauge
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Left panel
            Constraint::Percentage(40), // Right panel
        ])
        .split(chunks[1]);

    match app.screen {
        Screen::Setup => render_setup(f, app, main_chunks[0]),
        Screen::Playing => render_round(f, app.snapshot.as_ref(), main_chunks[0]),
        Screen::GameOver => render_game_over(f, app, main_chunks[0]),
    }
    render_info_panel(f, app, main_chunks[1]);

    render_gauge(f, app.snapshot.as_ref(), chunks[2]);
    render_status(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("✈️  HIGHER OR LOWER 🌍")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn option_line(selected: bool, key: &str, text: &str) -> Line<'static> {
    let (marker, style) = if selected {
        (
            "▶ ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("[{key}] "), Style::default().fg(Color::DarkGray)),
        Span::styled(text.to_string(), style),
    ])
}

fn render_setup<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Question (Tab to switch)",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for question in QuestionType::ALL {
        lines.push(option_line(
            question == app.question_type,
            "Tab",
            question.label(),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Mode",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, mode) in GameMode::ALL.iter().enumerate() {
        lines.push(option_line(
            *mode == app.mode,
            &(i + 1).to_string(),
            mode.display_name(),
        ));
    }

    lines.push(Line::from(""));
    for intro in app.mode.intro().lines() {
        lines.push(Line::from(Span::styled(
            intro,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" New Round ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn item_panel(title: &str, name: &str, value: &str, color: Color) -> Paragraph<'static> {
    let content = vec![
        Line::from(Span::styled(
            name.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(value.to_string()),
    ];

    Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(color)),
        )
}

fn render_round(f: &mut Frame, snapshot: Option<&DisplaySnapshot>, area: Rect) {
    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("No round in progress").block(
            Block::default()
                .title(" Round ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Question
            Constraint::Percentage(50), // Current
            Constraint::Percentage(50), // Next
        ])
        .split(area);

    let question = Paragraph::new(format!(
        "Which has the higher {}?",
        snapshot.question_type.value_label()
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(format!(
        " {} · {} ",
        snapshot.question_label,
        snapshot.mode.display_name()
    )));
    f.render_widget(question, chunks[0]);

    f.render_widget(
        item_panel(
            "Current",
            &snapshot.current_name,
            &snapshot.current_value_text,
            Color::Green,
        ),
        chunks[1],
    );
    f.render_widget(
        item_panel(
            "Next: higher or lower?",
            &snapshot.next_name,
            &snapshot.next_value_text,
            Color::Yellow,
        ),
        chunks[2],
    );
}

fn render_game_over<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let text = app.game_over_text().unwrap_or_default();
    let lines: Vec<Line> = text
        .lines()
        .map(|line| {
            if line.contains("NEW RECORD") || line == "GAME OVER!" {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(line.to_string())
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" 🎉 Round Over ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(Color::Magenta)),
        );
    f.render_widget(paragraph, area);
}

fn render_info_panel<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Player stats
            Constraint::Percentage(50), // Messages
        ])
        .split(area);

    render_player(f, app, chunks[0]);
    render_messages(f, app, chunks[1]);
}

fn render_player<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let report = &app.report;
    let mut lines = vec![Line::from(vec![
        Span::raw("Player: "),
        Span::styled(
            report.username.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    if report.has_games() {
        lines.push(Line::from(format!(
            "Games: {} | Best: {} | Avg: {:.1}",
            report.stats.games_played, report.stats.best, report.stats.average
        )));
        for game in &report.recent {
            lines.push(Line::from(Span::styled(
                format!(
                    "  {:>3}  {:<13} {}",
                    game.score,
                    game.mode.display_name(),
                    format_played_at(&game.played_at)
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
    } else {
        lines.push(Line::from("No games played yet"));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(paragraph, area);
}

fn render_messages<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

/// Time left in a timed round, otherwise score against the best
fn gauge_for(snapshot: &DisplaySnapshot) -> (u16, String, Color) {
    if let (Some(remaining), Some(budget)) = (snapshot.time_remaining, snapshot.mode.time_budget())
    {
        let pct = (remaining.as_secs_f64() / budget.as_secs_f64() * 100.0).clamp(0.0, 100.0);
        let label = format!(
            "{} left | Score: {}",
            snapshot.time_remaining_text.as_deref().unwrap_or_default(),
            snapshot.score
        );
        let color = if pct < 20.0 { Color::Red } else { Color::Cyan };
        return (pct as u16, label, color);
    }

    let best = snapshot.high_score.max(1);
    let pct = (f64::from(snapshot.score) / f64::from(best) * 100.0).min(100.0);
    let label = format!(
        "Score: {} | Best: {} | {}",
        snapshot.score, snapshot.high_score, snapshot.life_indicator
    );
    (pct as u16, label, Color::Green)
}

fn render_gauge(f: &mut Frame, snapshot: Option<&DisplaySnapshot>, area: Rect) {
    let (pct, label, color) = snapshot.map_or_else(
        || (0, "Press Enter to start".to_string(), Color::DarkGray),
        gauge_for,
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(color))
        .percent(pct)
        .label(label);

    f.render_widget(gauge, area);
}

fn render_status<R: ItemRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(area);

    let screen_text = match app.screen {
        Screen::Setup => "Setup",
        Screen::Playing => "Playing",
        Screen::GameOver => "Game over",
    };
    let screen = Paragraph::new(format!("Screen: {screen_text}")).alignment(Alignment::Center);
    f.render_widget(screen, chunks[0]);

    let lives = app
        .snapshot
        .as_ref()
        .map_or_else(String::new, |s| format!("Lives: {}", s.life_indicator));
    f.render_widget(Paragraph::new(lives).alignment(Alignment::Center), chunks[1]);

    let help_text = match app.screen {
        Screen::Setup => "q: Quit | Tab: Question | 1-3: Mode | Enter: Start",
        Screen::Playing => "h/↑: Higher | l/↓: Lower | n: Abandon | q: Quit",
        Screen::GameOver => "r: Replay | n: New Round | q: Quit",
    };

    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::game::GameEngine;
    use crate::repository::{InMemoryRepository, PlayerRegistry};
    use crate::core::Username;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn draws_each_screen() {
        let mut repository = InMemoryRepository::from_embedded();
        let player = repository
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();
        let mut app = App::new(GameEngine::with_clock(repository, ManualClock::new()), player);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("New Round"));

        app.start_round();
        terminal.draw(|f| ui(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Current"));
        assert!(text.contains("???"));
    }
}
