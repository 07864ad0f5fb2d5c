//! TUI application state and logic

use crate::commands::{PlayerReport, player_report};
use crate::core::{GameMode, Player, QuestionType};
use crate::game::{Clock, DisplaySnapshot, GameEngine, Guess, GuessOutcome, OutcomeKind, Phase};
use crate::repository::ItemRepository;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::debug;

/// How often the screen refreshes while waiting for a key
pub const TICK: Duration = Duration::from_millis(250);

/// Messages kept in the side panel
const MAX_MESSAGES: usize = 6;

/// Application state
pub struct App<R, C> {
    pub engine: GameEngine<R, C>,
    pub player: Player,
    pub screen: Screen,
    pub question_type: QuestionType,
    pub mode: GameMode,
    pub snapshot: Option<DisplaySnapshot>,
    pub last_outcome: Option<GuessOutcome>,
    pub report: PlayerReport,
    pub messages: Vec<Message>,
    pub should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Picking question type and mode
    Setup,
    Playing,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

impl<R: ItemRepository, C: Clock> App<R, C> {
    #[must_use]
    pub fn new(engine: GameEngine<R, C>, player: Player) -> Self {
        let report = player_report(engine.repository(), &player);
        let mut app = Self {
            engine,
            player,
            screen: Screen::Setup,
            question_type: QuestionType::Elevation,
            mode: GameMode::Classic,
            snapshot: None,
            last_outcome: None,
            report,
            messages: Vec::new(),
            should_quit: false,
        };
        app.add_message(
            &format!("Welcome, {}! Pick a question and a mode.", app.player.username),
            MessageStyle::Info,
        );
        app
    }

    pub fn cycle_question(&mut self) {
        let all = QuestionType::ALL;
        let index = all.iter().position(|&q| q == self.question_type).unwrap_or(0);
        self.question_type = all[(index + 1) % all.len()];
    }

    pub fn select_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    /// Start a round with the selected question type and mode
    pub fn start_round(&mut self) {
        self.last_outcome = None;
        match self
            .engine
            .start_round(&self.player, self.question_type, self.mode)
        {
            Ok(()) => {
                self.screen = Screen::Playing;
                self.messages.clear();
                self.add_message(self.mode.intro(), MessageStyle::Info);
                self.refresh();
            }
            Err(err) => {
                self.screen = Screen::Setup;
                self.add_message(&format!("{err}. Run `seed` first."), MessageStyle::Error);
            }
        }
    }

    pub fn guess(&mut self, guess: Guess) {
        if self.screen != Screen::Playing {
            return;
        }

        let outcome = self.engine.submit_guess(guess);
        let style = match outcome.kind {
            OutcomeKind::Correct => MessageStyle::Success,
            OutcomeKind::PoolExhausted if outcome.correct => MessageStyle::Success,
            _ => MessageStyle::Error,
        };
        // Headline only; the full narration is on the main panel
        let headline = outcome.message.lines().next().unwrap_or_default().to_string();
        self.add_message(&headline, style);
        self.last_outcome = Some(outcome);
        self.refresh();
    }

    /// Back to setup; an unfinished round is dropped unsaved
    pub fn new_round(&mut self) {
        if self.engine.phase() == Phase::InProgress {
            self.add_message("Round abandoned, score not saved.", MessageStyle::Info);
        }
        self.screen = Screen::Setup;
        self.snapshot = None;
        self.last_outcome = None;
    }

    /// Re-read the round; ends a time-limited round whose clock ran out
    pub fn refresh(&mut self) {
        self.snapshot = self.engine.current_display();

        if self.screen == Screen::Playing && self.engine.phase() == Phase::GameOver {
            self.screen = Screen::GameOver;
            if self.last_outcome.as_ref().is_none_or(|o| !o.is_game_over()) {
                self.add_message("⏰ Time's up!", MessageStyle::Error);
            }
            self.report = player_report(self.engine.repository(), &self.player);
            debug!(score = ?self.snapshot.as_ref().map(|s| s.score), "round over on screen");
        }
    }

    /// Called when no key arrived within one tick
    pub fn on_tick(&mut self) {
        if self.screen == Screen::Playing {
            self.refresh();
        }
    }

    /// Full narration for the game over panel
    #[must_use]
    pub fn game_over_text(&self) -> Option<String> {
        match &self.last_outcome {
            Some(outcome) if outcome.is_game_over() => Some(outcome.message.clone()),
            _ => self
                .engine
                .game_over_message()
                .map(|summary| format!("Time's up!{summary}")),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Setup => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab | KeyCode::Char('t') | KeyCode::Left | KeyCode::Right => {
                    self.cycle_question();
                }
                KeyCode::Char('1') => self.select_mode(GameMode::Classic),
                KeyCode::Char('2') => self.select_mode(GameMode::SuddenDeath),
                KeyCode::Char('3') => self.select_mode(GameMode::TimeLimited),
                KeyCode::Enter | KeyCode::Char(' ') => self.start_round(),
                _ => {}
            },
            Screen::Playing => match code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('h') | KeyCode::Up => self.guess(Guess::Higher),
                KeyCode::Char('l') | KeyCode::Down => self.guess(Guess::Lower),
                KeyCode::Char('n') => self.new_round(),
                _ => {}
            },
            Screen::GameOver => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('n') => self.new_round(),
                KeyCode::Char('r') | KeyCode::Enter => self.start_round(),
                _ => {}
            },
        }
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui<R: ItemRepository, C: Clock>(app: App<R, C>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B, R, C>(terminal: &mut Terminal<B>, mut app: App<R, C>) -> Result<()>
where
    B: ratatui::backend::Backend,
    R: ItemRepository,
    C: Clock,
{
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (fixes Windows double-input bug)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        } else {
            app.on_tick();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
