//! TUI (Terminal User Interface) module for the mind-reading game
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: renders the session and maps key presses to [`UserAction`]s
//!
//! # Screens
//! One screen per session phase: start prompt (`Idle`), question card with a
//! progress gauge (`Asking`), thinking animation (`Thinking`) and the result
//! (`Revealed`). `H` toggles a "how it works" panel on top of any of them.

use crate::cards::{BITS, MAX_NUMBER};
use crate::cli::how_it_works;
use crate::game_state::{GameInterface, InputEvent, UserAction};
use crate::session::{PhaseKind, Session};
use crate::timer::Clock;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const NUMBERS_PER_ROW: usize = 8;
const THINKING_FRAMES_PER_DOT: usize = 3;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const NUMBER_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

/// Snapshot of the session taken on each render, used to build the frame.
#[derive(Debug, Clone, Default)]
struct ScreenState {
    phase: Option<PhaseKind>,
    question_index: usize,
    numbers: Vec<u8>,
    result: Option<u8>,
    can_restart: bool,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    screen: &'a ScreenState,
    show_help: bool,
    frame_count: usize,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and session display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    screen: ScreenState,
    show_help: bool,
    frame_count: usize,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            screen: ScreenState::default(),
            show_help: false,
            frame_count: 0,
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            screen: &self.screen,
            show_help: self.show_help,
            frame_count: self.frame_count,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Render the complete UI layout using the provided context.
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Progress
                Constraint::Min(9),    // Main panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_progress(f, chunks[1], ctx.screen);
        match ctx.screen.phase {
            Some(PhaseKind::Asking) => Self::render_card(f, chunks[2], ctx),
            Some(PhaseKind::Thinking) => Self::render_thinking(f, chunks[2], ctx.frame_count),
            Some(PhaseKind::Revealed) => Self::render_result(f, chunks[2], ctx.screen.result),
            Some(PhaseKind::Idle) | None => Self::render_start(f, chunks[2], ctx.error_message),
        }
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.screen);

        if ctx.show_help {
            Self::render_help(f, chunks[2]);
        }
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("MAGIC NUMBER GUESSING")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_progress(f: &mut Frame, area: Rect, screen: &ScreenState) {
        let block = Block::default().borders(Borders::ALL).title("Progress");
        if screen.phase != Some(PhaseKind::Asking) {
            f.render_widget(block, area);
            return;
        }

        let question = screen.question_index + 1;
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(question as f64 / BITS as f64)
            .label(format!("Question {question} / {BITS}"));
        f.render_widget(gauge, area);
    }

    fn render_start(f: &mut Frame, area: Rect, error_message: &str) {
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("Think of a number between "),
                Span::styled(format!("1 and {MAX_NUMBER}"), INFO_STYLE),
                Span::raw("."),
            ]),
            Line::from(format!("I'll try to read your mind with {BITS} questions!")),
            Line::from(""),
            Line::from(Span::styled("Press ENTER to start", SUCCESS_STYLE)),
        ];
        if !error_message.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_card(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let question = ctx.screen.question_index + 1;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Question {question} of {BITS}"),
                HEADER_STYLE,
            )),
            Line::from("Is your number in this set?"),
            Line::from(""),
        ];

        for row in ctx.screen.numbers.chunks(NUMBERS_PER_ROW) {
            let mut spans = Vec::with_capacity(row.len() * 2);
            for n in row {
                spans.push(Span::styled(format!(" {n:>2} "), NUMBER_STYLE));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_thinking(f: &mut Frame, area: Rect, frame_count: usize) {
        let dots = ".".repeat(frame_count / THINKING_FRAMES_PER_DOT % 4);
        let lines = vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(format!("Let me think{dots}"), INFO_STYLE)),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_result(f: &mut Frame, area: Rect, result: Option<u8>) {
        let value = result.map_or_else(|| "?".to_string(), |n| n.to_string());
        let lines = vec![
            Line::from(""),
            Line::from("Your number is:"),
            Line::from(""),
            Line::from(Span::styled(value, SUCCESS_STYLE)),
            Line::from(""),
            Line::from("Press R to play again"),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_help(f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(how_it_works())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("How it works (H to close)")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::Black)),
            );
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, screen: &ScreenState) {
        let text = match screen.phase {
            Some(PhaseKind::Asking) => "Y: Yes | N: No | R: Restart | H: How it works | ESC: Quit",
            Some(PhaseKind::Thinking) if screen.can_restart => "R: Restart | ESC: Quit",
            Some(PhaseKind::Thinking) => "Please wait... | ESC: Quit",
            Some(PhaseKind::Revealed) => "R: Play again | H: How it works | ESC: Quit",
            Some(PhaseKind::Idle) | None => "ENTER: Start | H: How it works | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn status_for(screen: &ScreenState) -> String {
        match screen.phase {
            Some(PhaseKind::Asking) => {
                format!("Answering question {} of {BITS}", screen.question_index + 1)
            }
            Some(PhaseKind::Thinking) => "Reading your mind...".to_string(),
            Some(PhaseKind::Revealed) => "Got it!".to_string(),
            Some(PhaseKind::Idle) | None => "Ready to start".to_string(),
        }
    }

    /// Maps a key press to an action valid in the phase on screen.
    fn handle_key(&mut self, key: KeyEvent) -> InputEvent {
        if key.kind != KeyEventKind::Press {
            debug_log!("handle_key() - Ignoring non-Press key event: {:?}", key.kind);
            return InputEvent::Invalid;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputEvent::Action(UserAction::Exit);
        }

        self.error_message.clear();
        let phase = self.screen.phase.unwrap_or(PhaseKind::Idle);
        let action = match map_key(phase, key.code) {
            Ok(action) => action,
            Err(message) => {
                self.error_message = message;
                None
            }
        };

        debug_log!("handle_key() - {:?} in {:?} -> {:?}", key.code, phase, action);
        action.map_or(InputEvent::Invalid, InputEvent::Action)
    }
}

/// Key binding for `phase`. `Err` carries a hint for keys that look like a
/// mistaken answer.
fn map_key(phase: PhaseKind, code: KeyCode) -> Result<Option<UserAction>, String> {
    let action = match (phase, code) {
        (_, KeyCode::Esc | KeyCode::Char('q' | 'Q')) => UserAction::Exit,
        (_, KeyCode::Char('h' | 'H')) => UserAction::ToggleHelp,
        (PhaseKind::Idle, KeyCode::Enter | KeyCode::Char('s' | 'S')) => UserAction::Start,
        (PhaseKind::Asking, KeyCode::Char('y' | 'Y')) => UserAction::Answer(true),
        (PhaseKind::Asking, KeyCode::Char('n' | 'N')) => UserAction::Answer(false),
        (
            PhaseKind::Asking | PhaseKind::Thinking | PhaseKind::Revealed,
            KeyCode::Char('r' | 'R'),
        )
        | (PhaseKind::Revealed, KeyCode::Enter) => UserAction::Restart,
        (PhaseKind::Asking, KeyCode::Char(c)) => {
            return Err(format!("Press Y or N ('{c}' is not an answer)"));
        }
        (PhaseKind::Idle, KeyCode::Char(_)) => return Err("Press ENTER to start".to_string()),
        _ => return Ok(None),
    };
    Ok(Some(action))
}

impl GameInterface for TuiInterface {
    fn render<C: Clock>(&mut self, session: &Session<C>) {
        let phase = session.phase_kind();
        if self.screen.phase != Some(phase) {
            info_log!("render() - Phase changed to {:?}", phase);
            self.error_message.clear();
        }
        self.screen = ScreenState {
            phase: Some(phase),
            question_index: session.question_index(),
            numbers: session
                .current_card()
                .map(|card| card.numbers().to_vec())
                .unwrap_or_default(),
            result: session.result(),
            can_restart: session.can_restart(),
        };
        self.status = Self::status_for(&self.screen);
        self.frame_count = self.frame_count.wrapping_add(1);
        self.draw_or_log();
    }

    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent {
        let poll_timeout = timeout.map_or(Duration::from_millis(EVENT_POLL_TIMEOUT_MS), |t| {
            t.min(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))
        });

        match event::poll(poll_timeout) {
            Ok(false) => InputEvent::Timeout,
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => self.handle_key(key),
                Ok(_) => InputEvent::Timeout,
                Err(e) => {
                    info_log!("wait_for_input() - Read error: {}, exiting", e);
                    InputEvent::Action(UserAction::Exit)
                }
            },
            Err(e) => {
                info_log!("wait_for_input() - Poll error: {}, exiting", e);
                InputEvent::Action(UserAction::Exit)
            }
        }
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_start_only_when_idle() {
        assert_eq!(
            map_key(PhaseKind::Idle, KeyCode::Enter),
            Ok(Some(UserAction::Start))
        );
        assert_eq!(map_key(PhaseKind::Asking, KeyCode::Enter), Ok(None));
        assert_eq!(map_key(PhaseKind::Thinking, KeyCode::Enter), Ok(None));
    }

    #[test]
    fn test_map_key_answers_while_asking() {
        assert_eq!(
            map_key(PhaseKind::Asking, KeyCode::Char('y')),
            Ok(Some(UserAction::Answer(true)))
        );
        assert_eq!(
            map_key(PhaseKind::Asking, KeyCode::Char('N')),
            Ok(Some(UserAction::Answer(false)))
        );
        assert!(map_key(PhaseKind::Asking, KeyCode::Char('x')).is_err());
        assert_eq!(map_key(PhaseKind::Revealed, KeyCode::Char('y')), Ok(None));
    }

    #[test]
    fn test_map_key_restart_and_exit() {
        for phase in [PhaseKind::Asking, PhaseKind::Thinking, PhaseKind::Revealed] {
            assert_eq!(
                map_key(phase, KeyCode::Char('r')),
                Ok(Some(UserAction::Restart))
            );
        }
        assert_eq!(map_key(PhaseKind::Idle, KeyCode::Char('r')).ok(), None);
        assert_eq!(
            map_key(PhaseKind::Thinking, KeyCode::Esc),
            Ok(Some(UserAction::Exit))
        );
        assert_eq!(
            map_key(PhaseKind::Idle, KeyCode::Char('h')),
            Ok(Some(UserAction::ToggleHelp))
        );
    }

    #[test]
    fn test_status_for_each_phase() {
        let mut screen = ScreenState::default();
        assert_eq!(TuiInterface::status_for(&screen), "Ready to start");
        screen.phase = Some(PhaseKind::Asking);
        screen.question_index = 2;
        assert_eq!(TuiInterface::status_for(&screen), "Answering question 3 of 6");
        screen.phase = Some(PhaseKind::Revealed);
        assert_eq!(TuiInterface::status_for(&screen), "Got it!");
    }
}
