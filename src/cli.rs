use crate::cards::{BITS, MAX_NUMBER};
use crate::game_state::{GameInterface, InputEvent, UserAction};
use crate::session::{PhaseKind, RestartPolicy, Session, SessionConfig};
use crate::timer::Clock;
use clap::{Parser, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Think of a number and let the terminal read your mind
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use the line-based interface instead of the full-screen TUI
    #[arg(long)]
    pub plain: bool,

    /// How long to "think" before revealing the number, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 1800)]
    pub delay_ms: u64,

    /// Which phases accept a restart
    #[arg(long = "restart-policy", value_enum, default_value_t = RestartPolicyArg::Anytime)]
    pub restart_policy: RestartPolicyArg,

    /// Write logs to this file instead of the default location
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RestartPolicyArg {
    /// Restart is allowed in every phase
    Anytime,
    /// Restart is ignored while the reveal is pending
    LockedWhileThinking,
}

impl From<RestartPolicyArg> for RestartPolicy {
    fn from(arg: RestartPolicyArg) -> Self {
        match arg {
            RestartPolicyArg::Anytime => Self::Anytime,
            RestartPolicyArg::LockedWhileThinking => Self::LockedWhileThinking,
        }
    }
}

impl Cli {
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reveal_delay: Duration::from_millis(self.delay_ms),
            restart_policy: self.restart_policy.into(),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

fn parse_action(input: &str) -> Option<UserAction> {
    match input.trim().to_uppercase().as_str() {
        "S" | "START" => Some(UserAction::Start),
        "Y" | "YES" => Some(UserAction::Answer(true)),
        "N" | "NO" => Some(UserAction::Answer(false)),
        "R" | "RESTART" => Some(UserAction::Restart),
        "H" | "HELP" => Some(UserAction::ToggleHelp),
        "Q" | "EXIT" => Some(UserAction::Exit),
        _ => None,
    }
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .chunks(8)
        .map(|row| {
            row.iter()
                .map(|n| format!("{n:>3}"))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn how_it_works() -> String {
    format!(
        "Every number from 1 to {MAX_NUMBER} is a sum of distinct powers of two.\n\
         Card i lists the numbers whose binary digit i is 1, so each \"yes\"\n\
         adds that card's first number (1, 2, 4, 8, 16 or 32) to the total.\n\
         After {BITS} questions the total is exactly your number."
    )
}

/// Line-based front end over any reader/writer pair.
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn say(&mut self, text: &str) {
        // Nothing useful to do if the terminal went away.
        let _ = writeln!(self.writer, "{text}");
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn render<C: Clock>(&mut self, session: &Session<C>) {
        match session.phase_kind() {
            PhaseKind::Idle => {
                self.say(&format!(
                    "\nThink of a number between 1 and {MAX_NUMBER}.\n\
                     I'll try to read your mind with {BITS} questions!\n\
                     Type 'start' to begin, 'help' to learn the trick, or 'exit' to quit:"
                ));
            }
            PhaseKind::Asking => {
                let question = session.question_index() + 1;
                let numbers = session
                    .current_card()
                    .map(|card| format_numbers(card.numbers()))
                    .unwrap_or_default();
                self.say(&format!(
                    "\nQuestion {question} of {BITS}\n{numbers}\n\
                     Is your number in this set? (y/n, 'restart', 'exit'):"
                ));
            }
            PhaseKind::Thinking => self.say("\nLet me think..."),
            PhaseKind::Revealed => {
                if let Some(number) = session.result() {
                    self.say(&format!(
                        "\nYour number is: {number}\nType 'restart' to play again or 'exit' to quit:"
                    ));
                }
            }
        }
    }

    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent {
        if let Some(timeout) = timeout {
            std::thread::sleep(timeout);
            return InputEvent::Timeout;
        }

        let _ = self.writer.flush();
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) | Err(_) => InputEvent::Action(UserAction::Exit),
            Ok(_) => match parse_action(&input) {
                Some(action) => InputEvent::Action(action),
                None => {
                    self.say("Invalid input. Try 'y', 'n', 'start', 'restart', 'help' or 'exit'.");
                    InputEvent::Invalid
                }
            },
        }
    }

    fn toggle_help(&mut self) {
        let text = how_it_works();
        self.say(&format!("\nHow it works:\n{text}"));
    }

    fn display_exit_message(&mut self) {
        self.say("Exiting.");
    }
}
