use crate::session::Session;
use crate::timer::Clock;
use crate::{debug_log, info_log};
use std::time::Duration;

/// Actions a front end can forward to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Start,
    Answer(bool),
    Restart,
    ToggleHelp,
    Exit,
}

/// Result of waiting for player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Action(UserAction),
    /// Nothing arrived before the timeout.
    Timeout,
    /// Input was read but not understood.
    Invalid,
}

/// Presentation adapter driven by [`game_loop`].
pub trait GameInterface {
    fn render<C: Clock>(&mut self, session: &Session<C>);

    /// Waits for the next input. `timeout` is set while a reveal is pending
    /// and bounds how long the interface may block.
    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent;

    fn toggle_help(&mut self) {}

    fn display_exit_message(&mut self);
}

/// Runs rounds until the player exits.
pub fn game_loop<C: Clock, I: GameInterface>(session: &mut Session<C>, interface: &mut I) {
    info_log!("game_loop() - Starting");
    loop {
        session.tick();
        interface.render(session);

        let action = match interface.wait_for_input(session.time_until_reveal()) {
            InputEvent::Action(action) => action,
            InputEvent::Timeout | InputEvent::Invalid => continue,
        };
        debug_log!("game_loop() - Action: {:?}", action);

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Start => {
                session.start();
            }
            UserAction::Answer(yes) => {
                session.submit_answer(yes);
            }
            UserAction::Restart => {
                session.restart();
            }
            UserAction::ToggleHelp => interface.toggle_help(),
        }
    }
    info_log!("game_loop() - Finished");
}
