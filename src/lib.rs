// Library interface for mind-reader
// This allows integration tests to access internal modules

pub mod accumulator;
pub mod cards;
pub mod cli;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod timer;
pub mod tui;

// Re-export commonly used items for easier testing
pub use accumulator::accumulate;
pub use cards::{BITS, Card, CardSet, MAX_NUMBER, cards, generate_cards};
pub use game_state::{GameInterface, InputEvent, UserAction, game_loop};
pub use session::{
    AnswerOutcome, DEFAULT_REVEAL_DELAY, Phase, PhaseKind, RestartPolicy, Session, SessionConfig,
};
pub use timer::{Clock, ManualClock, RevealTicket, SystemClock};
