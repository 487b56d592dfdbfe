//! Session state machine for one round of the mind-reading trick.
//!
//! # State Machine
//! - `Idle` → `Asking` on [`Session::start`]
//! - `Asking` → `Asking` on each of the first five answers, → `Thinking` on the sixth
//! - `Thinking` → `Revealed` once the reveal delay has elapsed ([`Session::tick`]
//!   or [`Session::reveal`])
//! - any phase → `Idle` on [`Session::restart`], subject to [`RestartPolicy`]
//!
//! Every `start`/`restart` bumps the session generation, so a reveal ticket
//! issued for an earlier round can never apply to the current one.

use crate::accumulator::accumulate;
use crate::cards::{BITS, Card, cards};
use crate::timer::{Clock, RevealTicket, SystemClock};
use crate::{debug_log, info_log};
use std::time::Duration;

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1800);

/// Which phases accept a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Restart is honoured in every phase, including mid-Thinking.
    #[default]
    Anytime,
    /// Restart (and a fresh start) are ignored while Thinking.
    LockedWhileThinking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub reveal_delay: Duration,
    pub restart_policy: RestartPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            restart_policy: RestartPolicy::default(),
        }
    }
}

/// Current phase, carrying only the data valid in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Fewer than [`BITS`] answers so far; the next question is `answers.len()`.
    Asking { answers: Vec<bool> },
    Thinking {
        answers: [bool; BITS],
        ticket: RevealTicket,
    },
    Revealed { answers: [bool; BITS] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Asking,
    Thinking,
    Revealed,
}

impl Phase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Asking { .. } => PhaseKind::Asking,
            Self::Thinking { .. } => PhaseKind::Thinking,
            Self::Revealed { .. } => PhaseKind::Revealed,
        }
    }
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Recorded; `question_index` is the question now being asked.
    Next { question_index: usize },
    /// Recorded the last answer; the reveal is scheduled by the ticket.
    Thinking(RevealTicket),
    /// Not in `Asking`; nothing changed.
    Ignored,
}

#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    phase: Phase,
    generation: u64,
    config: SessionConfig,
    clock: C,
}

impl Session<SystemClock> {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    #[must_use]
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            config,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the question being asked (or last asked once all are answered).
    #[must_use]
    pub fn question_index(&self) -> usize {
        match &self.phase {
            Phase::Idle => 0,
            Phase::Asking { answers } => answers.len(),
            Phase::Thinking { .. } | Phase::Revealed { .. } => BITS - 1,
        }
    }

    #[must_use]
    pub fn answers(&self) -> &[bool] {
        match &self.phase {
            Phase::Idle => &[],
            Phase::Asking { answers } => answers,
            Phase::Thinking { answers, .. } | Phase::Revealed { answers } => answers,
        }
    }

    /// Card for the current question, only while asking.
    #[must_use]
    pub fn current_card(&self) -> Option<&'static Card> {
        match &self.phase {
            Phase::Asking { answers } => cards().get(answers.len()),
            _ => None,
        }
    }

    /// The guessed number, only once revealed.
    #[must_use]
    pub fn result(&self) -> Option<u8> {
        match &self.phase {
            Phase::Revealed { answers } => Some(accumulate(answers)),
            _ => None,
        }
    }

    /// Time left before the automatic reveal, only while thinking.
    #[must_use]
    pub fn time_until_reveal(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Thinking { ticket, .. } => Some(ticket.remaining(self.clock.now())),
            _ => None,
        }
    }

    #[must_use]
    pub fn can_restart(&self) -> bool {
        !(self.config.restart_policy == RestartPolicy::LockedWhileThinking
            && matches!(self.phase, Phase::Thinking { .. }))
    }

    /// Begins a new round from any phase the restart policy allows.
    pub fn start(&mut self) -> bool {
        if !self.can_restart() {
            debug_log!("start() - Ignored while thinking (restart locked)");
            return false;
        }
        self.generation += 1;
        self.phase = Phase::Asking {
            answers: Vec::with_capacity(BITS),
        };
        info_log!("start() - Round {} started", self.generation);
        true
    }

    pub fn submit_answer(&mut self, yes: bool) -> AnswerOutcome {
        let kind = self.phase.kind();
        let Phase::Asking { answers } = &mut self.phase else {
            debug_log!("submit_answer() - Ignored in {:?} phase", kind);
            return AnswerOutcome::Ignored;
        };

        answers.push(yes);
        debug_log!(
            "submit_answer() - Question {} answered {}",
            answers.len(),
            if yes { "yes" } else { "no" }
        );
        if answers.len() < BITS {
            return AnswerOutcome::Next {
                question_index: answers.len(),
            };
        }

        let complete: [bool; BITS] = std::array::from_fn(|i| answers[i]);
        let ticket = RevealTicket::new(self.generation, self.clock.now() + self.config.reveal_delay);
        self.phase = Phase::Thinking {
            answers: complete,
            ticket,
        };
        info_log!(
            "submit_answer() - All answers in, revealing in {:?}",
            self.config.reveal_delay
        );
        AnswerOutcome::Thinking(ticket)
    }

    /// Returns to `Idle`, discarding the round and any pending reveal.
    pub fn restart(&mut self) -> bool {
        if !self.can_restart() {
            debug_log!("restart() - Ignored while thinking (restart locked)");
            return false;
        }
        self.generation += 1;
        self.phase = Phase::Idle;
        info_log!("restart() - Session reset (generation {})", self.generation);
        true
    }

    /// Applies the pending reveal if its deadline has passed.
    pub fn tick(&mut self) -> bool {
        let due = match &self.phase {
            Phase::Thinking { ticket, .. } => *ticket,
            _ => return false,
        };
        if !due.is_due(self.clock.now()) {
            return false;
        }
        self.reveal(due)
    }

    /// Fires a reveal scheduled elsewhere. Stale tickets are ignored.
    pub fn reveal(&mut self, ticket: RevealTicket) -> bool {
        let answers = match &self.phase {
            Phase::Thinking {
                answers,
                ticket: current,
            } if *current == ticket && ticket.generation() == self.generation => *answers,
            _ => {
                debug_log!(
                    "reveal() - Stale ticket for generation {} ignored (current {})",
                    ticket.generation(),
                    self.generation
                );
                return false;
            }
        };
        self.phase = Phase::Revealed { answers };
        info_log!("reveal() - Revealed {:?}", self.result());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;

    fn session() -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (
            Session::with_clock(SessionConfig::default(), clock.clone()),
            clock,
        )
    }

    fn answer_all(session: &mut Session<ManualClock>, answers: [bool; BITS]) -> AnswerOutcome {
        let mut outcome = AnswerOutcome::Ignored;
        for yes in answers {
            outcome = session.submit_answer(yes);
        }
        outcome
    }

    #[test]
    fn test_new_session_is_idle() {
        let (session, _) = session();
        assert_eq!(session.phase_kind(), PhaseKind::Idle);
        assert_eq!(session.question_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_start_enters_asking() {
        let (mut session, _) = session();
        assert!(session.start());
        assert_eq!(session.phase_kind(), PhaseKind::Asking);
        assert_eq!(session.question_index(), 0);
        assert_eq!(session.current_card().map(Card::bit), Some(0));
    }

    #[test]
    fn test_question_index_tracks_answers() {
        let (mut session, _) = session();
        session.start();
        for expected in 1..BITS {
            let outcome = session.submit_answer(expected % 2 == 0);
            assert_eq!(
                outcome,
                AnswerOutcome::Next {
                    question_index: expected
                }
            );
            assert_eq!(session.question_index(), session.answers().len());
        }
        assert_eq!(session.current_card().map(Card::bit), Some(BITS - 1));
    }

    #[test]
    fn test_sixth_answer_enters_thinking() {
        let (mut session, clock) = session();
        session.start();
        let outcome = answer_all(&mut session, [true, false, true, false, false, false]);
        let AnswerOutcome::Thinking(ticket) = outcome else {
            panic!("Expected Thinking, got {outcome:?}");
        };
        assert_eq!(session.phase_kind(), PhaseKind::Thinking);
        assert_eq!(session.answers().len(), BITS);
        assert_eq!(ticket.deadline(), clock.now() + DEFAULT_REVEAL_DELAY);
        assert_eq!(session.result(), None);
        assert_eq!(session.current_card(), None);
    }

    #[test]
    fn test_tick_before_deadline_keeps_thinking() {
        let (mut session, clock) = session();
        session.start();
        answer_all(&mut session, [true; BITS]);
        clock.advance(DEFAULT_REVEAL_DELAY - Duration::from_millis(1));
        assert!(!session.tick());
        assert_eq!(session.phase_kind(), PhaseKind::Thinking);
        assert_eq!(session.time_until_reveal(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn test_tick_after_deadline_reveals() {
        let (mut session, clock) = session();
        session.start();
        answer_all(&mut session, [true; BITS]);
        clock.advance(DEFAULT_REVEAL_DELAY);
        assert!(session.tick());
        assert_eq!(session.phase_kind(), PhaseKind::Revealed);
        assert_eq!(session.result(), Some(63));
        assert!(!session.tick());
    }

    #[test]
    fn test_submit_answer_outside_asking_is_ignored() {
        let (mut session, clock) = session();
        assert_eq!(session.submit_answer(true), AnswerOutcome::Ignored);
        assert!(session.answers().is_empty());

        session.start();
        answer_all(&mut session, [false, true, false, false, false, false]);
        assert_eq!(session.submit_answer(true), AnswerOutcome::Ignored);
        assert_eq!(session.answers(), &[false, true, false, false, false, false]);
        assert_eq!(session.question_index(), BITS - 1);

        clock.advance(DEFAULT_REVEAL_DELAY);
        session.tick();
        assert_eq!(session.submit_answer(true), AnswerOutcome::Ignored);
        assert_eq!(session.result(), Some(2));
    }

    #[test]
    fn test_restart_during_thinking_cancels_reveal() {
        let (mut session, clock) = session();
        session.start();
        answer_all(&mut session, [true; BITS]);
        assert!(session.restart());
        clock.advance(DEFAULT_REVEAL_DELAY * 2);
        assert!(!session.tick());
        assert_eq!(session.phase_kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_stale_ticket_cannot_reveal_next_round() {
        let (mut session, clock) = session();
        session.start();
        let AnswerOutcome::Thinking(stale) = answer_all(&mut session, [true; BITS]) else {
            panic!("Expected Thinking");
        };
        session.restart();
        session.start();
        let AnswerOutcome::Thinking(fresh) = answer_all(&mut session, [false; BITS]) else {
            panic!("Expected Thinking");
        };
        clock.advance(DEFAULT_REVEAL_DELAY);

        assert!(!session.reveal(stale));
        assert_eq!(session.phase_kind(), PhaseKind::Thinking);
        assert!(session.reveal(fresh));
        assert_eq!(session.result(), Some(0));
    }

    #[test]
    fn test_start_mid_round_begins_fresh() {
        let (mut session, _) = session();
        session.start();
        session.submit_answer(true);
        session.submit_answer(true);
        let generation = session.generation();
        assert!(session.start());
        assert!(session.answers().is_empty());
        assert_eq!(session.generation(), generation + 1);
    }

    #[test]
    fn test_restart_from_revealed_returns_to_idle() {
        let (mut session, clock) = session();
        session.start();
        answer_all(&mut session, [true, false, false, false, false, false]);
        clock.advance(DEFAULT_REVEAL_DELAY);
        session.tick();
        assert_eq!(session.result(), Some(1));

        assert!(session.restart());
        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(session.question_index(), 0);
    }

    #[test]
    fn test_locked_policy_refuses_restart_while_thinking() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            restart_policy: RestartPolicy::LockedWhileThinking,
            ..SessionConfig::default()
        };
        let mut session = Session::with_clock(config, clock.clone());
        session.start();
        session.submit_answer(true);
        assert!(session.restart(), "restart allowed while asking");

        session.start();
        answer_all(&mut session, [true; BITS]);
        assert!(!session.can_restart());
        assert!(!session.restart());
        assert!(!session.start());
        assert_eq!(session.phase_kind(), PhaseKind::Thinking);

        clock.advance(DEFAULT_REVEAL_DELAY);
        assert!(session.tick());
        assert!(session.restart());
    }

    #[test]
    fn test_zero_delay_reveals_on_next_tick() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            reveal_delay: Duration::ZERO,
            ..SessionConfig::default()
        };
        let mut session = Session::with_clock(config, clock);
        session.start();
        answer_all(&mut session, [false, false, true, false, false, false]);
        assert!(session.tick());
        assert_eq!(session.result(), Some(4));
    }
}
