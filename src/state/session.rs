//! Session state machine driving the lobby/round lifecycle.

use thiserror::Error;

use crate::config;

/// High-level phases the session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Lobby state: players can join/leave and a game can be started.
    #[default]
    Idle,
    /// A game is running; rounds are being played.
    Active,
    /// All rounds completed; final scoreboard is displayed.
    Ended,
}

impl SessionPhase {
    /// Lowercase wire name of the phase, used in REST snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Active => "active",
            SessionPhase::Ended => "ended",
        }
    }
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A start request arrived while the lobby is idle.
    StartGame,
    /// The round loop completed its final round.
    FinishGame,
    /// An explicit "return to lobby" request. Valid from any phase.
    ReturnToLobby,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// State machine implementing the lobby/game phase flow.
#[derive(Debug, Clone, Default)]
struct SessionStateMachine {
    phase: SessionPhase,
}

impl SessionStateMachine {
    fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Apply an event, moving the machine to the next phase.
    fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (SessionPhase::Idle, SessionEvent::StartGame) => SessionPhase::Active,
            (SessionPhase::Active, SessionEvent::FinishGame) => SessionPhase::Ended,
            (_, SessionEvent::ReturnToLobby) => SessionPhase::Idle,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next;
        Ok(next)
    }
}

/// Process-wide session state: phase, round counter, and round duration.
///
/// Invariant: `round` is 0 while idle, increments by exactly one per round
/// while active, and never exceeds `max_rounds`.
#[derive(Debug)]
pub struct GameSession {
    machine: SessionStateMachine,
    round: u32,
    max_rounds: u32,
    duration_secs: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            machine: SessionStateMachine::default(),
            round: 0,
            max_rounds: config::MAX_ROUNDS,
            duration_secs: config::DEFAULT_ROUND_SECS,
        }
    }
}

impl GameSession {
    /// Create a session in the idle phase with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Current round number (0 while idle).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Configured number of rounds for a full game.
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Configured per-round duration in whole seconds.
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Move to the active phase with the given (already clamped) duration.
    ///
    /// Fails while a game is active or ended; start requests outside the
    /// lobby are ignored by the caller.
    pub fn start(&mut self, duration_secs: u64) -> Result<(), InvalidTransition> {
        self.machine.apply(SessionEvent::StartGame)?;
        self.round = 0;
        self.duration_secs = duration_secs;
        Ok(())
    }

    /// Advance to the next round, returning its number and the round duration.
    ///
    /// Returns `None` once the phase has left active (an external lobby reset)
    /// or the final round has been played, so the round loop quiesces.
    pub fn begin_round(&mut self) -> Option<(u32, u64)> {
        if self.machine.phase() != SessionPhase::Active || self.round >= self.max_rounds {
            return None;
        }

        self.round += 1;
        Some((self.round, self.duration_secs))
    }

    /// Mark the game finished after its final round.
    pub fn finish(&mut self) -> Result<(), InvalidTransition> {
        self.machine.apply(SessionEvent::FinishGame)?;
        Ok(())
    }

    /// Reset to the lobby from any phase.
    pub fn reset_to_lobby(&mut self) {
        // ReturnToLobby is accepted from every phase, so this cannot fail.
        let _ = self.machine.apply(SessionEvent::ReturnToLobby);
        self.round = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_idle() {
        let session = GameSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn full_happy_path_through_game() {
        let mut session = GameSession::new();
        session.start(10).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.duration_secs(), 10);

        for expected in 1..=config::MAX_ROUNDS {
            let (round, duration) = session.begin_round().unwrap();
            assert_eq!(round, expected);
            assert_eq!(duration, 10);
        }

        assert_eq!(session.begin_round(), None);
        session.finish().unwrap();
        assert_eq!(session.phase(), SessionPhase::Ended);

        session.reset_to_lobby();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn start_is_rejected_outside_idle() {
        let mut session = GameSession::new();
        session.start(25).unwrap();

        let err = session.start(30).unwrap_err();
        assert_eq!(err.from, SessionPhase::Active);
        assert_eq!(err.event, SessionEvent::StartGame);
        // The rejected start must not touch the configured duration.
        assert_eq!(session.duration_secs(), 25);

        session.begin_round();
        session.finish().unwrap();
        assert!(session.start(30).is_err());
    }

    #[test]
    fn finish_is_rejected_outside_active() {
        let mut session = GameSession::new();
        let err = session.finish().unwrap_err();
        assert_eq!(err.from, SessionPhase::Idle);
        assert_eq!(err.event, SessionEvent::FinishGame);
    }

    #[test]
    fn lobby_reset_quiesces_round_loop() {
        let mut session = GameSession::new();
        session.start(25).unwrap();
        session.begin_round().unwrap();

        session.reset_to_lobby();
        assert_eq!(session.begin_round(), None);
        // The interrupted game must not be reported as finished.
        assert!(session.finish().is_err());
    }

    #[test]
    fn lobby_return_is_accepted_from_any_phase() {
        let mut session = GameSession::new();
        session.reset_to_lobby();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.start(25).unwrap();
        session.reset_to_lobby();
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn round_never_exceeds_max_rounds() {
        let mut session = GameSession::new();
        session.start(25).unwrap();
        while session.begin_round().is_some() {}
        assert_eq!(session.round(), config::MAX_ROUNDS);
        assert_eq!(session.begin_round(), None);
        assert_eq!(session.round(), config::MAX_ROUNDS);
    }
}
