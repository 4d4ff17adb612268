//! Error taxonomy for the game engine.
//!
//! Only [`GameError::MoveRejected`] is recoverable: the agent that proposed the
//! move picks another one. Every other variant ends the game run and is
//! reported to the caller as a failed game.

use thiserror::Error;

use crate::core::PlayerId;
use crate::rules::MoveKind;

/// Result alias used throughout the crate.
pub type GameResult<T> = Result<T, GameError>;

/// Everything that can go wrong while running a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Shared state was touched on behalf of a player that does not hold the lock.
    #[error("lock violation: {holder} holds the lock but {player} tried to act")]
    LockViolation { holder: String, player: PlayerId },

    /// A proposed move failed one of its preconditions.
    #[error("{kind} rejected: {reason}")]
    MoveRejected { kind: MoveKind, reason: String },

    /// A move name that is not registered.
    #[error("unknown move '{0}'")]
    UnknownMove(String),

    /// More cards were requested from the deck than it holds.
    #[error("deck has {available} cards, {requested} requested")]
    InsufficientCards { requested: usize, available: usize },

    /// Restoring a mock move did not reproduce the pre-move state.
    #[error("mock move left '{field}' different from its pre-move value")]
    MockMoveInconsistency { field: &'static str },

    /// An agent did not finish within the join timeout.
    #[error("{player} did not finish within {timeout_ms} ms")]
    AgentTimeout { player: PlayerId, timeout_ms: u64 },

    /// An agent thread panicked.
    #[error("{player} panicked")]
    AgentPanicked { player: PlayerId },

    /// An agent kept proposing rejected moves.
    #[error("{player} had {attempts} consecutive moves rejected")]
    MoveAttemptsExhausted { player: PlayerId, attempts: u32 },

    /// The legality query produced an empty set.
    #[error("no legal moves for {player}")]
    NoLegalMoves { player: PlayerId },

    /// A game-wide invariant no longer holds.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The configuration cannot describe a playable game.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// Build a [`GameError::MoveRejected`].
    pub fn rejected(kind: MoveKind, reason: impl Into<String>) -> Self {
        GameError::MoveRejected {
            kind,
            reason: reason.into(),
        }
    }

    /// True when the proposing agent may simply try another move.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::MoveRejected { .. })
    }
}
