//! Game error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for session coordination.
///
/// Variants fall into three bands: protocol errors (bad input, unknown
/// session), turn-order violations (expected, frequent, never corrupt the
/// session), and configuration errors (authoring defects in the event
/// table — fatal to the single call that hit them).
#[derive(Debug, Error)]
pub enum GameError {
    /// No session exists under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A request carried missing or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session already holds the maximum number of players.
    #[error("game session is full")]
    SessionFull,

    /// The calling connection is not tracked by this session.
    #[error("player is not part of this session")]
    NotAMember,

    /// The caller has been eliminated and can no longer act.
    #[error("player has been eliminated")]
    PlayerEliminated,

    /// The caller does not hold the active turn.
    #[error("not your turn")]
    NotYourTurn,

    /// A movement roll was attempted while a turn is still being resolved.
    #[error("turn is already in progress")]
    TurnInProgress,

    /// A turn operation was attempted before any movement roll.
    #[error("turn is not in progress")]
    TurnNotInProgress,

    /// The caller owes skipped turns before rolling again.
    #[error("must skip {0} more turn(s)")]
    MustSkipTurn(u32),

    /// A turn event was begun or finished while an event roll is pending.
    #[error("an event roll is already pending")]
    EventRollPending,

    /// An event roll was submitted while no event roll is pending.
    #[error("no event roll is pending")]
    NoEventRollPending,

    /// The caller is not among the players required to roll.
    #[error("player is not required to roll")]
    NotRequiredToRoll,

    /// The caller already submitted their event roll.
    #[error("player has already rolled")]
    AlreadyRolled,

    /// The event table has no descriptor for an occupied cell.
    #[error("no event configured for cell {0}")]
    MissingCellEvent(usize),

    /// A die value fell outside every range declared for the roller.
    #[error("roll {roll} on cell {cell} matches no configured range")]
    NoMatchingRange {
        /// The cell whose event was being resolved.
        cell: usize,
        /// The die value that matched nothing.
        roll: u32,
    },
}

impl GameError {
    /// Whether this error signals an event-table authoring defect rather
    /// than a recoverable game condition.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCellEvent(_) | Self::NoMatchingRange { .. }
        )
    }
}
