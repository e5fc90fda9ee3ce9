//! Chronica API — wire error mapping.
//!
//! Every `GameError` surfaces to the calling connection as an error frame
//! with a stable machine-readable code; failures are never silently
//! dropped and never broadcast to the group.

use chronica_core::error::GameError;

use crate::hub::protocol::ErrorFrame;

/// Stable wire code for a `GameError`.
#[must_use]
pub fn error_code(error: &GameError) -> &'static str {
    match error {
        GameError::SessionNotFound(_) => "session_not_found",
        GameError::InvalidInput(_) => "invalid_input",
        GameError::SessionFull => "session_full",
        GameError::NotAMember => "not_a_member",
        GameError::PlayerEliminated => "player_eliminated",
        GameError::NotYourTurn => "not_your_turn",
        GameError::TurnInProgress => "turn_in_progress",
        GameError::TurnNotInProgress => "turn_not_in_progress",
        GameError::MustSkipTurn(_) => "must_skip_turn",
        GameError::EventRollPending => "event_roll_pending",
        GameError::NoEventRollPending => "no_event_roll_pending",
        GameError::NotRequiredToRoll => "not_required_to_roll",
        GameError::AlreadyRolled => "already_rolled",
        GameError::MissingCellEvent(_) => "missing_cell_event",
        GameError::NoMatchingRange { .. } => "no_matching_range",
    }
}

/// Builds the error frame sent to the caller.
#[must_use]
pub fn error_frame(error: &GameError) -> ErrorFrame {
    ErrorFrame {
        kind: "Error",
        code: error_code(error),
        message: error.to_string(),
    }
}
