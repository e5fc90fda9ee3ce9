//! Read-model DTOs for session state.
//!
//! A snapshot is taken under the session lock and broadcast after the lock
//! is released; it carries everything a client needs to render the match.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::session::GameSession;

/// Read-only view of one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    /// Player identity.
    pub player_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Targeting attribute: devout group.
    pub is_devout: bool,
    /// Targeting attribute: merchant group.
    pub is_merchant: bool,
    /// Board position.
    pub position: usize,
    /// Whether the connection is live.
    pub is_connected: bool,
    /// Whether the player has been eliminated.
    pub is_dead: bool,
    /// Turns still owed.
    pub turns_to_skip: u32,
}

/// Read-only view of a pending roll barrier.
#[derive(Debug, Clone, Serialize)]
pub struct PendingEventRollView {
    /// The descriptor being resolved.
    pub event_id: Uuid,
    /// Players who still owe a roll, sorted for stable output.
    pub required_player_ids: Vec<Uuid>,
    /// Players whose rolls have arrived, in arrival order.
    pub resolved_player_ids: Vec<Uuid>,
    /// Accumulated repeat flag.
    pub repeat_turn: bool,
}

/// Read-only view of one session.
#[derive(Debug, Clone, Serialize)]
pub struct GameStateView {
    /// Session identifier.
    pub session_id: Uuid,
    /// Players in rotation order.
    pub players: Vec<PlayerView>,
    /// Holder of the active turn, if assigned.
    pub active_turn_player_id: Option<Uuid>,
    /// The most recent movement roll.
    pub last_roll_value: u32,
    /// Whether a turn is open.
    pub is_turn_in_progress: bool,
    /// The pending roll barrier, if any.
    pub pending_event_roll: Option<PendingEventRollView>,
}

impl GameStateView {
    /// Builds a snapshot of the session. Call while holding its lock.
    #[must_use]
    pub fn from_session(session: &GameSession) -> Self {
        let pending_event_roll = session.pending_event_roll.as_ref().map(|barrier| {
            let mut required: Vec<Uuid> =
                barrier.required_player_ids.iter().copied().collect();
            required.sort();
            PendingEventRollView {
                event_id: barrier.event_id,
                required_player_ids: required,
                resolved_player_ids: barrier
                    .resolved
                    .iter()
                    .map(|entry| entry.player_id)
                    .collect(),
                repeat_turn: barrier.repeat_turn,
            }
        });

        // A holder who left mid-barrier leaves a dangling id behind;
        // clients see null until the rotation lands on a real player.
        let active_turn_player_id = session.active_turn_player_id.filter(|id| {
            session.players.iter().any(|player| player.player_id == *id)
        });

        Self {
            session_id: session.session_id,
            players: session
                .players
                .iter()
                .map(|player| PlayerView {
                    player_id: player.player_id,
                    display_name: player.display_name.clone(),
                    is_devout: player.is_devout,
                    is_merchant: player.is_merchant,
                    position: player.position,
                    is_connected: player.is_connected,
                    is_dead: player.is_dead,
                    turns_to_skip: player.turns_to_skip,
                })
                .collect(),
            active_turn_player_id,
            last_roll_value: session.last_roll_value,
            is_turn_in_progress: session.is_turn_in_progress,
            pending_event_roll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chronica_content::{DiceRange, Outcome};
    use std::collections::HashSet;

    use crate::domain::barrier::{BarrierEntry, RollBarrier};
    use crate::domain::outcome::ResolvedOutcome;

    fn session_with_players() -> GameSession {
        let mut session = GameSession::new(
            Uuid::new_v4(),
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        );
        session.join("conn-1", "Aldric", true, false).unwrap();
        session.join("conn-2", "Berta", false, true).unwrap();
        session
    }

    #[test]
    fn test_snapshot_mirrors_players_in_rotation_order() {
        let mut session = session_with_players();
        session.players[1].position = 7;
        session.players[1].turns_to_skip = 2;
        session.last_roll_value = 4;

        let view = GameStateView::from_session(&session);

        assert_eq!(view.session_id, session.session_id);
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.players[0].display_name, "Aldric");
        assert!(view.players[0].is_devout);
        assert_eq!(view.players[1].position, 7);
        assert_eq!(view.players[1].turns_to_skip, 2);
        assert!(view.players[1].is_merchant);
        assert_eq!(view.last_roll_value, 4);
        assert_eq!(view.active_turn_player_id, None);
        assert!(view.pending_event_roll.is_none());
    }

    #[test]
    fn test_snapshot_exposes_the_pending_barrier() {
        let mut session = session_with_players();
        let first = session.players[0].player_id;
        let second = session.players[1].player_id;
        let event_id = Uuid::new_v4();
        let mut barrier = RollBarrier::new(
            event_id,
            4,
            vec![BarrierEntry {
                range: DiceRange::new(1, 6),
                outcome: Outcome::None,
                player_ids: [first, second].into_iter().collect(),
            }],
            HashSet::from([second]),
        );
        barrier.resolved.push(ResolvedOutcome {
            player_id: first,
            roll: Some(3),
            outcome: Outcome::None,
        });
        barrier.repeat_turn = true;
        session.pending_event_roll = Some(barrier);
        session.is_turn_in_progress = true;

        let view = GameStateView::from_session(&session);

        let pending = view.pending_event_roll.expect("barrier view expected");
        assert_eq!(pending.event_id, event_id);
        assert_eq!(pending.required_player_ids, vec![second]);
        assert_eq!(pending.resolved_player_ids, vec![first]);
        assert!(pending.repeat_turn);
        assert!(view.is_turn_in_progress);
    }

    #[test]
    fn test_snapshot_nulls_a_dangling_turn_holder() {
        let mut session = session_with_players();
        session.active_turn_player_id = Some(Uuid::new_v4());

        let view = GameStateView::from_session(&session);

        assert_eq!(view.active_turn_player_id, None);
    }

    #[test]
    fn test_snapshot_required_ids_are_sorted() {
        let mut session = session_with_players();
        session.join("conn-3", "Cedric", false, false).unwrap();
        let ids: Vec<Uuid> = session.players.iter().map(|p| p.player_id).collect();
        session.pending_event_roll = Some(RollBarrier::new(
            Uuid::new_v4(),
            0,
            Vec::new(),
            ids.iter().copied().collect(),
        ));

        let view = GameStateView::from_session(&session);

        let mut expected = ids;
        expected.sort();
        assert_eq!(
            view.pending_event_roll.unwrap().required_player_ids,
            expected
        );
    }
}
