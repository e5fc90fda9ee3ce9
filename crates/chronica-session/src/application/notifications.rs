//! Outbound notification vocabulary.
//!
//! Every mutation produces one or more of these; the coordinator boundary
//! decides the audience (caller, others, whole group) per operation and
//! serializes them onto the wire as tagged JSON.

use serde::Serialize;
use uuid::Uuid;

use chronica_content::CellEvent;

use super::snapshot::GameStateView;
use crate::domain::session::TurnResolution;

/// A notification fanned out to one or more connections.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SessionNotification {
    /// To the joining caller: their new identity plus the full state.
    Joined {
        /// The caller's player identity.
        player_id: Uuid,
        /// Snapshot after the join.
        state: GameStateView,
    },
    /// To the rest of the group: someone joined.
    PlayerJoined {
        /// Snapshot after the join.
        state: GameStateView,
    },
    /// To the group: someone left.
    PlayerLeft {
        /// The departed player.
        player_id: Uuid,
    },
    /// To the group: the authoritative state.
    StateUpdated {
        /// Current snapshot.
        state: GameStateView,
    },
    /// To the group: a movement roll landed.
    DiceRolled {
        /// The roller.
        player_id: Uuid,
        /// The die value.
        roll_value: u32,
        /// The roller's new position.
        new_position: usize,
    },
    /// To the caller: the landed cell's event descriptor.
    TurnBegan {
        /// The descriptor to present.
        event: CellEvent,
    },
    /// To the group: a cell event fully resolved.
    TurnEnded {
        /// The applied outcomes.
        resolution: TurnResolution,
    },
    /// To the group: one event roll arrived (the barrier may remain open).
    EventDiceRolled {
        /// The roller.
        player_id: Uuid,
        /// The die value.
        roll_value: u32,
    },
}
