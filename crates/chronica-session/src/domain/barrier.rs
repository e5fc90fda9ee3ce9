//! Roll barrier — transient synchronization for roll-mode events.
//!
//! The barrier exists only between `FinishTurnEvent` installing it and the
//! last required roll (or disconnect) emptying it. Targeting is frozen at
//! install time: each range row carries the concrete member set it applies
//! to, so membership changes mid-barrier cannot re-target it.

use std::collections::HashSet;

use chronica_content::{DiceRange, Outcome};
use uuid::Uuid;

use super::outcome::ResolvedOutcome;

/// One row of the barrier's frozen range table.
#[derive(Debug, Clone)]
pub struct BarrierEntry {
    /// Die values this row matches.
    pub range: DiceRange,
    /// Outcome applied to a matching roller.
    pub outcome: Outcome,
    /// Players this row applies to, resolved at install time.
    pub player_ids: HashSet<Uuid>,
}

/// Tracks which players still owe a roll before a roll-mode event closes.
#[derive(Debug, Clone)]
pub struct RollBarrier {
    /// The descriptor being resolved.
    pub event_id: Uuid,
    /// The cell that triggered the event.
    pub cell: usize,
    /// Frozen range table.
    pub entries: Vec<BarrierEntry>,
    /// Players who still owe a roll; shrinks on roll or disconnect.
    pub required_player_ids: HashSet<Uuid>,
    /// Rolls submitted so far, in arrival order.
    pub resolved: Vec<ResolvedOutcome>,
    /// OR-accumulated across every applied outcome.
    pub repeat_turn: bool,
}

impl RollBarrier {
    /// Creates a barrier over the given frozen entries and required set.
    #[must_use]
    pub fn new(
        event_id: Uuid,
        cell: usize,
        entries: Vec<BarrierEntry>,
        required_player_ids: HashSet<Uuid>,
    ) -> Self {
        Self {
            event_id,
            cell,
            entries,
            required_player_ids,
            resolved: Vec::new(),
            repeat_turn: false,
        }
    }

    /// Maps a die value through the rows that apply to `player_id`.
    ///
    /// Returns `None` when the value falls outside every applicable range —
    /// an authoring defect the caller reports as a configuration error.
    #[must_use]
    pub fn outcome_for(&self, player_id: Uuid, roll: u32) -> Option<Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.range.contains(roll) && entry.player_ids.contains(&player_id))
            .map(|entry| entry.outcome)
    }

    /// Whether every required roll has arrived (or its owner left).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.required_player_ids.is_empty()
    }
}
