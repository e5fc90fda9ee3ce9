//! The per-match turn state machine.
//!
//! A session moves through three states: waiting for a movement roll, a
//! turn in progress (the token has landed, the cell event is unresolved),
//! and — for roll-mode events with a non-empty required set — an event roll
//! barrier. Every operation runs under the session's exclusive lock, held
//! by the caller; nothing here performs I/O.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chronica_content::{BOARD_CELLS, CellEvent, EventTable, Outcome, ResolutionMode};
use chronica_core::error::GameError;
use chronica_core::rng::DeterministicRng;
use serde::Serialize;
use uuid::Uuid;

use super::barrier::{BarrierEntry, RollBarrier};
use super::outcome::{ResolvedOutcome, apply_outcome, resolve_targets};
use super::player::Player;

/// Maximum number of players per session.
pub const MAX_PLAYERS: usize = 4;

/// Result of a movement roll.
#[derive(Debug, Clone, Copy)]
pub struct MovementRoll {
    /// The roller.
    pub player_id: Uuid,
    /// The die value.
    pub roll_value: u32,
    /// The roller's position after moving.
    pub new_position: usize,
}

/// The completed resolution of one cell event.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResolution {
    /// The descriptor that was resolved.
    pub event_id: Uuid,
    /// The cell that triggered it.
    pub cell: usize,
    /// Every applied outcome, in application order.
    pub entries: Vec<ResolvedOutcome>,
    /// Whether the active player keeps the turn.
    pub repeat_turn: bool,
}

/// What `finish_turn_event` produced.
#[derive(Debug, Clone)]
pub enum FinishOutcome {
    /// The event resolved in full; the turn is over (or repeats).
    Resolved(TurnResolution),
    /// A roll barrier was installed; the turn stays open until it clears.
    AwaitingEventRolls,
}

/// Result of one submitted event roll.
#[derive(Debug, Clone)]
pub struct EventRollSubmission {
    /// The roller.
    pub player_id: Uuid,
    /// The die value.
    pub roll_value: u32,
    /// The outcome applied to the roller.
    pub outcome: Outcome,
    /// Present when this roll emptied the barrier.
    pub completion: Option<TurnResolution>,
}

/// Result of removing a connection's player.
#[derive(Debug, Clone)]
pub struct PlayerRemoval {
    /// The removed player.
    pub player_id: Uuid,
    /// Their display name, for logging.
    pub display_name: String,
    /// Present when the departure emptied a pending barrier.
    pub completion: Option<TurnResolution>,
    /// Whether the session is now empty and should be dropped.
    pub session_empty: bool,
}

/// One match: players, turn pointer, and the optional roll barrier.
#[derive(Debug)]
pub struct GameSession {
    /// Session identifier.
    pub session_id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Insertion order doubles as the turn rotation basis.
    pub players: Vec<Player>,
    /// Holder of the active turn; assigned lazily on the first roll.
    pub active_turn_player_id: Option<Uuid>,
    /// The most recent movement roll.
    pub last_roll_value: u32,
    /// True from a movement roll until its event fully resolves.
    pub is_turn_in_progress: bool,
    /// Present only while a roll-mode event is being resolved.
    pub pending_event_roll: Option<RollBarrier>,
}

impl GameSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new(session_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            created_at,
            players: Vec::new(),
            active_turn_player_id: None,
            last_roll_value: 0,
            is_turn_in_progress: false,
            pending_event_roll: None,
        }
    }

    /// Adds a player and returns the new identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the trimmed name is empty and
    /// `SessionFull` at capacity.
    pub fn join(
        &mut self,
        connection_id: &str,
        display_name: &str,
        is_devout: bool,
        is_merchant: bool,
    ) -> Result<Uuid, GameError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidInput(
                "display name is required".to_owned(),
            ));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::SessionFull);
        }

        let player = Player::new(connection_id, name, is_devout, is_merchant);
        let player_id = player.player_id;
        self.players.push(player);
        Ok(player_id)
    }

    /// Rolls the movement die and advances the caller's token.
    ///
    /// Assigns the first turn lazily to the first player in list order.
    /// The turn itself does not advance here; it stays open until the
    /// landed cell's event resolves.
    ///
    /// # Errors
    ///
    /// `NotAMember`, `PlayerEliminated`, `NotYourTurn`, `TurnInProgress`,
    /// or `MustSkipTurn` (the skip counter is only consumed by the
    /// turn-advance scan, never by this check).
    #[allow(clippy::cast_possible_truncation)]
    pub fn roll_movement(
        &mut self,
        connection_id: &str,
        rng: &mut dyn DeterministicRng,
    ) -> Result<MovementRoll, GameError> {
        let index = self.caller_index(connection_id)?;
        if self.players[index].is_dead {
            return Err(GameError::PlayerEliminated);
        }

        if self.active_turn_player_id.is_none() {
            self.active_turn_player_id = Some(self.players[0].player_id);
        }
        if Some(self.players[index].player_id) != self.active_turn_player_id {
            return Err(GameError::NotYourTurn);
        }
        if self.is_turn_in_progress {
            return Err(GameError::TurnInProgress);
        }
        let owed = self.players[index].turns_to_skip;
        if owed > 0 {
            return Err(GameError::MustSkipTurn(owed));
        }

        let roll = rng.next_u32_range(1, 6);
        self.last_roll_value = roll;
        let player = &mut self.players[index];
        player.position = (player.position + roll as usize) % BOARD_CELLS;
        self.is_turn_in_progress = true;

        Ok(MovementRoll {
            player_id: player.player_id,
            roll_value: roll,
            new_position: player.position,
        })
    }

    /// Looks up the event descriptor for the caller's current cell.
    ///
    /// # Errors
    ///
    /// Turn-order violations as for `roll_movement` (inverted progress
    /// check), `EventRollPending` while a barrier is open, and
    /// `MissingCellEvent` when the table has a hole — an authoring defect,
    /// not a game condition; session state is untouched.
    pub fn begin_turn_event<'table>(
        &self,
        connection_id: &str,
        table: &'table EventTable,
    ) -> Result<&'table CellEvent, GameError> {
        let index = self.caller_index(connection_id)?;
        self.check_turn_open(index)?;

        let cell = self.players[index].position;
        table.get(cell).ok_or(GameError::MissingCellEvent(cell))
    }

    /// Resolves the caller's cell event, or installs a roll barrier.
    ///
    /// Fixed mode applies every `(outcome, target)` pair immediately and
    /// closes the turn (the active player keeps it when a `RepeatTurn` was
    /// applied). Roll mode resolves the union of declared target groups
    /// once; an empty required set completes immediately, otherwise the
    /// session enters the barrier state and the turn stays open.
    ///
    /// # Errors
    ///
    /// As for `begin_turn_event`.
    pub fn finish_turn_event(
        &mut self,
        connection_id: &str,
        chosen_player_id: Option<Uuid>,
        table: &EventTable,
    ) -> Result<FinishOutcome, GameError> {
        let index = self.caller_index(connection_id)?;
        self.check_turn_open(index)?;

        let current_id = self.players[index].player_id;
        let cell = self.players[index].position;
        let event = table.get(cell).ok_or(GameError::MissingCellEvent(cell))?;

        match &event.resolution {
            ResolutionMode::Fixed(outcomes) => {
                let mut repeat_turn = false;
                let mut entries = Vec::new();
                for fixed in outcomes {
                    let targets = resolve_targets(
                        &self.players,
                        current_id,
                        fixed.target,
                        chosen_player_id,
                    );
                    for player_id in targets {
                        if let Some(target) =
                            self.players.iter_mut().find(|p| p.player_id == player_id)
                        {
                            apply_outcome(target, fixed.outcome, &mut repeat_turn);
                        }
                        entries.push(ResolvedOutcome {
                            player_id,
                            roll: None,
                            outcome: fixed.outcome,
                        });
                    }
                }

                self.is_turn_in_progress = false;
                if !repeat_turn {
                    self.advance_turn();
                }
                Ok(FinishOutcome::Resolved(TurnResolution {
                    event_id: event.id,
                    cell,
                    entries,
                    repeat_turn,
                }))
            }
            ResolutionMode::Roll(rows) => {
                let mut required: HashSet<Uuid> = HashSet::new();
                let mut entries = Vec::with_capacity(rows.len());
                for row in rows {
                    let members: HashSet<Uuid> = resolve_targets(
                        &self.players,
                        current_id,
                        row.target,
                        chosen_player_id,
                    )
                    .into_iter()
                    .collect();
                    required.extend(members.iter().copied());
                    entries.push(BarrierEntry {
                        range: row.range,
                        outcome: row.outcome,
                        player_ids: members,
                    });
                }

                if required.is_empty() {
                    // No living player to roll; the event fizzles.
                    self.is_turn_in_progress = false;
                    self.advance_turn();
                    return Ok(FinishOutcome::Resolved(TurnResolution {
                        event_id: event.id,
                        cell,
                        entries: Vec::new(),
                        repeat_turn: false,
                    }));
                }

                self.pending_event_roll =
                    Some(RollBarrier::new(event.id, cell, entries, required));
                Ok(FinishOutcome::AwaitingEventRolls)
            }
        }
    }

    /// Submits the caller's required event roll.
    ///
    /// The mapped outcome applies to the caller only. The roll that empties
    /// the required set tears the barrier down and closes the turn.
    ///
    /// # Errors
    ///
    /// `NoEventRollPending`, `AlreadyRolled`, `NotRequiredToRoll`, or
    /// `NoMatchingRange` when the die value is uncovered for the caller
    /// (authoring defect; the barrier is left untouched).
    pub fn submit_event_roll(
        &mut self,
        connection_id: &str,
        rng: &mut dyn DeterministicRng,
    ) -> Result<EventRollSubmission, GameError> {
        let index = self.caller_index(connection_id)?;
        let player_id = self.players[index].player_id;

        let Some(barrier) = self.pending_event_roll.as_ref() else {
            return Err(GameError::NoEventRollPending);
        };
        if !barrier.required_player_ids.contains(&player_id) {
            if barrier.resolved.iter().any(|e| e.player_id == player_id) {
                return Err(GameError::AlreadyRolled);
            }
            return Err(GameError::NotRequiredToRoll);
        }

        let roll = rng.next_u32_range(1, 6);
        let cell = barrier.cell;
        let outcome = barrier
            .outcome_for(player_id, roll)
            .ok_or(GameError::NoMatchingRange { cell, roll })?;

        let mut repeat_turn = false;
        apply_outcome(&mut self.players[index], outcome, &mut repeat_turn);

        let barrier = self
            .pending_event_roll
            .as_mut()
            .expect("barrier presence checked above");
        barrier.repeat_turn |= repeat_turn;
        barrier.resolved.push(ResolvedOutcome {
            player_id,
            roll: Some(roll),
            outcome,
        });
        barrier.required_player_ids.remove(&player_id);

        let completion = if barrier.is_complete() {
            let barrier = self
                .pending_event_roll
                .take()
                .expect("barrier presence checked above");
            Some(self.close_barrier(barrier))
        } else {
            None
        };

        Ok(EventRollSubmission {
            player_id,
            roll_value: roll,
            outcome,
            completion,
        })
    }

    /// Removes the player owning `connection_id`, unconditionally.
    ///
    /// A pending barrier drops the player from its required set and, if
    /// that empties it, resolves exactly as the submit-completion path.
    /// With no barrier, a departing turn holder closes their half-finished
    /// turn and the rotation advances — no sequence of departures can
    /// leave the session stuck.
    ///
    /// Returns `None` when the connection owns no player here.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<PlayerRemoval> {
        let index = self
            .players
            .iter()
            .position(|p| p.connection_id == connection_id)?;
        let removed = self.players.remove(index);
        let held_active_turn = self.active_turn_player_id == Some(removed.player_id);

        let mut completion = None;
        if let Some(barrier) = self.pending_event_roll.as_mut() {
            barrier.required_player_ids.remove(&removed.player_id);
            if barrier.is_complete() {
                let barrier = self
                    .pending_event_roll
                    .take()
                    .expect("barrier presence checked above");
                completion = Some(self.close_barrier(barrier));
            }
        } else if held_active_turn {
            self.is_turn_in_progress = false;
            self.advance_turn();
        }

        Some(PlayerRemoval {
            player_id: removed.player_id,
            display_name: removed.display_name,
            completion,
            session_empty: self.players.is_empty(),
        })
    }

    /// Tears down a completed barrier and closes the turn.
    ///
    /// The original active player keeps the turn on an accumulated repeat
    /// flag — but only while they are still present and alive; a repeat
    /// owed to a departed or eliminated holder advances instead.
    fn close_barrier(&mut self, barrier: RollBarrier) -> TurnResolution {
        self.is_turn_in_progress = false;
        let holder_can_repeat = barrier.repeat_turn
            && self.active_turn_player_id.is_some_and(|id| {
                self.players.iter().any(|p| p.player_id == id && p.is_alive())
            });
        if !holder_can_repeat {
            self.advance_turn();
        }
        TurnResolution {
            event_id: barrier.event_id,
            cell: barrier.cell,
            entries: barrier.resolved,
            repeat_turn: barrier.repeat_turn,
        }
    }

    /// Selects the next active player.
    ///
    /// Scans the living players in stable original order starting after
    /// the current holder (index 0 when the holder died or left). A
    /// candidate with a pending skip silently consumes one skip and is
    /// passed over. If every candidate was skipping, the immediate next
    /// candidate gets the turn anyway — progress is guaranteed, at the
    /// cost of occasionally granting a turn to a player whose counter
    /// just reached zero on this same pass.
    fn advance_turn(&mut self) {
        let alive: Vec<usize> = (0..self.players.len())
            .filter(|&i| self.players[i].is_alive())
            .collect();
        if alive.is_empty() {
            self.active_turn_player_id = None;
            return;
        }

        let holder_index = self
            .active_turn_player_id
            .and_then(|id| {
                alive
                    .iter()
                    .position(|&i| self.players[i].player_id == id)
            })
            .unwrap_or(0);

        for step in 1..=alive.len() {
            let candidate = alive[(holder_index + step) % alive.len()];
            if self.players[candidate].turns_to_skip > 0 {
                self.players[candidate].turns_to_skip -= 1;
            } else {
                self.active_turn_player_id = Some(self.players[candidate].player_id);
                return;
            }
        }

        let fallback = alive[(holder_index + 1) % alive.len()];
        self.active_turn_player_id = Some(self.players[fallback].player_id);
    }

    fn caller_index(&self, connection_id: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.connection_id == connection_id)
            .ok_or(GameError::NotAMember)
    }

    /// Shared preconditions of `begin_turn_event` / `finish_turn_event`.
    fn check_turn_open(&self, caller: usize) -> Result<(), GameError> {
        let player = &self.players[caller];
        if player.is_dead {
            return Err(GameError::PlayerEliminated);
        }
        if Some(player.player_id) != self.active_turn_player_id {
            return Err(GameError::NotYourTurn);
        }
        if !self.is_turn_in_progress {
            return Err(GameError::TurnNotInProgress);
        }
        if self.pending_event_roll.is_some() {
            return Err(GameError::EventRollPending);
        }
        Ok(())
    }
}
