//! Outcome Engine — pure functions over players and outcomes.
//!
//! No shared state: target resolution and outcome application operate on the
//! player list passed in, and position arithmetic is a standalone function.

use chronica_content::{BOARD_CELLS, Outcome, TargetGroup};
use serde::Serialize;
use uuid::Uuid;

use super::player::Player;

/// One applied outcome: who it hit, the die value if one was rolled, and
/// what happened to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedOutcome {
    /// The targeted player.
    pub player_id: Uuid,
    /// The die value, for roll-mode entries; `None` for fixed outcomes.
    pub roll: Option<u32>,
    /// The outcome that was applied.
    pub outcome: Outcome,
}

/// Wraps a position onto the board, for both positive and negative offsets.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_position(position: i64) -> usize {
    let size = BOARD_CELLS as i64;
    (((position % size) + size) % size) as usize
}

/// Resolves a target group to concrete player ids.
///
/// Eliminated players never appear in the result. `ChosenPlayer` falls back
/// from the explicit choice to the first other living player in list order,
/// and finally to the current player when no other living player exists.
#[must_use]
pub fn resolve_targets(
    players: &[Player],
    current_player_id: Uuid,
    group: TargetGroup,
    chosen_player_id: Option<Uuid>,
) -> Vec<Uuid> {
    match group {
        TargetGroup::CurrentPlayer => vec![current_player_id],
        TargetGroup::ChosenPlayer => {
            if let Some(chosen) = chosen_player_id {
                if players
                    .iter()
                    .any(|p| p.player_id == chosen && p.is_alive())
                {
                    return vec![chosen];
                }
            }
            if let Some(other) = players
                .iter()
                .find(|p| p.is_alive() && p.player_id != current_player_id)
            {
                return vec![other.player_id];
            }
            vec![current_player_id]
        }
        TargetGroup::AllAlivePlayers => collect_ids(players, |_| true),
        TargetGroup::Devout => collect_ids(players, |p| p.is_devout),
        TargetGroup::Merchants => collect_ids(players, |p| p.is_merchant),
        TargetGroup::NonMerchants => collect_ids(players, |p| !p.is_merchant),
    }
}

fn collect_ids(players: &[Player], predicate: impl Fn(&Player) -> bool) -> Vec<Uuid> {
    players
        .iter()
        .filter(|p| p.is_alive() && predicate(p))
        .map(|p| p.player_id)
        .collect()
}

/// Applies one outcome to one player. No-op on eliminated players.
///
/// `RepeatTurn` only raises the shared flag; the position is untouched.
/// `SkipTurns` accumulates onto the existing counter.
#[allow(clippy::cast_possible_wrap)]
pub fn apply_outcome(player: &mut Player, outcome: Outcome, repeat_turn: &mut bool) {
    if player.is_dead {
        return;
    }
    match outcome {
        Outcome::None => {}
        Outcome::MoveByOffset(delta) => {
            player.position =
                normalize_position(player.position as i64 + i64::from(delta));
        }
        Outcome::MoveToCell(cell) => {
            player.position = normalize_position(cell as i64);
        }
        Outcome::RepeatTurn => *repeat_turn = true,
        Outcome::SkipTurns(turns) => player.turns_to_skip += turns,
        Outcome::Eliminate => player.is_dead = true,
    }
}
