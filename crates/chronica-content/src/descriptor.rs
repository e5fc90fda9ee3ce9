//! Cell event descriptors.
//!
//! A descriptor is immutable authored data: what happens when a token lands
//! on a cell, who it happens to, and — for roll events — how die values map
//! to outcomes.

use serde::Serialize;
use uuid::Uuid;

/// Number of cells on the cyclic board.
pub const BOARD_CELLS: usize = 30;

/// Selects which players an outcome applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetGroup {
    /// The player whose turn triggered the event.
    CurrentPlayer,
    /// A player explicitly chosen by the current player.
    ChosenPlayer,
    /// Every living player in the session.
    AllAlivePlayers,
    /// Living players flagged as devout.
    Devout,
    /// Living players flagged as merchants.
    Merchants,
    /// Living players not flagged as merchants.
    NonMerchants,
}

/// What a resolved event does to a targeted player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Nothing happens.
    None,
    /// Move by a signed offset, wrapping in both directions.
    MoveByOffset(i32),
    /// Move directly to a cell.
    MoveToCell(usize),
    /// The active player keeps the turn after resolution.
    RepeatTurn,
    /// Add to the player's skip counter.
    SkipTurns(u32),
    /// Remove the player from the game permanently.
    Eliminate,
}

/// Inclusive die-value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceRange {
    /// Lowest matching value.
    pub from: u32,
    /// Highest matching value.
    pub to: u32,
}

impl DiceRange {
    /// Creates a range. `from` must not exceed `to`.
    #[must_use]
    pub const fn new(from: u32, to: u32) -> Self {
        assert!(from <= to, "range start must not exceed range end");
        Self { from, to }
    }

    /// Whether `value` falls inside the range.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.from && value <= self.to
    }
}

/// One deterministic outcome of a fixed-mode event.
#[derive(Debug, Clone, Serialize)]
pub struct FixedOutcome {
    /// What happens.
    pub outcome: Outcome,
    /// Who it happens to.
    pub target: TargetGroup,
    /// Authored text shown when the outcome applies.
    pub text: &'static str,
}

/// One row of a roll-mode event's range table.
#[derive(Debug, Clone, Serialize)]
pub struct RollEntry {
    /// Die values this row matches.
    pub range: DiceRange,
    /// What happens to a matching roller.
    pub outcome: Outcome,
    /// Who is required to roll against this row.
    pub target: TargetGroup,
    /// Authored text shown when the outcome applies.
    pub text: &'static str,
}

/// How an event resolves once the turn reaches it.
#[derive(Debug, Clone, Serialize)]
pub enum ResolutionMode {
    /// Outcomes applied deterministically, in order, with no randomness.
    Fixed(Vec<FixedOutcome>),
    /// Each required player rolls a die mapped through the range table.
    Roll(Vec<RollEntry>),
}

/// An immutable event descriptor attached to one board cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellEvent {
    /// Stable identifier for this descriptor instance.
    pub id: Uuid,
    /// Short authored title.
    pub title: &'static str,
    /// Authored description shown when the event triggers.
    pub description: &'static str,
    /// Optional closing flavor line.
    pub narration: Option<&'static str>,
    /// Resolution rules.
    pub resolution: ResolutionMode,
}

impl CellEvent {
    /// Target groups declared anywhere in this event's resolution rules,
    /// deduplicated, in first-appearance order.
    #[must_use]
    pub fn declared_targets(&self) -> Vec<TargetGroup> {
        let groups: Vec<TargetGroup> = match &self.resolution {
            ResolutionMode::Fixed(outcomes) => outcomes.iter().map(|o| o.target).collect(),
            ResolutionMode::Roll(entries) => entries.iter().map(|e| e.target).collect(),
        };
        let mut seen = Vec::new();
        for group in groups {
            if !seen.contains(&group) {
                seen.push(group);
            }
        }
        seen
    }
}
