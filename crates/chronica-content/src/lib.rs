//! Chronica Content — the Event Table bounded context.
//!
//! Immutable cell event descriptors keyed by board position, plus the
//! standard 30-cell table. Pure data; session behavior lives in
//! `chronica-session`.

pub mod descriptor;
pub mod table;

pub use descriptor::{
    BOARD_CELLS, CellEvent, DiceRange, FixedOutcome, Outcome, ResolutionMode, RollEntry,
    TargetGroup,
};
pub use table::EventTable;
