//! Chronica Session — the session coordination bounded context.
//!
//! One [`domain::session::GameSession`] per match: the turn state machine,
//! the roll barrier, and the outcome engine. The [`registry::SessionRegistry`]
//! owns the concurrent map of live sessions.

pub mod application;
pub mod domain;
pub mod registry;
