//! Shared application state.

use std::sync::{Arc, Mutex};

use chronica_content::EventTable;
use chronica_core::rng::DeterministicRng;
use chronica_session::registry::SessionRegistry;

use crate::hub::groups::GroupRegistry;

/// Application state shared across all connections.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions.
    pub registry: Arc<SessionRegistry>,
    /// The preloaded cell event table.
    pub events: Arc<EventTable>,
    /// Per-session connection groups for broadcast.
    pub groups: Arc<GroupRegistry>,
    /// Shared die; swapped for a scripted sequence in tests.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        registry: Arc<SessionRegistry>,
        events: Arc<EventTable>,
        groups: Arc<GroupRegistry>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    ) -> Self {
        Self {
            registry,
            events,
            groups,
            rng,
        }
    }
}
