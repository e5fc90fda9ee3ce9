//! Concurrent session registry.
//!
//! Sessions are created lazily on first join and removed once empty. The
//! map lock and each session's own lock are distinct: operations on one
//! session never block another, and the map lock is held only for
//! insert/lookup/remove. Removal re-checks emptiness under the session
//! lock to close the race between "became empty" and "someone rejoined".

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use chronica_core::clock::Clock;

use crate::domain::session::GameSession;

/// Shared handle to one session's state, guarded by its own lock.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Owns every live session.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the session for `session_id`, creating it if absent.
    pub fn get_or_create(&self, session_id: Uuid) -> SharedSession {
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        Arc::clone(sessions.entry(session_id).or_insert_with(|| {
            tracing::debug!(%session_id, "creating session");
            Arc::new(Mutex::new(GameSession::new(session_id, self.clock.now())))
        }))
    }

    /// Returns the session for `session_id`, if it exists.
    #[must_use]
    pub fn get(&self, session_id: Uuid) -> Option<SharedSession> {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .get(&session_id)
            .map(Arc::clone)
    }

    /// Removes the session if its player list is empty.
    ///
    /// Emptiness is re-checked under the session's own lock so a join that
    /// raced this call keeps the session alive.
    pub fn remove_if_empty(&self, session_id: Uuid) {
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        let Some(shared) = sessions.get(&session_id) else {
            return;
        };
        let empty = shared
            .lock()
            .expect("session lock poisoned")
            .players
            .is_empty();
        if empty {
            sessions.remove(&session_id);
            tracing::debug!(%session_id, "removed empty session");
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .len()
    }

    /// Whether no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
