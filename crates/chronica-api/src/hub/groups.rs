//! Per-session connection groups.
//!
//! Each live connection owns an unbounded outbound channel; the writer
//! task on the socket side drains it. Broadcasting clones the frame into
//! every member's channel — a cheap in-memory push, so holding the map
//! lock across it never blocks on the network.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::ServerFrame;

/// Outbound channel for one connection.
pub type ConnectionSender = mpsc::UnboundedSender<ServerFrame>;

/// Session-keyed map of connected senders.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: Mutex<HashMap<Uuid, HashMap<String, ConnectionSender>>>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a session's group.
    pub fn add(&self, session_id: Uuid, connection_id: &str, sender: ConnectionSender) {
        self.groups
            .lock()
            .expect("group map lock poisoned")
            .entry(session_id)
            .or_default()
            .insert(connection_id.to_owned(), sender);
    }

    /// Removes a connection from a session's group, dropping the group
    /// when it empties.
    pub fn remove(&self, session_id: Uuid, connection_id: &str) {
        let mut groups = self.groups.lock().expect("group map lock poisoned");
        if let Some(members) = groups.get_mut(&session_id) {
            members.remove(connection_id);
            if members.is_empty() {
                groups.remove(&session_id);
            }
        }
    }

    /// Sends a frame to every member of a session's group.
    ///
    /// Closed receivers are skipped; disconnect cleanup removes them.
    pub fn send_to_group(&self, session_id: Uuid, frame: &ServerFrame) {
        let groups = self.groups.lock().expect("group map lock poisoned");
        if let Some(members) = groups.get(&session_id) {
            for sender in members.values() {
                let _ = sender.send(frame.clone());
            }
        }
    }

    /// Sends a frame to every member except `connection_id`.
    pub fn send_to_others(&self, session_id: Uuid, connection_id: &str, frame: &ServerFrame) {
        let groups = self.groups.lock().expect("group map lock poisoned");
        if let Some(members) = groups.get(&session_id) {
            for (member_id, sender) in members {
                if member_id != connection_id {
                    let _ = sender.send(frame.clone());
                }
            }
        }
    }

    /// Number of connections in a session's group.
    #[must_use]
    pub fn group_size(&self, session_id: Uuid) -> usize {
        self.groups
            .lock()
            .expect("group map lock poisoned")
            .get(&session_id)
            .map_or(0, HashMap::len)
    }
}
