//! Player state within one session.

use uuid::Uuid;

/// One connected participant.
///
/// Created on join, mutated by roll and event resolution, removed from the
/// session's list on disconnect. A player who rejoins receives a fresh
/// identity; there is no reconnection with identity preservation.
#[derive(Debug, Clone)]
pub struct Player {
    /// Identifies the live network connection; one per current socket.
    pub connection_id: String,
    /// Stable identity for the lifetime of this membership.
    pub player_id: Uuid,
    /// Trimmed, non-blank display name.
    pub display_name: String,
    /// Targeting attribute: member of the devout group.
    pub is_devout: bool,
    /// Targeting attribute: member of the merchant group.
    pub is_merchant: bool,
    /// Board position in `[0, BOARD_CELLS)`.
    pub position: usize,
    /// Whether the connection is live.
    pub is_connected: bool,
    /// Terminal; eliminated players never act or get targeted again.
    pub is_dead: bool,
    /// Turns still owed; decremented only by the turn-advance scan.
    pub turns_to_skip: u32,
}

impl Player {
    /// Creates a freshly joined player at the starting cell.
    #[must_use]
    pub fn new(connection_id: &str, display_name: &str, is_devout: bool, is_merchant: bool) -> Self {
        Self {
            connection_id: connection_id.to_owned(),
            player_id: Uuid::new_v4(),
            display_name: display_name.to_owned(),
            is_devout,
            is_merchant,
            position: 0,
            is_connected: true,
            is_dead: false,
            turns_to_skip: 0,
        }
    }

    /// Whether the player is still in the game.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_starts_at_cell_zero_alive_and_unskipped() {
        let player = Player::new("conn-1", "Aldric", true, false);

        assert_eq!(player.position, 0);
        assert!(player.is_connected);
        assert!(player.is_alive());
        assert_eq!(player.turns_to_skip, 0);
        assert!(player.is_devout);
        assert!(!player.is_merchant);
    }

    #[test]
    fn test_two_players_get_distinct_identities() {
        let a = Player::new("conn-1", "Aldric", false, false);
        let b = Player::new("conn-2", "Berta", false, false);

        assert_ne!(a.player_id, b.player_id);
    }
}
