//! Wire protocol frames for the game hub.
//!
//! Inbound calls and outbound frames are tagged JSON. The outbound
//! notification vocabulary itself lives in the session context; this
//! module adds the inbound side and the caller-only error frame.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chronica_session::application::notifications::SessionNotification;

/// One inbound remote call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientCall {
    /// Join a session, creating it on first use.
    Join {
        /// The match to join.
        session_id: Uuid,
        /// Display name; trimmed, must not be blank.
        display_name: String,
        /// Targeting attribute: devout group.
        #[serde(default)]
        is_devout: bool,
        /// Targeting attribute: merchant group.
        #[serde(default)]
        is_merchant: bool,
    },
    /// Roll the movement die.
    RollMovement {
        /// The match.
        session_id: Uuid,
    },
    /// Look up the landed cell's event.
    BeginTurnEvent {
        /// The match.
        session_id: Uuid,
    },
    /// Resolve the landed cell's event.
    FinishTurnEvent {
        /// The match.
        session_id: Uuid,
        /// Explicit target for chosen-player outcomes.
        #[serde(default)]
        chosen_player_id: Option<Uuid>,
    },
    /// Submit a required event roll.
    SubmitEventRoll {
        /// The match.
        session_id: Uuid,
    },
    /// Request the current snapshot.
    Sync {
        /// The match.
        session_id: Uuid,
    },
}

impl ClientCall {
    /// The session this call addresses.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        match self {
            Self::Join { session_id, .. }
            | Self::RollMovement { session_id }
            | Self::BeginTurnEvent { session_id }
            | Self::FinishTurnEvent { session_id, .. }
            | Self::SubmitEventRoll { session_id }
            | Self::Sync { session_id } => *session_id,
        }
    }
}

/// Error frame sent to the calling connection only.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrame {
    /// Always `"Error"`; keeps outbound frames uniformly tagged.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// One outbound frame.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerFrame {
    /// A session notification.
    Notification(SessionNotification),
    /// A caller-only failure report.
    Error(ErrorFrame),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_calls_deserialize_from_tagged_json() {
        let session_id = Uuid::new_v4();
        let json = format!(
            r#"{{"type":"Join","session_id":"{session_id}","display_name":"Aldric","is_devout":true}}"#
        );

        let call: ClientCall = serde_json::from_str(&json).unwrap();

        match call {
            ClientCall::Join {
                session_id: parsed,
                display_name,
                is_devout,
                is_merchant,
            } => {
                assert_eq!(parsed, session_id);
                assert_eq!(display_name, "Aldric");
                assert!(is_devout);
                assert!(!is_merchant);
            }
            other => panic!("expected Join, got {other:?}"),
        }
    }

    #[test]
    fn test_finish_turn_event_defaults_the_chosen_player() {
        let session_id = Uuid::new_v4();
        let json = format!(r#"{{"type":"FinishTurnEvent","session_id":"{session_id}"}}"#);

        let call: ClientCall = serde_json::from_str(&json).unwrap();

        match call {
            ClientCall::FinishTurnEvent {
                chosen_player_id, ..
            } => assert!(chosen_player_id.is_none()),
            other => panic!("expected FinishTurnEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_call_types_fail_to_parse() {
        let result =
            serde_json::from_str::<ClientCall>(r#"{"type":"FireTheCatapult","session_id":"x"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_error_frames_serialize_with_the_shared_tag() {
        let frame = ServerFrame::Error(ErrorFrame {
            kind: "Error",
            code: "not_your_turn",
            message: "not your turn".to_owned(),
        });

        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "Error");
        assert_eq!(json["code"], "not_your_turn");
    }
}
