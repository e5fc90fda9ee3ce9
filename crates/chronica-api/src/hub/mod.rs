//! The game hub: one WebSocket endpoint per deployment, one connection per
//! participant.
//!
//! Each socket splits into a read loop and a writer task. The writer drains
//! the connection's outbound channel; the read loop parses tagged JSON
//! calls and hands them to [`dispatch`]. When the socket closes for any
//! reason, the disconnect path runs the same cleanup a deliberate leave
//! would.

pub mod dispatch;
pub mod groups;
pub mod protocol;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use chronica_core::error::GameError;

use crate::error::error_frame;
use crate::state::AppState;
use self::protocol::{ClientCall, ServerFrame};

/// GET /hubs/game — upgrades to the game WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    let (mut sink, mut stream) = socket.split();
    let (sender, mut outbound) = mpsc::unbounded_channel::<ServerFrame>();

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            let text = serde_json::to_string(&frame)
                .expect("ServerFrame serialization is infallible");
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    tracing::debug!(%connection_id, "connection opened");

    let mut joined_session: Option<Uuid> = None;
    while let Some(message) = stream.next().await {
        let Ok(message) = message else {
            break;
        };
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientCall>(&text) {
                Ok(call) => dispatch::handle_call(
                    &state,
                    &connection_id,
                    &sender,
                    &mut joined_session,
                    call,
                ),
                Err(parse_error) => {
                    tracing::debug!(%connection_id, %parse_error, "unparseable call");
                    let _ = sender.send(ServerFrame::Error(error_frame(
                        &GameError::InvalidInput(parse_error.to_string()),
                    )));
                }
            },
            Message::Close(_) => break,
            // Pings are answered by axum; binary frames are not part of
            // the protocol.
            _ => {}
        }
    }

    dispatch::handle_disconnect(&state, &connection_id, joined_session);
    writer.abort();
    tracing::debug!(%connection_id, "connection closed");
}
