//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use chrono::TimeZone;
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use chronica_api::hub;
use chronica_api::hub::groups::{ConnectionSender, GroupRegistry};
use chronica_api::hub::protocol::{ClientCall, ServerFrame};
use chronica_api::routes;
use chronica_api::state::AppState;
use chronica_content::EventTable;
use chronica_session::application::notifications::SessionNotification;
use chronica_session::registry::SessionRegistry;
use chronica_test_support::{FixedClock, SequenceRng};

/// Build app state over the standard table with scripted die rolls and a
/// fixed clock.
pub fn build_test_state(rolls: Vec<u32>) -> AppState {
    let clock = Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    AppState::new(
        Arc::new(SessionRegistry::new(clock)),
        Arc::new(EventTable::standard()),
        Arc::new(GroupRegistry::new()),
        Arc::new(Mutex::new(SequenceRng::new(rolls))),
    )
}

/// Build the full app router with the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .route("/hubs/game", get(hub::ws_handler))
        .with_state(state)
}

/// A fake connection: the sender half is registered with the hub exactly
/// like a live socket's writer channel; the test drains the receiver half.
pub struct TestConnection {
    pub connection_id: String,
    pub sender: ConnectionSender,
    pub receiver: mpsc::UnboundedReceiver<ServerFrame>,
    pub joined_session: Option<Uuid>,
}

/// Creates a fake connection.
pub fn connection(connection_id: &str) -> TestConnection {
    let (sender, receiver) = mpsc::unbounded_channel();
    TestConnection {
        connection_id: connection_id.to_owned(),
        sender,
        receiver,
        joined_session: None,
    }
}

impl TestConnection {
    /// Dispatches one call as this connection.
    pub fn call(&mut self, state: &AppState, call: ClientCall) {
        hub::dispatch::handle_call(
            state,
            &self.connection_id,
            &self.sender,
            &mut self.joined_session,
            call,
        );
    }

    /// Joins a session with default attributes and returns the frames the
    /// caller received.
    pub fn join(&mut self, state: &AppState, session_id: Uuid, name: &str) -> Vec<ServerFrame> {
        self.call(
            state,
            ClientCall::Join {
                session_id,
                display_name: name.to_owned(),
                is_devout: false,
                is_merchant: false,
            },
        );
        self.drain()
    }

    /// Runs the disconnect path as the transport would.
    pub fn disconnect(&mut self, state: &AppState) {
        hub::dispatch::handle_disconnect(state, &self.connection_id, self.joined_session.take());
    }

    /// Collects every frame received so far.
    pub fn drain(&mut self) -> Vec<ServerFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.receiver.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

/// Compact tag for asserting fan-out shapes.
pub fn frame_type(frame: &ServerFrame) -> &'static str {
    match frame {
        ServerFrame::Notification(notification) => match notification {
            SessionNotification::Joined { .. } => "Joined",
            SessionNotification::PlayerJoined { .. } => "PlayerJoined",
            SessionNotification::PlayerLeft { .. } => "PlayerLeft",
            SessionNotification::StateUpdated { .. } => "StateUpdated",
            SessionNotification::DiceRolled { .. } => "DiceRolled",
            SessionNotification::TurnBegan { .. } => "TurnBegan",
            SessionNotification::TurnEnded { .. } => "TurnEnded",
            SessionNotification::EventDiceRolled { .. } => "EventDiceRolled",
        },
        ServerFrame::Error(_) => "Error",
    }
}

/// Tags of every frame, in arrival order.
pub fn frame_types(frames: &[ServerFrame]) -> Vec<&'static str> {
    frames.iter().map(frame_type).collect()
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
