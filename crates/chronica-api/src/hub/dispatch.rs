//! Call dispatch: locate the session, mutate under its lock, snapshot,
//! release, then fan out.
//!
//! Everything here is synchronous. Session locks are never held across an
//! await point or a network write; outbound frames go onto per-connection
//! channels after the lock is dropped (group broadcasts push onto those
//! same in-memory channels).

use uuid::Uuid;

use chronica_core::error::GameError;
use chronica_session::application::notifications::SessionNotification;
use chronica_session::application::snapshot::GameStateView;
use chronica_session::domain::session::FinishOutcome;
use chronica_session::registry::SharedSession;

use super::groups::ConnectionSender;
use super::protocol::{ClientCall, ServerFrame};
use crate::error::error_frame;
use crate::state::AppState;

/// Handles one inbound call, reporting any failure to the caller only.
pub fn handle_call(
    state: &AppState,
    connection_id: &str,
    caller: &ConnectionSender,
    joined_session: &mut Option<Uuid>,
    call: ClientCall,
) {
    let session_id = call.session_id();
    let result = match call {
        ClientCall::Join {
            session_id,
            display_name,
            is_devout,
            is_merchant,
        } => join(
            state,
            connection_id,
            caller,
            joined_session,
            session_id,
            &display_name,
            is_devout,
            is_merchant,
        ),
        ClientCall::RollMovement { session_id } => {
            roll_movement(state, connection_id, session_id)
        }
        ClientCall::BeginTurnEvent { session_id } => {
            begin_turn_event(state, connection_id, caller, session_id)
        }
        ClientCall::FinishTurnEvent {
            session_id,
            chosen_player_id,
        } => finish_turn_event(state, connection_id, session_id, chosen_player_id),
        ClientCall::SubmitEventRoll { session_id } => {
            submit_event_roll(state, connection_id, session_id)
        }
        ClientCall::Sync { session_id } => sync(state, caller, session_id),
    };

    if let Err(error) = result {
        if error.is_configuration_error() {
            tracing::error!(%session_id, connection_id, %error, "event table defect");
        } else {
            tracing::debug!(%session_id, connection_id, %error, "call rejected");
        }
        let _ = caller.send(ServerFrame::Error(error_frame(&error)));
    }
}

/// Handles the transport reporting a closed connection.
pub fn handle_disconnect(state: &AppState, connection_id: &str, joined_session: Option<Uuid>) {
    let Some(session_id) = joined_session else {
        return;
    };
    state.groups.remove(session_id, connection_id);
    let Some(shared) = state.registry.get(session_id) else {
        return;
    };

    let removed = {
        let mut session = shared.lock().expect("session lock poisoned");
        session
            .remove_connection(connection_id)
            .map(|removal| (removal, GameStateView::from_session(&session)))
    };
    let Some((removal, snapshot)) = removed else {
        return;
    };

    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::PlayerLeft {
            player_id: removal.player_id,
        }),
    );
    if let Some(resolution) = removal.completion {
        state.groups.send_to_group(
            session_id,
            &notification(SessionNotification::TurnEnded { resolution }),
        );
    }
    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );

    if removal.session_empty {
        state.registry.remove_if_empty(session_id);
    }

    tracing::info!(
        player = %removal.display_name,
        player_id = %removal.player_id,
        %session_id,
        "player disconnected"
    );
}

fn notification(inner: SessionNotification) -> ServerFrame {
    ServerFrame::Notification(inner)
}

fn find_session(state: &AppState, session_id: Uuid) -> Result<SharedSession, GameError> {
    state
        .registry
        .get(session_id)
        .ok_or(GameError::SessionNotFound(session_id))
}

#[allow(clippy::too_many_arguments)]
fn join(
    state: &AppState,
    connection_id: &str,
    caller: &ConnectionSender,
    joined_session: &mut Option<Uuid>,
    session_id: Uuid,
    display_name: &str,
    is_devout: bool,
    is_merchant: bool,
) -> Result<(), GameError> {
    // Validate before get-or-create so a bad join cannot litter the
    // registry with an empty session.
    if display_name.trim().is_empty() {
        return Err(GameError::InvalidInput(
            "display name is required".to_owned(),
        ));
    }

    let shared = state.registry.get_or_create(session_id);
    let (player_id, snapshot) = {
        let mut session = shared.lock().expect("session lock poisoned");
        let player_id = session.join(connection_id, display_name, is_devout, is_merchant)?;
        (player_id, GameStateView::from_session(&session))
    };

    state.groups.add(session_id, connection_id, caller.clone());
    *joined_session = Some(session_id);

    let _ = caller.send(notification(SessionNotification::Joined {
        player_id,
        state: snapshot.clone(),
    }));
    state.groups.send_to_others(
        session_id,
        connection_id,
        &notification(SessionNotification::PlayerJoined {
            state: snapshot.clone(),
        }),
    );
    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );

    tracing::info!(
        player = display_name.trim(),
        %player_id,
        %session_id,
        "player joined"
    );
    Ok(())
}

fn roll_movement(
    state: &AppState,
    connection_id: &str,
    session_id: Uuid,
) -> Result<(), GameError> {
    let shared = find_session(state, session_id)?;
    let (movement, snapshot) = {
        let mut session = shared.lock().expect("session lock poisoned");
        let mut rng = state.rng.lock().expect("rng lock poisoned");
        let movement = session.roll_movement(connection_id, &mut *rng)?;
        (movement, GameStateView::from_session(&session))
    };

    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::DiceRolled {
            player_id: movement.player_id,
            roll_value: movement.roll_value,
            new_position: movement.new_position,
        }),
    );
    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );

    tracing::info!(
        player_id = %movement.player_id,
        roll = movement.roll_value,
        position = movement.new_position,
        %session_id,
        "movement rolled"
    );
    Ok(())
}

fn begin_turn_event(
    state: &AppState,
    connection_id: &str,
    caller: &ConnectionSender,
    session_id: Uuid,
) -> Result<(), GameError> {
    let shared = find_session(state, session_id)?;
    let (event, snapshot) = {
        let session = shared.lock().expect("session lock poisoned");
        let event = session.begin_turn_event(connection_id, &state.events)?.clone();
        (event, GameStateView::from_session(&session))
    };

    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );
    let _ = caller.send(notification(SessionNotification::TurnBegan { event }));
    Ok(())
}

fn finish_turn_event(
    state: &AppState,
    connection_id: &str,
    session_id: Uuid,
    chosen_player_id: Option<Uuid>,
) -> Result<(), GameError> {
    let shared = find_session(state, session_id)?;
    let (outcome, snapshot) = {
        let mut session = shared.lock().expect("session lock poisoned");
        let outcome =
            session.finish_turn_event(connection_id, chosen_player_id, &state.events)?;
        (outcome, GameStateView::from_session(&session))
    };

    match outcome {
        FinishOutcome::Resolved(resolution) => {
            tracing::info!(%session_id, cell = resolution.cell, "turn resolved");
            state.groups.send_to_group(
                session_id,
                &notification(SessionNotification::TurnEnded { resolution }),
            );
        }
        FinishOutcome::AwaitingEventRolls => {
            tracing::info!(%session_id, "event roll barrier installed");
        }
    }
    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );
    Ok(())
}

fn submit_event_roll(
    state: &AppState,
    connection_id: &str,
    session_id: Uuid,
) -> Result<(), GameError> {
    let shared = find_session(state, session_id)?;
    let (submission, snapshot) = {
        let mut session = shared.lock().expect("session lock poisoned");
        let mut rng = state.rng.lock().expect("rng lock poisoned");
        let submission = session.submit_event_roll(connection_id, &mut *rng)?;
        (submission, GameStateView::from_session(&session))
    };

    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::EventDiceRolled {
            player_id: submission.player_id,
            roll_value: submission.roll_value,
        }),
    );
    if let Some(resolution) = submission.completion {
        tracing::info!(%session_id, cell = resolution.cell, "event roll barrier cleared");
        state.groups.send_to_group(
            session_id,
            &notification(SessionNotification::TurnEnded { resolution }),
        );
    }
    state.groups.send_to_group(
        session_id,
        &notification(SessionNotification::StateUpdated { state: snapshot }),
    );
    Ok(())
}

fn sync(state: &AppState, caller: &ConnectionSender, session_id: Uuid) -> Result<(), GameError> {
    let shared = find_session(state, session_id)?;
    let snapshot = {
        let session = shared.lock().expect("session lock poisoned");
        GameStateView::from_session(&session)
    };

    let _ = caller.send(notification(SessionNotification::StateUpdated {
        state: snapshot,
    }));
    Ok(())
}
