//! Message dispatch
//!
//! Entry point for every UI request. Each handler locks the session, applies
//! one transition, broadcasts the resulting events and returns a direct reply.

use crate::error::WheelError;
use crate::prefs::Preferences;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, Session, SpinRequest};
use crate::types::*;
use std::sync::Arc;

/// Handle a client message and return an optional reply
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::SubmitNames { text } => handle_submit_names(state, text).await,
        ClientMessage::AddName { name } => handle_add_name(state, name).await,
        ClientMessage::RemoveName { participant_id } => {
            handle_remove_name(state, participant_id).await
        }
        ClientMessage::BackToInput => handle_back_to_input(state).await,
        ClientMessage::StartGame => handle_start_game(state).await,
        ClientMessage::RequestSpin => handle_request_spin(state).await,
        ClientMessage::SpinAnimationComplete { spin_token } => {
            handle_spin_complete(state, spin_token).await
        }
        ClientMessage::Advance => handle_advance(state).await,
        ClientMessage::RestartRound => handle_restart_round(state).await,
        ClientMessage::NewGame => handle_new_game(state).await,
        ClientMessage::SetSoundEnabled { enabled } => handle_set_sound(state, enabled).await,
        ClientMessage::RequestState => Some(ServerMessage::GameState {
            view: state.snapshot().await,
        }),
    }
}

fn error_message(e: &WheelError) -> ServerMessage {
    ServerMessage::Error {
        code: e.code().to_string(),
        msg: e.to_string(),
    }
}

fn phase_message(session: &Session) -> ServerMessage {
    ServerMessage::Phase {
        app_phase: session.app_phase(),
        phase: session.phase(),
        remaining_count: session.remaining_count(),
        server_now: chrono::Utc::now().to_rfc3339(),
    }
}

fn roster_message(session: &Session) -> ServerMessage {
    ServerMessage::Roster {
        participants: session.roster().to_vec(),
        validation: session.roster_validation(),
    }
}

fn winner_message(session: &Session, celebration: Celebration) -> ServerMessage {
    ServerMessage::Winner {
        celebration,
        pick_order: session.pick_order().to_vec(),
        remaining_count: session.remaining_count(),
    }
}

/// Broadcast `reply` plus the phase change, then hand `reply` back
fn announce(state: &AppState, session: &Session, reply: ServerMessage) -> Option<ServerMessage> {
    state.broadcast_to_all(reply.clone());
    state.broadcast_to_all(phase_message(session));
    Some(reply)
}

pub async fn handle_submit_names(state: &Arc<AppState>, text: String) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    if let Err(e) = session.submit_names(&text) {
        tracing::info!("Name submission rejected: {}", e);
        return Some(error_message(&e));
    }
    announce(state, &session, roster_message(&session))
}

pub async fn handle_add_name(state: &Arc<AppState>, name: String) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    match session.add_name(&name) {
        Ok(_) => {
            let reply = roster_message(&session);
            state.broadcast_to_all(reply.clone());
            Some(reply)
        }
        Err(e) => Some(error_message(&e)),
    }
}

pub async fn handle_remove_name(
    state: &Arc<AppState>,
    participant_id: ParticipantId,
) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    match session.remove_name(&participant_id) {
        Ok(_) => {
            let reply = roster_message(&session);
            state.broadcast_to_all(reply.clone());
            Some(reply)
        }
        Err(e) => Some(error_message(&e)),
    }
}

pub async fn handle_back_to_input(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    match session.back_to_input() {
        Ok(()) => {
            let reply = phase_message(&session);
            state.broadcast_to_all(reply.clone());
            Some(reply)
        }
        Err(e) => Some(error_message(&e)),
    }
}

pub async fn handle_start_game(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    let mut rng = state.rng.lock().await;
    if let Err(e) = session.start_game(&mut **rng) {
        tracing::info!("Cannot start game: {}", e);
        return Some(error_message(&e));
    }
    announce(state, &session, ServerMessage::GameState {
        view: session.view(),
    })
}

pub async fn handle_request_spin(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    let mut rng = state.rng.lock().await;

    match session.request_spin(&mut **rng) {
        SpinRequest::Ignored => None,
        SpinRequest::Started(plan) => {
            announce(state, &session, ServerMessage::SpinStarted { plan })
        }
        SpinRequest::PickedWithoutSpin(celebration) => {
            let reply = winner_message(&session, celebration);
            announce(state, &session, reply)
        }
    }
}

pub async fn handle_spin_complete(
    state: &Arc<AppState>,
    spin_token: SpinToken,
) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    let celebration = session.complete_spin(spin_token)?;
    let reply = winner_message(&session, celebration);
    announce(state, &session, reply)
}

pub async fn handle_advance(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    match session.advance()? {
        RoundPhase::Finished => {
            let reply = ServerMessage::Finished {
                pick_order: session.pick_order().to_vec(),
            };
            announce(state, &session, reply)
        }
        _ => {
            let reply = phase_message(&session);
            state.broadcast_to_all(reply.clone());
            Some(reply)
        }
    }
}

pub async fn handle_restart_round(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    let mut rng = state.rng.lock().await;
    if !session.restart_round(&mut **rng) {
        return None;
    }
    announce(state, &session, ServerMessage::GameState {
        view: session.view(),
    })
}

pub async fn handle_new_game(state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.write().await;
    session.new_game();
    announce(state, &session, ServerMessage::GameState {
        view: session.view(),
    })
}

pub async fn handle_set_sound(state: &Arc<AppState>, enabled: bool) -> Option<ServerMessage> {
    state.session.write().await.set_sound_enabled(enabled);

    if let Some(store) = &state.prefs {
        let prefs = Preferences {
            sound_enabled: enabled,
        };
        // Persisting is best effort; the flag already applies to this session
        if let Err(e) = store.save(&prefs).await {
            tracing::warn!("Failed to persist sound preference: {}", e);
        }
    }

    tracing::info!("Sound {}", if enabled { "enabled" } else { "disabled" });
    Some(ServerMessage::SoundPreference { enabled })
}
