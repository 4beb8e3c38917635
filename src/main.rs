use std::io::Read;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whosnext::{
    config::WheelConfig,
    handlers::handle_message,
    prefs::JsonFilePreferenceStore,
    presenter::{spawn_presenter, TimedPresenter},
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
};

/// Wait until the next winner (or an error) comes through the event stream
async fn next_winner(rx: &mut broadcast::Receiver<ServerMessage>) -> Option<ServerMessage> {
    loop {
        match rx.recv().await {
            Ok(msg @ ServerMessage::Winner { .. }) => return Some(msg),
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whosnext=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Who's next?");

    let config = WheelConfig::from_env();
    let prefs_path =
        std::env::var("WHEEL_PREFS_PATH").unwrap_or_else(|_| "whosnext-prefs.json".to_string());
    let speed = std::env::var("WHEEL_ANIMATION_SPEED")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0);

    let state = Arc::new(
        AppState::new(config)
            .with_preferences(Arc::new(JsonFilePreferenceStore::new(prefs_path)))
            .await,
    );
    let mut events = state.broadcast.subscribe();
    let presenter = spawn_presenter(state.clone(), Arc::new(TimedPresenter::new(speed)));

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::error!("Failed to read names from stdin: {}", e);
        return;
    }

    for request in [
        ClientMessage::SubmitNames { text: input },
        ClientMessage::StartGame,
    ] {
        if let Some(ServerMessage::Error { msg, .. }) = handle_message(request, &state).await {
            tracing::error!("{}", msg);
            return;
        }
    }

    loop {
        handle_message(ClientMessage::RequestSpin, &state).await;

        match next_winner(&mut events).await {
            Some(ServerMessage::Winner {
                celebration,
                remaining_count,
                ..
            }) => {
                tracing::info!(
                    "#{} {} ({} left)",
                    celebration.pick_number,
                    celebration.winner.name,
                    remaining_count
                );
            }
            _ => break,
        }

        if let Some(ServerMessage::Finished { pick_order }) =
            handle_message(ClientMessage::Advance, &state).await
        {
            for (i, p) in pick_order.iter().enumerate() {
                tracing::info!("{:>2}. {}", i + 1, p.name);
            }
            break;
        }
    }

    presenter.abort();
}
