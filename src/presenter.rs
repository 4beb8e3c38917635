//! Presentation boundary
//!
//! The core never waits on animation. A presenter task listens for
//! `SpinStarted`, lets the adapter animate, then reports completion with the
//! spin token it was given. Confirmed winners are handed to the adapter for
//! confetti and sound, fire-and-forget.

use crate::error::PresentationError;
use crate::handlers::handle_message;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Celebration, SpinPlan, SpinToken};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

#[async_trait]
pub trait PresentationAdapter: Send + Sync {
    /// Drive the wheel to `plan.target_rotation`. Resolves when it stops.
    async fn animate_spin(&self, plan: &SpinPlan) -> Result<(), PresentationError>;

    /// Confetti, jackpot sting and the like
    async fn celebrate(&self, celebration: &Celebration) -> Result<(), PresentationError>;
}

/// Spawn the task that connects the adapter to the state's event stream
pub fn spawn_presenter(
    state: Arc<AppState>,
    adapter: Arc<dyn PresentationAdapter>,
) -> JoinHandle<()> {
    // Subscribe before spawning so no event sent after this call is missed
    let mut rx = state.broadcast.subscribe();

    tokio::spawn(async move {
        let mut last_started: Option<SpinToken> = None;
        loop {
            match rx.recv().await {
                Ok(ServerMessage::SpinStarted { plan }) => {
                    last_started = Some(plan.spin_token);
                    let state = state.clone();
                    let adapter = adapter.clone();
                    tokio::spawn(async move {
                        run_spin(&state, adapter.as_ref(), plan).await;
                    });
                }
                Ok(ServerMessage::Winner { celebration, .. }) => {
                    let adapter = adapter.clone();
                    tokio::spawn(async move {
                        if let Err(e) = adapter.celebrate(&celebration).await {
                            tracing::warn!("Celebration failed: {}", e);
                        }
                    });
                }
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Presenter lagged, skipped {} events", n);
                    if let Some(token) = recover_missed_spin(&state, last_started).await {
                        last_started = Some(token);
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("Presenter stopped");
    })
}

/// Complete a pending spin whose `SpinStarted` was never seen.
///
/// Returns the token that was completed, if any.
async fn recover_missed_spin(
    state: &Arc<AppState>,
    last_started: Option<SpinToken>,
) -> Option<SpinToken> {
    let token = state.session.read().await.pending_spin_token()?;
    if last_started == Some(token) {
        return None;
    }

    tracing::warn!("Spin {} was missed while lagging, completing it", token);
    handle_message(ClientMessage::SpinAnimationComplete { spin_token: token }, state).await;
    Some(token)
}

async fn run_spin(state: &Arc<AppState>, adapter: &dyn PresentationAdapter, plan: SpinPlan) {
    if let Err(e) = adapter.animate_spin(&plan).await {
        // A broken animation must not strand the round in SPINNING
        tracing::warn!("Spin {} animation failed: {}", plan.spin_token, e);
    }

    handle_message(
        ClientMessage::SpinAnimationComplete {
            spin_token: plan.spin_token,
        },
        state,
    )
    .await;
}

/// Headless adapter that just waits out the animation time
#[derive(Debug, Clone)]
pub struct TimedPresenter {
    /// Multiplier on the planned duration; 0 skips the wait
    pub speed: f64,
}

impl TimedPresenter {
    pub fn new(speed: f64) -> Self {
        Self {
            speed: speed.max(0.0),
        }
    }
}

impl Default for TimedPresenter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl PresentationAdapter for TimedPresenter {
    async fn animate_spin(&self, plan: &SpinPlan) -> Result<(), PresentationError> {
        let wait = Duration::from_millis((plan.duration_ms as f64 * self.speed) as u64);
        tracing::debug!(
            "Spinning to {:.1} degrees over {:?}",
            plan.target_rotation,
            wait
        );
        tokio::time::sleep(wait).await;
        Ok(())
    }

    async fn celebrate(&self, celebration: &Celebration) -> Result<(), PresentationError> {
        tracing::info!(
            "Confetti for {} (#{}, seed {})",
            celebration.winner.name,
            celebration.pick_number,
            celebration.confetti_seed
        );
        if celebration.play_sound {
            tracing::info!("Jackpot sting");
        }
        Ok(())
    }
}
