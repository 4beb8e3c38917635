mod roster;
mod round;
mod view;

pub use round::SpinRequest;
pub use view::GameView;

use crate::config::WheelConfig;
use crate::prefs::PreferenceStore;
use crate::protocol::ServerMessage;
use crate::random::{RandomSource, ThreadRandom};
use crate::types::*;
use crate::wheel::SpinResolver;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Spin waiting for the presentation layer to finish animating
#[derive(Debug, Clone)]
struct PendingSpin {
    token: SpinToken,
    winner_id: ParticipantId,
    target_rotation: f64,
}

/// Roster, pick state and phase for one wheel.
///
/// All transitions are synchronous. The only writer is whoever holds the
/// session; the animation wait lives outside and reports back with the spin
/// token it was given.
#[derive(Debug, Clone)]
pub struct Session {
    config: WheelConfig,
    resolver: SpinResolver,
    app_phase: AppPhase,
    roster: Vec<Participant>,
    /// Fixed wheel order for the current round
    shuffled_order: Vec<ParticipantId>,
    pick_order: Vec<Participant>,
    phase: RoundPhase,
    current_winner: Option<Participant>,
    pending_spin: Option<PendingSpin>,
    /// Cumulative wheel rotation in degrees, only ever grows within a game
    rotation: f64,
    /// Last issued spin token; bumped on every spin and every reset
    spin_token: SpinToken,
    sound_enabled: bool,
}

impl Session {
    pub fn new(config: WheelConfig) -> Self {
        let config = config.normalized();
        Self {
            resolver: SpinResolver::new(&config),
            config,
            app_phase: AppPhase::Input,
            roster: Vec::new(),
            shuffled_order: Vec::new(),
            pick_order: Vec::new(),
            phase: RoundPhase::Playing,
            current_winner: None,
            pending_spin: None,
            rotation: 0.0,
            spin_token: 0,
            sound_enabled: false,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn app_phase(&self) -> AppPhase {
        self.app_phase
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn shuffled_order(&self) -> &[ParticipantId] {
        &self.shuffled_order
    }

    pub fn pick_order(&self) -> &[Participant] {
        &self.pick_order
    }

    pub fn current_winner(&self) -> Option<&Participant> {
        self.current_winner.as_ref()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Token of the spin currently animating, if any
    pub fn pending_spin_token(&self) -> Option<SpinToken> {
        self.pending_spin.as_ref().map(|p| p.token)
    }

    pub fn remaining_count(&self) -> usize {
        self.roster.iter().filter(|p| !p.picked).count()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

/// Shared application state: the session plus the event fan-out
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub rng: Arc<Mutex<Box<dyn RandomSource>>>,
    pub prefs: Option<Arc<dyn PreferenceStore>>,
    /// Events for the presentation layer
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(config: WheelConfig) -> Self {
        Self::with_random(config, Box::new(ThreadRandom))
    }

    pub fn with_random(config: WheelConfig, rng: Box<dyn RandomSource>) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(RwLock::new(Session::new(config))),
            rng: Arc::new(Mutex::new(rng)),
            prefs: None,
            broadcast: tx,
        }
    }

    /// Attach a preference store and apply its stored sound flag
    pub async fn with_preferences(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        let prefs = crate::prefs::load_or_default(store.as_ref()).await;
        self.session
            .write()
            .await
            .set_sound_enabled(prefs.sound_enabled);
        self.prefs = Some(store);
        self
    }

    /// Send to every subscriber; having none is fine
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }

    pub async fn snapshot(&self) -> GameView {
        self.session.read().await.view()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPreferenceStore, Preferences};

    #[test]
    fn test_new_session() {
        let session = Session::default();
        assert_eq!(session.app_phase(), AppPhase::Input);
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert!(session.roster().is_empty());
        assert_eq!(session.rotation(), 0.0);
        assert!(session.pending_spin_token().is_none());
    }

    #[tokio::test]
    async fn test_preferences_applied_on_attach() {
        let store = Arc::new(MemoryPreferenceStore::new(Preferences {
            sound_enabled: true,
        }));
        let state = AppState::default().with_preferences(store).await;
        assert!(state.session.read().await.sound_enabled());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let state = AppState::default();
        state.broadcast_to_all(ServerMessage::SoundPreference { enabled: false });

        let mut rx = state.broadcast.subscribe();
        state.broadcast_to_all(ServerMessage::SoundPreference { enabled: true });
        match rx.recv().await {
            Ok(ServerMessage::SoundPreference { enabled }) => assert!(enabled),
            other => panic!("Expected SoundPreference, got {:?}", other),
        }
    }
}
