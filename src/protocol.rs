use crate::state::GameView;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Requests from the UI into the core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Raw pasted name list
    SubmitNames {
        text: String,
    },
    AddName {
        name: String,
    },
    RemoveName {
        participant_id: ParticipantId,
    },
    BackToInput,
    StartGame,
    RequestSpin,
    /// Sent by the presentation layer once the wheel stopped
    SpinAnimationComplete {
        spin_token: SpinToken,
    },
    /// Leave the winner announcement
    Advance,
    RestartRound,
    NewGame,
    SetSoundEnabled {
        enabled: bool,
    },
    RequestState,
}

/// Events and replies from the core to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        view: GameView,
    },
    Roster {
        participants: Vec<Participant>,
        validation: NameCountValidation,
    },
    Phase {
        app_phase: AppPhase,
        phase: RoundPhase,
        remaining_count: usize,
        server_now: String,
    },
    SpinStarted {
        plan: SpinPlan,
    },
    Winner {
        celebration: Celebration,
        pick_order: Vec<Participant>,
        remaining_count: usize,
    },
    /// Round complete, final ranking
    Finished {
        pick_order: Vec<Participant>,
    },
    SoundPreference {
        enabled: bool,
    },
    Error {
        code: String,
        msg: String,
    },
}
