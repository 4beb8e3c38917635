use serde::{Deserialize, Serialize};

/// Opaque ID type for participants
pub type ParticipantId = String;

/// Token identifying one in-flight spin. Bumped on every spin and on reset.
pub type SpinToken = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub picked: bool,
}

impl Participant {
    /// Create an unpicked participant with a fresh ULID.
    ///
    /// Ids only need to be unique, so they do not draw from the injected
    /// `RandomSource`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.into(),
            picked: false,
        }
    }
}

/// Which screen the user is on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppPhase {
    /// Pasting the raw name list
    Input,
    /// Reviewing and editing the parsed roster
    List,
    /// Wheel is live
    Game,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    Playing,
    Spinning,
    Winner,
    Finished,
}

/// Result of `validate_name_count`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameCountValidation {
    pub valid: bool,
    pub message: String,
}

/// Everything the presentation layer needs to animate one spin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinPlan {
    pub spin_token: SpinToken,
    pub winner: Participant,
    pub winner_index: usize,
    pub segment_angle: f64,
    /// Absolute wheel rotation in degrees the animation must end on
    pub target_rotation: f64,
    pub duration_ms: u64,
}

/// Confirmed winner plus the cosmetic parameters for confetti and sound
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Celebration {
    pub winner: Participant,
    /// 1-based position in the pick order
    pub pick_number: usize,
    pub confetti_seed: u32,
    pub play_sound: bool,
    pub duration_ms: u64,
}

/// One drawable slice of the wheel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelSegment {
    pub participant_id: ParticipantId,
    pub name: String,
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub center_angle: f64,
    pub color: String,
}
