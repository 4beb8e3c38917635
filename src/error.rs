use crate::types::{AppPhase, ParticipantId};

/// Errors surfaced by roster editing and game start
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WheelError {
    #[error("Please enter at least {min} names to start the game.")]
    TooFewNames { min: usize },

    #[error("Maximum {max} names allowed. Please remove some names.")]
    TooManyNames { max: usize },

    #[error("The list is full ({max} names max)")]
    RosterFull { max: usize },

    #[error("Name is empty after sanitizing")]
    EmptyName,

    #[error("No names could be parsed from the input")]
    NoNamesParsed,

    #[error("Participant not found: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Not allowed in {actual:?} (requires {expected:?})")]
    WrongAppPhase { expected: AppPhase, actual: AppPhase },
}

impl WheelError {
    /// Stable code for `ServerMessage::Error`
    pub fn code(&self) -> &'static str {
        match self {
            WheelError::TooFewNames { .. } => "TOO_FEW_NAMES",
            WheelError::TooManyNames { .. } => "TOO_MANY_NAMES",
            WheelError::RosterFull { .. } => "ROSTER_FULL",
            WheelError::EmptyName => "EMPTY_NAME",
            WheelError::NoNamesParsed => "NO_NAMES_PARSED",
            WheelError::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            WheelError::WrongAppPhase { .. } => "WRONG_APP_PHASE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures reported by a presentation adapter. Never fatal to the core.
#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    #[error("Spin animation failed: {0}")]
    AnimationFailed(String),

    #[error("Effect failed: {0}")]
    EffectFailed(String),
}
