use super::Session;
use crate::types::*;
use crate::wheel::segment_layout;
use serde::{Deserialize, Serialize};

/// Everything the presentation layer renders from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameView {
    pub app_phase: AppPhase,
    pub phase: RoundPhase,
    pub roster: Vec<Participant>,
    /// Wheel participants in round order
    pub active_participants: Vec<Participant>,
    pub segments: Vec<WheelSegment>,
    pub pick_order: Vec<Participant>,
    pub remaining_count: usize,
    pub current_winner: Option<Participant>,
    pub rotation: f64,
    pub validation: NameCountValidation,
    pub sound_enabled: bool,
}

impl Session {
    pub fn view(&self) -> GameView {
        let active_participants = self.active_participants();
        GameView {
            app_phase: self.app_phase,
            phase: self.phase,
            roster: self.roster.clone(),
            segments: segment_layout(&active_participants),
            active_participants,
            pick_order: self.pick_order.clone(),
            remaining_count: self.remaining_count(),
            current_winner: self.current_winner.clone(),
            rotation: self.rotation,
            validation: self.roster_validation(),
            sound_enabled: self.sound_enabled,
        }
    }
}
